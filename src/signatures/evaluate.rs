use crate::errors::EvaluateError;
use crate::fetch::HttpResponse;
use crate::signatures::Check;

impl Check {
    /// Decides whether `resp` matches this check. Short-circuits on the
    /// first failing criterion, cheapest first:
    ///
    /// 1. exact status code, when set
    /// 2. every `match_all` substring present in the body
    /// 3. at least one `match_one` substring present, when the list is non-empty
    /// 4. no `no_match` substring present
    /// 5. every `headers` spec satisfied (key present, value substring found)
    /// 6. no `no_headers` spec satisfied
    ///
    /// Empty lists constrain nothing. A `headers` spec without exactly one
    /// colon is a catalog bug and returns an error instead of a non-match;
    /// `Signatures::parse` rejects those up front, so this path only fires
    /// for catalogs assembled in memory.
    pub fn evaluate(&self, resp: &HttpResponse) -> Result<bool, EvaluateError> {
        if let Some(expected) = self.status_code {
            if resp.status_code != expected {
                return Ok(false);
            }
        }

        if !self.match_all.iter().all(|m| resp.body_contains(m)) {
            return Ok(false);
        }

        if !self.match_one.is_empty() && !self.match_one.iter().any(|m| resp.body_contains(m)) {
            return Ok(false);
        }

        if self.no_match.iter().any(|m| resp.body_contains(m)) {
            return Ok(false);
        }

        for spec in &self.headers {
            if spec.matches(':').count() != 1 {
                return Err(EvaluateError::InvalidHeaderFormat(spec.clone()));
            }
            let (key, value) = spec
                .split_once(':')
                .ok_or_else(|| EvaluateError::InvalidHeaderFormat(spec.clone()))?;
            match resp.header_values(key) {
                Some(values) if values.iter().any(|v| v.contains(value)) => {}
                _ => return Ok(false),
            }
        }

        for spec in &self.no_headers {
            // Key-only form is allowed here: "KEY" forbids nothing by
            // itself, "KEY:VALUE" forbids the key carrying that value.
            let mut parts = spec.split(':');
            let key = parts.next().unwrap_or_default();
            let forbidden = parts.next();
            if let (Some(values), Some(forbidden)) = (resp.header_values(key), forbidden) {
                if values.iter().any(|v| v.contains(forbidden)) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn response(body: &str) -> HttpResponse {
        HttpResponse {
            status_code: 200,
            body: body.as_bytes().to_vec(),
            headers: HashMap::new(),
        }
    }

    fn response_with_header(key: &str, value: &str) -> HttpResponse {
        let mut resp = response("");
        resp.headers
            .insert(key.to_string(), vec![value.to_string()]);
        resp
    }

    #[test]
    fn test_empty_check_matches_everything() {
        let check = Check::default();
        assert!(check.evaluate(&response("anything at all")).unwrap());
        assert!(check.evaluate(&response("")).unwrap());
    }

    #[test]
    fn test_status_code_gate() {
        let check = Check {
            status_code: Some(403),
            ..Check::default()
        };
        assert!(!check.evaluate(&response("body")).unwrap());

        let mut forbidden = response("body");
        forbidden.status_code = 403;
        assert!(check.evaluate(&forbidden).unwrap());
    }

    #[test]
    fn test_match_one_any_of() {
        let check = Check {
            match_one: vec!["MATCHONE".into(), "MATCHTWO".into()],
            ..Check::default()
        };
        assert!(check
            .evaluate(&response("MATCHONE lorem ipsum MATCHTWO"))
            .unwrap());
        assert!(check.evaluate(&response("only MATCHTWO here")).unwrap());
        assert!(!check.evaluate(&response("neither")).unwrap());
    }

    #[test]
    fn test_match_all_requires_every_needle() {
        let check = Check {
            match_all: vec!["MATCHONE".into(), "MATCHTWO".into()],
            ..Check::default()
        };
        assert!(check
            .evaluate(&response("MATCHONE lorem ipsum MATCHTWO"))
            .unwrap());
        assert!(!check.evaluate(&response("only MATCHONE")).unwrap());
    }

    #[test]
    fn test_no_match_rejects() {
        let check = Check {
            no_match: vec!["NOTMATCH".into()],
            ..Check::default()
        };
        assert!(!check.evaluate(&response("NOTMATCH")).unwrap());
        assert!(check.evaluate(&response("clean body")).unwrap());
    }

    #[test]
    fn test_header_substring_match() {
        let check = Check {
            headers: vec!["X-Foo:bar".into()],
            ..Check::default()
        };
        assert!(check
            .evaluate(&response_with_header("X-Foo", "barbaz"))
            .unwrap());
        assert!(!check
            .evaluate(&response_with_header("X-Foo", "qux"))
            .unwrap());
        assert!(!check.evaluate(&response("")).unwrap());
    }

    #[test]
    fn test_malformed_header_spec_is_an_error() {
        let check = Check {
            headers: vec!["X-Foo:bar:baz".into()],
            ..Check::default()
        };
        assert_eq!(
            check.evaluate(&response("")),
            Err(EvaluateError::InvalidHeaderFormat("X-Foo:bar:baz".into()))
        );

        let check = Check {
            headers: vec!["X-Foo".into()],
            ..Check::default()
        };
        assert!(check.evaluate(&response("")).is_err());
    }

    #[test]
    fn test_no_headers_key_only_never_rejects() {
        let check = Check {
            no_headers: vec!["Server".into()],
            ..Check::default()
        };
        assert!(check
            .evaluate(&response_with_header("Server", "nginx"))
            .unwrap());
    }

    #[test]
    fn test_no_headers_with_value() {
        let check = Check {
            no_headers: vec!["Server:nginx".into()],
            ..Check::default()
        };
        assert!(!check
            .evaluate(&response_with_header("Server", "nginx/1.25"))
            .unwrap());
        assert!(check
            .evaluate(&response_with_header("Server", "Apache"))
            .unwrap());
        assert!(check.evaluate(&response("")).unwrap());
    }

    #[test]
    fn test_criteria_combine() {
        let check = Check {
            status_code: Some(200),
            match_all: vec!["debug".into()],
            no_match: vec!["login".into()],
            ..Check::default()
        };
        assert!(check.evaluate(&response("debug console")).unwrap());
        assert!(!check.evaluate(&response("debug login page")).unwrap());
    }
}
