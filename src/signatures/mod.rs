pub mod evaluate;

use std::path::Path;

use serde::Deserialize;

use crate::errors::SignatureError;
use crate::severity::Severity;

/// Root of a signature catalog. Immutable once loaded: the scan engine only
/// ever reads from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Signatures {
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

/// A plugin groups endpoints sharing the same checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plugin {
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Deprecated singular form, mutually exclusive with `endpoints`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub query_string: String,
    #[serde(default)]
    pub follow_redirects: bool,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// One matchable condition with a severity and remediation text.
///
/// The `match`/`all_match`/`no_match` YAML keys are kept as-is for catalog
/// compatibility; in code they read as OR / AND / NOT lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "match", default)]
    pub match_one: Vec<String>,
    #[serde(rename = "all_match", default)]
    pub match_all: Vec<String>,
    #[serde(default)]
    pub no_match: Vec<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub no_headers: Vec<String>,
    pub severity: Severity,
    #[serde(default)]
    pub remediation: String,
    #[serde(default)]
    pub description: String,
}

impl Signatures {
    /// Parses a YAML catalog and validates it, so the scan engine never sees
    /// a malformed check. Folds the deprecated `endpoint` field into
    /// `endpoints`.
    pub fn parse(data: &str) -> Result<Self, SignatureError> {
        let mut signatures: Signatures = serde_yaml::from_str(data)?;
        signatures.normalize()?;
        signatures.validate()?;
        Ok(signatures)
    }

    /// Reads and parses the catalog at `path`.
    pub fn load_file(path: &Path) -> Result<Self, SignatureError> {
        if !path.is_file() {
            return Err(SignatureError::InvalidPath(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    fn normalize(&mut self) -> Result<(), SignatureError> {
        for plugin in &mut self.plugins {
            if let Some(endpoint) = plugin.endpoint.take() {
                if !plugin.endpoints.is_empty() {
                    return Err(SignatureError::BothEndpointAndEndpoints);
                }
                plugin.endpoints.push(endpoint);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), SignatureError> {
        for plugin in &self.plugins {
            if plugin.endpoints.is_empty() {
                return Err(SignatureError::MissingEndpoint);
            }
            for check in &plugin.checks {
                if check.name.is_empty() {
                    return Err(SignatureError::invalid_check_field(&check.name, "name"));
                }
                if check.description.is_empty() {
                    return Err(SignatureError::invalid_check_field(
                        &check.name,
                        "description",
                    ));
                }
                if check.remediation.is_empty() {
                    return Err(SignatureError::invalid_check_field(
                        &check.name,
                        "remediation",
                    ));
                }
                // KEY:VALUE specs are a catalog-authoring concern, reject
                // them here rather than mid-scan.
                for header in &check.headers {
                    if header.matches(':').count() != 1 {
                        return Err(SignatureError::InvalidHeaderFormat(header.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Catalog restricted to checks of exactly `severity`. Plugins left
    /// without checks are dropped.
    pub fn filter_by_severity(&self, severity: Severity) -> Signatures {
        let plugins = self
            .plugins
            .iter()
            .filter_map(|plugin| {
                let checks: Vec<Check> = plugin
                    .checks
                    .iter()
                    .filter(|c| c.severity == severity)
                    .cloned()
                    .collect();
                if checks.is_empty() {
                    return None;
                }
                Some(Plugin {
                    checks,
                    endpoint: None,
                    ..plugin.clone()
                })
            })
            .collect();
        Signatures {
            insecure: self.insecure,
            plugins,
        }
    }

    /// Catalog restricted to plugins owning at least one check whose name
    /// contains one of `names`.
    pub fn filter_by_names(&self, names: &[String]) -> Signatures {
        if names.is_empty() {
            return self.clone();
        }
        let plugins = self
            .plugins
            .iter()
            .filter(|plugin| {
                plugin
                    .checks
                    .iter()
                    .any(|c| names.iter().any(|n| c.name.contains(n.as_str())))
            })
            .cloned()
            .collect();
        Signatures {
            insecure: self.insecure,
            plugins,
        }
    }

    pub fn check_count(&self) -> usize {
        self.plugins.iter().map(|p| p.checks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
plugins:
  - endpoints:
      - "/.env"
      - "/.env.local"
    checks:
      - name: "Env file disclosure"
        match:
          - "APP_KEY="
          - "DB_PASSWORD="
        severity: "High"
        remediation: "Remove the file from the web root."
        description: "Environment file is publicly readable."
  - endpoint: "/debug/pprof/"
    query_string: "debug=1"
    follow_redirects: true
    checks:
      - name: "Go pprof endpoint"
        status_code: 200
        all_match:
          - "Types of profiles available"
        severity: "Medium"
        remediation: "Disable pprof in production."
        description: "Profiling endpoint is exposed."
"#;

    #[test]
    fn test_parse_catalog() {
        let signatures = Signatures::parse(CATALOG).unwrap();
        assert_eq!(signatures.plugins.len(), 2);
        assert_eq!(signatures.check_count(), 2);

        let env = &signatures.plugins[0];
        assert_eq!(env.endpoints, vec!["/.env", "/.env.local"]);
        assert_eq!(env.checks[0].match_one.len(), 2);
        assert_eq!(env.checks[0].severity, Severity::High);
        assert!(!env.follow_redirects);

        // deprecated singular endpoint folds into endpoints
        let pprof = &signatures.plugins[1];
        assert_eq!(pprof.endpoints, vec!["/debug/pprof/"]);
        assert!(pprof.endpoint.is_none());
        assert_eq!(pprof.query_string, "debug=1");
        assert!(pprof.follow_redirects);
        assert_eq!(pprof.checks[0].status_code, Some(200));
    }

    #[test]
    fn test_parse_rejects_both_endpoint_forms() {
        let data = r#"
plugins:
  - endpoint: "/a"
    endpoints: ["/b"]
"#;
        assert!(matches!(
            Signatures::parse(data),
            Err(SignatureError::BothEndpointAndEndpoints)
        ));
    }

    #[test]
    fn test_parse_rejects_missing_endpoint() {
        let data = r#"
plugins:
  - query_string: "x=1"
"#;
        assert!(matches!(
            Signatures::parse(data),
            Err(SignatureError::MissingEndpoint)
        ));
    }

    #[test]
    fn test_parse_rejects_empty_remediation() {
        let data = r#"
plugins:
  - endpoints: ["/x"]
    checks:
      - name: "incomplete"
        severity: "Low"
        description: "something"
"#;
        match Signatures::parse(data) {
            Err(SignatureError::InvalidCheckField { field, .. }) => {
                assert_eq!(field, "remediation")
            }
            other => panic!("expected InvalidCheckField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_severity() {
        let data = r#"
plugins:
  - endpoints: ["/x"]
    checks:
      - name: "bad severity"
        severity: "Catastrophic"
        remediation: "r"
        description: "d"
"#;
        assert!(matches!(
            Signatures::parse(data),
            Err(SignatureError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_severity() {
        let data = r#"
plugins:
  - endpoints: ["/x"]
    checks:
      - name: "no severity"
        remediation: "r"
        description: "d"
"#;
        assert!(matches!(
            Signatures::parse(data),
            Err(SignatureError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_header_spec() {
        let data = r#"
plugins:
  - endpoints: ["/x"]
    checks:
      - name: "bad header"
        headers:
          - "X-Foo:bar:baz"
        severity: "Low"
        remediation: "r"
        description: "d"
"#;
        assert!(matches!(
            Signatures::parse(data),
            Err(SignatureError::InvalidHeaderFormat(_))
        ));
    }

    #[test]
    fn test_filter_by_severity_drops_empty_plugins() {
        let signatures = Signatures::parse(CATALOG).unwrap();
        let high = signatures.filter_by_severity(Severity::High);
        assert_eq!(high.plugins.len(), 1);
        assert_eq!(high.plugins[0].checks[0].name, "Env file disclosure");

        let low = signatures.filter_by_severity(Severity::Low);
        assert!(low.plugins.is_empty());
    }

    #[test]
    fn test_filter_by_names() {
        let signatures = Signatures::parse(CATALOG).unwrap();
        let filtered = signatures.filter_by_names(&["pprof".to_string()]);
        assert_eq!(filtered.plugins.len(), 1);
        assert_eq!(filtered.plugins[0].checks[0].name, "Go pprof endpoint");

        let all = signatures.filter_by_names(&[]);
        assert_eq!(all.plugins.len(), 2);
    }
}
