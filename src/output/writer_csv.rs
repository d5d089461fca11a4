use std::io::Write;

use csv::Writer;

use crate::scan::Finding;

/// Writes findings as CSV with the same column set the JSON export carries.
pub fn write_csv(findings: &[Finding], w: &mut dyn Write) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(w);
    writer.write_record(["url", "endpoint", "severity", "checkName", "remediation"])?;
    for finding in findings {
        writer.write_record([
            finding.url.as_str(),
            finding.endpoint.as_str(),
            finding.severity.as_str(),
            finding.check_name.as_str(),
            finding.remediation.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;

    #[test]
    fn test_csv_shape() {
        let findings = vec![Finding {
            url: "http://a/.env".to_string(),
            endpoint: "/.env".to_string(),
            check_name: "Env file disclosure".to_string(),
            severity: Severity::High,
            remediation: "Remove the file.".to_string(),
        }];
        let mut buf = Vec::new();
        write_csv(&findings, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "url,endpoint,severity,checkName,remediation"
        );
        assert_eq!(
            lines.next().unwrap(),
            "http://a/.env,/.env,High,Env file disclosure,Remove the file."
        );
    }
}
