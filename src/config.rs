use std::io::BufRead;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cli::ScanArgs;
use crate::errors::ConfigError;
use crate::severity::{severities_as_string, Severity};

pub const EXPORT_FORMATS: [&str; 2] = ["csv", "json"];

/// Everything a scan run needs, validated up front so the engine can fail
/// fast before the first request goes out.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub urls: Vec<String>,
    pub insecure: bool,
    pub timeout_secs: u64,
    pub workers: usize,
    pub export_formats: Vec<String>,
    pub export_filename: String,
    pub max_severity: Option<Severity>,
    pub severity_filter: Option<Severity>,
    pub plugin_filters: Vec<String>,
}

impl ScanConfig {
    pub fn from_args(args: &ScanArgs) -> Result<Self, ConfigError> {
        // URLs come either from positional arguments or from --url-file,
        // never both.
        if !args.urls.is_empty() && args.url_file.is_some() {
            return Err(ConfigError::BothUrlAndUrlFile);
        }

        let raw_urls: Vec<String> = match &args.url_file {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                let mut urls = Vec::new();
                for line in std::io::BufReader::new(file).lines() {
                    let line = line?;
                    if !line.trim().is_empty() {
                        urls.push(line.trim().to_string());
                    }
                }
                urls
            }
            None => args.urls.clone(),
        };
        if raw_urls.is_empty() {
            return Err(ConfigError::NoUrl);
        }

        let invalid: Vec<String> = raw_urls
            .iter()
            .filter(|u| !is_valid_url(u))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(ConfigError::InvalidUrls(invalid));
        }

        if args.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }

        for format in &args.export {
            if !EXPORT_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidExportFormat(format.clone()));
            }
        }

        let export_filename = match &args.export_filename {
            Some(name) => name.clone(),
            None => default_export_filename(),
        };

        Ok(ScanConfig {
            urls: raw_urls,
            insecure: args.insecure,
            timeout_secs: args.timeout,
            workers: args.workers,
            export_formats: args.export.clone(),
            export_filename,
            max_severity: parse_severity_flag(&args.max_severity)?,
            severity_filter: parse_severity_flag(&args.severity_filter)?,
            plugin_filters: args.plugin_filters.clone(),
        })
    }
}

pub fn parse_severity_flag(flag: &Option<String>) -> Result<Option<Severity>, ConfigError> {
    match flag {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Severity>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidSeverityLevel {
                got: raw.clone(),
                allowed: severities_as_string(),
            }),
    }
}

fn is_valid_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => !u.scheme().is_empty() && u.has_host(),
        Err(_) => false,
    }
}

fn default_export_filename() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("exposcan_{secs}")
}
