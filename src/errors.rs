use thiserror::Error;

/// Errors raised while loading or validating a signature catalog.
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("path of signatures file is not valid: {0}")]
    InvalidPath(String),

    #[error("failed to read signatures file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse signatures file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} is not a valid severity")]
    InvalidSeverity(String),

    #[error("missing or empty {field} in {check} plugin checks")]
    InvalidCheckField { check: String, field: String },

    #[error("invalid header format: {0} should be \"KEY:VALUE\"")]
    InvalidHeaderFormat(String),

    #[error("endpoint and endpoints can't be set at the same time in a plugin")]
    BothEndpointAndEndpoints,

    #[error("plugin has no endpoint")]
    MissingEndpoint,
}

impl SignatureError {
    pub fn invalid_check_field(check: &str, field: &str) -> Self {
        SignatureError::InvalidCheckField {
            check: check.to_string(),
            field: field.to_string(),
        }
    }
}

/// Error raised by the check predicate evaluator.
///
/// Malformed header specs are normally rejected at catalog load time; this
/// is the defensive fallback for catalogs built in memory.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EvaluateError {
    #[error("invalid header format: {0} should be \"KEY:VALUE\"")]
    InvalidHeaderFormat(String),
}

/// Errors crossing the scan coordinator boundary.
///
/// Only configuration problems surface here: fetch and evaluation failures
/// are isolated per job and never abort a scan.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanError {
    #[error("no urls to scan")]
    NoUrls,

    #[error("worker count must be positive (got {0})")]
    InvalidWorkerCount(usize),
}

/// Errors raised by the HTTP fetchers.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server refused the connection for {url}")]
    Refused { url: String },
}

/// Errors raised while building the scan configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no url provided, pass one as an argument or use --url-file")]
    NoUrl,

    #[error("can't pass urls as arguments together with --url-file")]
    BothUrlAndUrlFile,

    #[error("invalid urls: {}", .0.join(", "))]
    InvalidUrls(Vec<String>),

    #[error("the number of workers must be positive")]
    InvalidWorkerCount,

    #[error("invalid export format: {0}, expected csv or json")]
    InvalidExportFormat(String),

    #[error("invalid severity level: {got}, please use: {allowed}")]
    InvalidSeverityLevel { got: String, allowed: String },

    #[error("failed to read url file: {0}")]
    UrlFile(#[from] std::io::Error),
}
