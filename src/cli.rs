use std::path::PathBuf;

use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Scan endpoints to check if services, files or folders are exposed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Scan one or more base URLs against the signature catalog
    Scan(ScanArgs),

    /// List the checks of the signature catalog
    Plugins(PluginsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Base URLs to scan (e.g. https://example.com)
    pub urls: Vec<String>,

    /// Path to the signature file
    #[arg(short = 'c', long, default_value = "signatures.yaml")]
    pub signatures: PathBuf,

    /// Path to a file containing newline-delimited URLs to scan
    #[arg(short = 'u', long)]
    pub url_file: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, default_value_t = false)]
    pub insecure: bool,

    /// Timeout for the HTTP requests, in seconds
    #[arg(short = 't', long, default_value_t = 10)]
    pub timeout: u64,

    /// Number of concurrent scan workers
    #[arg(short = 'w', long, default_value_t = 8)]
    pub workers: usize,

    /// Export formats for the results (csv, json)
    #[arg(short = 'e', long, value_delimiter = ',')]
    pub export: Vec<String>,

    /// Filename for exported files (extension is added per format)
    #[arg(long)]
    pub export_filename: Option<String>,

    /// Exit with an error code if a finding is at least this severe
    #[arg(short = 'b', long)]
    pub max_severity: Option<String>,

    /// Only run checks of this severity
    #[arg(long)]
    pub severity_filter: Option<String>,

    /// Only run plugins owning a check whose name contains one of these
    #[arg(long, value_delimiter = ',')]
    pub plugin_filters: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct PluginsArgs {
    /// Path to the signature file
    #[arg(short = 'c', long, default_value = "signatures.yaml")]
    pub signatures: PathBuf,

    /// Only list checks of this severity
    #[arg(short = 's', long)]
    pub severity: Option<String>,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
