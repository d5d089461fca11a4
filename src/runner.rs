use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{Cli, Commands, PluginsArgs, ScanArgs};
use crate::config::{parse_severity_flag, ScanConfig};
use crate::output::{write_checks_table, write_table, ExporterRegistry};
use crate::scan::Scanner;
use crate::signatures::Signatures;

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Configure logging based on global flags. Keep external crates
    // (reqwest/hyper) at INFO to avoid flooding the CLI.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter_str = format!("exposcan={crate_level},reqwest=info,hyper=info,h2=info");
    let env_filter =
        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Plugins(args) => run_plugins(args),
    }
}

async fn run_scan(args: ScanArgs) -> anyhow::Result<()> {
    let config = ScanConfig::from_args(&args)?;

    let mut signatures =
        Signatures::load_file(&args.signatures).context("failed to load signatures")?;
    if let Some(severity) = config.severity_filter {
        signatures = signatures.filter_by_severity(severity);
    }
    if !config.plugin_filters.is_empty() {
        signatures = signatures.filter_by_names(&config.plugin_filters);
    }
    info!(
        plugins = signatures.plugins.len(),
        checks = signatures.check_count(),
        "signatures loaded"
    );

    // Ctrl-C cancels cooperatively: running requests finish, partial
    // results are still reported.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("keyboard interrupt detected, cleaning up before terminating");
                cancel.cancel();
            }
        });
    }

    let scanner = Scanner::from_config(&config, signatures);
    let report = scanner.run(&config.urls, cancel).await?;
    info!(elapsed = ?report.elapsed, "scan execution time");

    if report.findings.is_empty() {
        println!("No exposures found.");
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    write_table(&report.findings, &mut stdout)?;

    let registry = ExporterRegistry::standard();
    for format in &config.export_formats {
        let path = registry.export_to_file(format, &config.export_filename, &report.findings)?;
        println!("Results exported to {}", path.display());
    }

    if let Some(threshold) = config.max_severity {
        let reached = report
            .findings
            .iter()
            .any(|f| f.severity.reaches(threshold));
        if reached {
            anyhow::bail!("max severity level ({threshold}) reached, exiting with error code");
        }
    }
    Ok(())
}

fn run_plugins(args: PluginsArgs) -> anyhow::Result<()> {
    let signatures =
        Signatures::load_file(&args.signatures).context("failed to load signatures")?;
    let severity = parse_severity_flag(&args.severity)?;

    let mut stdout = std::io::stdout();
    write_checks_table(&signatures, severity, &mut stdout)?;
    Ok(())
}
