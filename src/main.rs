#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = exposcan::cli::parse_cli();
    exposcan::runner::run_from_cli(cli).await
}
