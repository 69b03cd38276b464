//! CLI entry point for the hash ring tool.

use clap::Parser;
use cli::CliConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = config.run()?;
    print!("{}", result);
    Ok(())
}
