//! Navigator CLI - Command line tool for exploring map layer metadata.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nav-cli",
    version,
    about = "Ocean navigator map layer toolkit"
)]
struct Cli {
    /// JSON client config (base_url, timeout_secs)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server root, overriding the config file
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: nav_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = nav_cmd::load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    log::debug!("Using server {}", config.base_url);
    nav_cmd::run(config, cli.command).await
}
