//! loresheet-server - character sheet HTTP daemon

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use loresheet_server::config::{Overrides, CONFIG_FILE};
use loresheet_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "loresheet-server")]
#[command(about = "Serve actor records, character sheets and skill rolls over HTTP")]
struct Args {
    /// Config file (TOML)
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory of actor JSON files
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory of static front-end files
    #[arg(long)]
    public: Option<PathBuf>,

    /// Tooltip glossary (JSON or YAML)
    #[arg(long)]
    tooltips: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loresheet=info,loresheet_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let overrides = Overrides {
        bind_addr: args.bind,
        data_dir: args.data,
        public_dir: args.public,
        tooltips: args.tooltips,
    };
    let config = ServerConfig::load(&args.config, overrides)
        .with_context(|| format!("invalid configuration ({})", args.config.display()))?;
    tracing::info!(
        data = %config.data_dir.display(),
        public = %config.public_dir.display(),
        "starting loresheet-server"
    );

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
