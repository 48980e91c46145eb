use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatrelay::connector::api::http_server;
use chatrelay::{Commands, Container, RelayConfig, Router};

#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML configuration file; CHATRELAY_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    #[arg(long, global = true)]
    memory_storage: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = RelayConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.memory_storage {
        config.memory_storage = true;
    }

    let container = Container::new(config)?;

    if let Commands::Serve { port, public } = cli.command {
        let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
        let addr = SocketAddr::from((host, port));
        info!("Starting HTTP trigger on {}", addr);
        return http_server::serve(Arc::new(container), addr).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output.text);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
