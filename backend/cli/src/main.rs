mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crumb_gateway::{build_router, start_server, EnvCredentials, GatewayState, VoidAiUpstream};
use crumb_tui::{HttpRelayClient, StreamConsumer};

use config::Config;

#[derive(Parser)]
#[command(name = "crumb")]
#[command(about = "Crumb: streaming chat relay and terminal client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Open the terminal chat client
    Chat {
        /// Relay endpoint to post chat requests to
        #[arg(long)]
        relay_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            crumb_logging::init_logger(&config.log_dir, &config.log_level, true);
            run_server(config).await?;
        }
        Commands::Chat { relay_url } => {
            let config = Config {
                relay_url: relay_url.or(config.relay_url),
                ..config
            };
            // The terminal owns stdout/stderr while the UI runs.
            crumb_logging::init_logger(&config.log_dir, &config.log_level, false);
            run_chat(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;
    info!(
        port = config.port,
        bind = %config.bind_address,
        upstream = %config.upstream_base_url,
        "Starting Crumb relay"
    );

    let upstream = VoidAiUpstream::new().with_base_url(&config.upstream_base_url);
    let state = GatewayState::new(Arc::new(upstream), Arc::new(EnvCredentials::default()));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    start_server(addr, app).await
}

async fn run_chat(config: Config) -> Result<()> {
    let relay_url = config.relay_url();
    info!(relay = %relay_url, "Starting Crumb chat");

    let consumer = StreamConsumer::new(HttpRelayClient::new(relay_url))
        .with_system_prompt(config.system_prompt());

    crumb_tui::terminal::run(Arc::new(consumer)).await
}
