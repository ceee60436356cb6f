use anyhow::{Context, Result};
use clap::Parser;
use gemini_answer_proxy::models::Config;
use gemini_answer_proxy::proxy::AnswerProxy;
use gemini_answer_proxy::server::{self, AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-answer-proxy")]
#[command(about = "Serve /ask by forwarding questions to the Gemini API")]
struct CliArgs {
    /// Host to bind; overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind; overrides PORT.
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_answer_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gemini-answer-proxy");

    let args = CliArgs::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let state = AppState::new(AnswerProxy::from_config(&config));

    if let Err(e) = server::serve(&config.bind_addr(), state, shutdown_signal()).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
