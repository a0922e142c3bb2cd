//! Railway receipt extraction web service.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rrx_core::models::config::RrxConfig;
use rrx_core::{ModelExtractor, OpenAiBackend};
use rrx_web::{AppState, app};

/// Serve the upload page and extraction API
#[derive(Parser)]
#[command(name = "rrx-web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RrxConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let model = match OpenAiBackend::from_env(&config.llm.backend_settings()) {
        Ok(backend) => {
            info!("Model extraction enabled ({})", config.llm.model);
            Some(ModelExtractor::new(backend, &config.llm))
        }
        Err(e) => {
            warn!("Model extraction disabled: {}", e);
            None
        }
    };

    let bind = config.server.bind.clone();
    let router = app(AppState::new(config, model));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("rrx-web listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
