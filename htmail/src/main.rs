//! htmail server
//!
//! # Usage
//!
//! ```bash
//! htmail                                  # ./config.toml, env vars, defaults
//! htmail --config /etc/htmail/prod.toml   # explicit configuration file
//! htmail --bind 127.0.0.1:9000            # override the listen address
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use htmail::{api, config::HtmailConfig, email, observability, state::AppState, template::TemplateStore};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "htmail")]
#[command(version)]
#[command(about = "Render HTML email templates and send them over SMTP", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the standard search locations)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Socket address to listen on, overriding `server.bind`
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HtmailConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => HtmailConfig::load().context("failed to load configuration")?,
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    observability::init()?;

    TemplateStore::from_settings(&config.templates)
        .ensure_dir()
        .await
        .with_context(|| {
            format!(
                "failed to create template directory {}",
                config.templates.dir.display()
            )
        })?;

    info!(
        bind = %config.server.bind,
        templates = %config.templates.dir.display(),
        backend = ?config.email.backend,
        smtp_host = %config.smtp.host,
        "Starting htmail"
    );

    let sender = email::backend_from_config(&config);
    let bind = config.server.bind.clone();
    let app = api::router(AppState::new(config, sender));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
