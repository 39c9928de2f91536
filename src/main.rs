use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod config;
mod dashboard;
mod engine;
mod error;
mod model;
mod source;

use config::Config;
use dashboard::{load_dataset, AppState, DashboardController};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let source = source::build_source(&config.source_spec()?, config.fetch_timeout())?;
    info!("Prediction source: {}", source.name());

    let controller = DashboardController::shared();

    // Single initial load; the dashboard reports "empty" until it lands and
    // "load_failed" if it does not.
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            load_dataset(&controller, source.as_ref()).await;
        });
    }

    let app = dashboard::router(AppState {
        controller,
        theme: config.theme,
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
