//! Ice Breaker - HTTP Server Entry Point
//!
//! Starts the HTTP server that serves the front end and the lookup API.

use icebreaker::{api, config::Config, config::ProfileSourceKind};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "icebreaker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let source = match &config.profile_source {
        ProfileSourceKind::Fixture { .. } => "fixture",
        ProfileSourceKind::Proxycurl { .. } => "proxycurl",
    };
    info!(
        "Loaded configuration: deployment={}, profile_source={}",
        config.llm.deployment, source
    );

    api::serve(config).await?;

    Ok(())
}
