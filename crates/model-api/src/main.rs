//! Model jobs REST API server: /models, /models/{id}, /models/{id}/results.

use model_api::config::ServerConfig;
use model_api::server::{self, AppState};
use model_store::InMemoryModelStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let store: Arc<dyn model_types::ModelStore> = Arc::new(InMemoryModelStore::new());
    let state = Arc::new(AppState::from_config(store, &config));
    if state.engine.is_some() {
        tracing::info!(step_ms = config.engine.step.as_millis() as u64, "simulated engine enabled");
    }

    let app = server::router(state);
    tracing::info!("model API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
