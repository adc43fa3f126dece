use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::ServerError;
use relay::Relay;

pub mod config;
pub mod error;
mod handlers;
pub mod relay;
mod websocket;

pub use handlers::GREETING;

#[derive(Clone, Default)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whiteboard_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
        .layer(config.cors_layer())
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
