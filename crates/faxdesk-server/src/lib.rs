//! HTTP transport for the fax pipeline.

mod error;
mod normalize;
mod routes;

use std::net::SocketAddr;

use faxdesk_ai::Pipeline;
use tokio::net::TcpListener;
use tracing::info;

pub use error::{ApiError, DecodingError};
pub use normalize::{BufferedRequest, Normalized, STRATEGIES, Strategy, decode};
pub use routes::{AppState, router};

pub const DEFAULT_LISTEN_ADDR: &str = ":8000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: String,
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Expand a bare `:port` to all interfaces.
pub fn normalize_listen_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    }
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, pipeline: Pipeline) -> std::io::Result<()> {
    let listener = TcpListener::bind(normalize_listen_addr(&config.listen)).await?;
    let local: SocketAddr = listener.local_addr()?;
    info!(listen = %local, model = %pipeline.model_name(), "listening");

    let app = router(AppState { pipeline }, config.body_limit);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
