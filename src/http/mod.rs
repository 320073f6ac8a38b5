//! HTTP boundary over the mediator.

mod error;
mod handlers;
mod routes;

pub use routes::create_router;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::mediator::Mediator;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub mediator: Mediator,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(mediator: Mediator, shutdown: CancellationToken) -> Self {
        Self { mediator, shutdown }
    }

    /// Fresh token for one request; cancelled when the server shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Serves the router on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let router = create_router(state);
    info!(addr = ?listener.local_addr().ok(), "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            info!("HTTP server received shutdown signal");
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
