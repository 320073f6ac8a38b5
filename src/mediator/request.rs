use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;

/// An immutable command or query, naming the type its handler produces.
pub trait Request: Send + 'static {
    type Response: Send + 'static;
}

/// Executes one use case for one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, DispatchError>;
}
