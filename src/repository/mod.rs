//! Repository port for products, plus the adapters that implement it.
//!
//! - [`StoreClient`] talks to an in-memory store actor ([`StoreActor`]).
//! - [`SqliteProductRepository`] persists to SQLite through a sqlx pool.
//!
//! Every operation takes a [`CancellationToken`]; a cancelled token turns the
//! call into [`RepositoryError::Cancelled`].

mod sqlite;
mod store_actor;

pub use sqlite::SqliteProductRepository;
pub use store_actor::StoreActor;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::ProductDto;
use crate::error::RepositoryError;

/// Persistence capability consumed by the product handlers.
///
/// "Empty" results (`Ok(None)`) are not errors here; handlers decide what an
/// absent product means for their use case.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores a new product. Returns the stored record, or `None` if nothing
    /// was stored (e.g. the id is taken).
    async fn add(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError>;

    async fn get_by_id(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError>;

    /// All products. The outer `None` means the collection itself is absent,
    /// which is different from an empty list. Inner `None`s are records that
    /// could not be mapped and are kept as placeholders.
    async fn get_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Option<ProductDto>>>, RepositoryError>;

    /// Replaces the whole record with the same id.
    async fn update(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError>;

    /// Removes a product and returns what was removed.
    async fn delete(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError>;
}

/// Thread-safe reference to a product repository
pub type ProductRepositoryRef = Arc<dyn ProductRepository>;

/// Runs `operation` unless `cancel` fires first.
pub(crate) async fn cancellable<F, T, E>(
    cancel: &CancellationToken,
    operation: F,
) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<RepositoryError>,
{
    if cancel.is_cancelled() {
        return Err(RepositoryError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
        result = operation => result.map_err(Into::into),
    }
}
