use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{AppConfig, StorageBackend};
use crate::domain::Product;
use crate::error::{ConfigurationError, RepositoryError};
use crate::mediator::Mediator;
use crate::product;
use crate::repository::{ProductRepositoryRef, SqliteProductRepository, StoreActor};

/// `[storage] path` value that selects a throwaway SQLite database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Failures while bringing the system up or down.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The running product service: a mediator with every product request
/// registered, the storage behind it, and the token that stops it all.
///
/// Responsible for starting up the store, wiring the mediator, and handling shutdown.
pub struct ProductSystem {
    pub mediator: Mediator,
    shutdown: CancellationToken,
    database: Option<SqliteProductRepository>,
    handles: Vec<JoinHandle<()>>,
}

impl ProductSystem {
    pub async fn start(config: &AppConfig) -> Result<Self, SystemError> {
        let storage = &config.storage;
        let mut handles = Vec::new();
        let mut database = None;

        let repository: ProductRepositoryRef = match storage.backend {
            StorageBackend::Memory => {
                let id_counter = Arc::new(AtomicI32::new(1));
                let next_id = move || id_counter.fetch_add(1, Ordering::SeqCst);

                let (actor, client) = StoreActor::<Product>::new(storage.store_buffer, next_id);
                handles.push(tokio::spawn(actor.run()));
                info!("Using in-memory product store");
                Arc::new(client)
            }
            StorageBackend::Sqlite if storage.path.as_os_str() == IN_MEMORY_PATH => {
                info!("Using private in-memory SQLite database");
                let repository = SqliteProductRepository::open_in_memory().await?;
                database = Some(repository.clone());
                Arc::new(repository)
            }
            StorageBackend::Sqlite => {
                let repository =
                    SqliteProductRepository::open(&storage.path, storage.pool_size).await?;
                database = Some(repository.clone());
                Arc::new(repository)
            }
        };

        let mediator = product::register(Mediator::builder(), repository)?.build()?;
        info!("Mediator ready");

        Ok(Self {
            mediator,
            shutdown: CancellationToken::new(),
            database,
            handles,
        })
    }

    /// Token cancelled by [`shutdown`](Self::shutdown). Hand it to the HTTP
    /// server and derive per-request tokens from it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.shutdown.cancel();

        // The store actor stops once the last client (held by the handlers) is gone.
        drop(self.mediator);

        if let Some(database) = self.database {
            database.close().await;
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
