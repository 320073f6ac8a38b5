use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::{cancellable, ProductRepository};
use crate::domain::{Product, ProductDto};
use crate::error::RepositoryError;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A record the store actor can own.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Ord + Hash + Copy + Send + Sync + Display + Debug;

    /// The id, or `None` when the store should assign one.
    fn assigned_id(&self) -> Option<Self::Id>;

    fn with_id(self, id: Self::Id) -> Self;
}

impl Entity for Product {
    type Id = i32;

    fn assigned_id(&self) -> Option<i32> {
        (self.id != 0).then_some(self.id)
    }

    fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum StoreRequest<T: Entity> {
    Insert {
        item: T,
        respond_to: Response<Option<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Replace {
        item: T,
        respond_to: Response<Option<T>>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
}

// =============================================================================
// 3. THE ACTOR
// =============================================================================

/// Owns the records. All access goes through its inbox, one message at a
/// time, so no locking is needed.
pub struct StoreActor<T: Entity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> StoreActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, StoreClient::new(sender))
    }

    #[instrument(name = "product_store", skip(self))]
    pub async fn run(mut self) {
        info!("Store starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { item, respond_to } => {
                    let _ = respond_to.send(self.insert(item));
                }
                StoreRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(self.store.get(&id).cloned());
                }
                StoreRequest::List { respond_to } => {
                    let mut items: Vec<T> = self.store.values().cloned().collect();
                    items.sort_by_key(|item| item.assigned_id());
                    let _ = respond_to.send(items);
                }
                StoreRequest::Replace { item, respond_to } => {
                    let replaced = item.assigned_id().and_then(|id| {
                        self.store.get_mut(&id).map(|slot| {
                            *slot = item.clone();
                            item
                        })
                    });
                    let _ = respond_to.send(replaced);
                }
                StoreRequest::Remove { id, respond_to } => {
                    let _ = respond_to.send(self.store.remove(&id));
                }
            }
        }
        info!("Store stopped");
    }

    fn insert(&mut self, item: T) -> Option<T> {
        let id = match item.assigned_id() {
            Some(id) if self.store.contains_key(&id) => {
                debug!(%id, "Insert rejected, id taken");
                return None;
            }
            Some(id) => id,
            None => self.fresh_id(),
        };
        let item = item.with_id(id);
        self.store.insert(id, item.clone());
        debug!(%id, "Inserted");
        Some(item)
    }

    fn fresh_id(&self) -> T::Id {
        loop {
            let id = (self.next_id_fn)();
            if !self.store.contains_key(&id) {
                return id;
            }
        }
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

#[derive(Clone)]
pub struct StoreClient<T: Entity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Entity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Response<R>) -> StoreRequest<T>,
        cancel: &CancellationToken,
    ) -> Result<R, RepositoryError> {
        cancellable(cancel, async {
            debug!("Sending request");
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(request(respond_to))
                .await
                .map_err(|_| RepositoryError::Unavailable("Store closed".to_string()))?;
            response
                .await
                .map_err(|_| RepositoryError::Unavailable("Store dropped request".to_string()))
        })
        .await
    }

    pub async fn insert(&self, item: T, cancel: &CancellationToken) -> Result<Option<T>, RepositoryError> {
        self.call(|respond_to| StoreRequest::Insert { item, respond_to }, cancel).await
    }

    pub async fn get(&self, id: T::Id, cancel: &CancellationToken) -> Result<Option<T>, RepositoryError> {
        self.call(|respond_to| StoreRequest::Get { id, respond_to }, cancel).await
    }

    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<T>, RepositoryError> {
        self.call(|respond_to| StoreRequest::List { respond_to }, cancel).await
    }

    pub async fn replace(&self, item: T, cancel: &CancellationToken) -> Result<Option<T>, RepositoryError> {
        self.call(|respond_to| StoreRequest::Replace { item, respond_to }, cancel).await
    }

    pub async fn remove(&self, id: T::Id, cancel: &CancellationToken) -> Result<Option<T>, RepositoryError> {
        self.call(|respond_to| StoreRequest::Remove { id, respond_to }, cancel).await
    }
}

// =============================================================================
// 5. THE PORT ADAPTER
// =============================================================================

#[async_trait]
impl ProductRepository for StoreClient<Product> {
    #[instrument(skip(self, cancel))]
    async fn add(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let product = Product::try_from(item)?;
        Ok(self.insert(product, cancel).await?.map(ProductDto::from))
    }

    #[instrument(skip(self, cancel))]
    async fn get_by_id(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        Ok(self.get(id, cancel).await?.map(ProductDto::from))
    }

    #[instrument(skip(self, cancel))]
    async fn get_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Option<ProductDto>>>, RepositoryError> {
        let products = self.list(cancel).await?;
        Ok(Some(
            products.into_iter().map(|p| Some(ProductDto::from(p))).collect(),
        ))
    }

    #[instrument(skip(self, cancel))]
    async fn update(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        let product = Product::try_from(item)?;
        Ok(self.replace(product, cancel).await?.map(ProductDto::from))
    }

    #[instrument(skip(self, cancel))]
    async fn delete(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        Ok(self.remove(id, cancel).await?.map(ProductDto::from))
    }
}
