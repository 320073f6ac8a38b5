//! # Mock Framework
//!
//! Utilities for testing handlers in isolation.
//!
//! Use [`create_mock_repository`] to get a repository and a receiver.
//! Then use helpers like [`expect_get_by_id`] or [`expect_add`] to assert behavior.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::domain::ProductDto;
use crate::error::RepositoryError;
use crate::repository::{cancellable, ProductRepository};

pub type Reply<T> = oneshot::Sender<Result<T, RepositoryError>>;

/// One call made against the mock, with the channel to answer it on.
#[derive(Debug)]
pub enum RepositoryCall {
    Add {
        item: ProductDto,
        respond_to: Reply<Option<ProductDto>>,
    },
    GetById {
        id: i32,
        respond_to: Reply<Option<ProductDto>>,
    },
    GetAll {
        respond_to: Reply<Option<Vec<Option<ProductDto>>>>,
    },
    Update {
        item: ProductDto,
        respond_to: Reply<Option<ProductDto>>,
    },
    Delete {
        id: i32,
        respond_to: Reply<Option<ProductDto>>,
    },
}

/// Repository whose every call is forwarded to a channel the test controls.
#[derive(Clone)]
pub struct MockRepository {
    sender: mpsc::Sender<RepositoryCall>,
}

/// Creates a mock repository and a receiver for asserting calls.
///
/// # Testing Strategy
/// Handlers only see the [`ProductRepository`] port. Instead of a real store,
/// each call arrives on `receiver` as a [`RepositoryCall`]; the test checks the
/// arguments and decides the reply (a record, an empty result, an error).
/// A call the test never expected shows up as an extra message, and a call
/// that never happened shows up as an empty receiver.
pub fn create_mock_repository(buffer_size: usize) -> (MockRepository, mpsc::Receiver<RepositoryCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockRepository { sender }, receiver)
}

impl MockRepository {
    async fn call<T>(
        &self,
        call: impl FnOnce(Reply<T>) -> RepositoryCall,
        cancel: &CancellationToken,
    ) -> Result<T, RepositoryError> {
        cancellable(cancel, async {
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(call(respond_to))
                .await
                .map_err(|_| RepositoryError::Unavailable("Mock closed".to_string()))?;
            response
                .await
                .map_err(|_| RepositoryError::Unavailable("Mock dropped reply".to_string()))?
        })
        .await
    }
}

#[async_trait]
impl ProductRepository for MockRepository {
    async fn add(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        self.call(|respond_to| RepositoryCall::Add { item, respond_to }, cancel).await
    }

    async fn get_by_id(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        self.call(|respond_to| RepositoryCall::GetById { id, respond_to }, cancel).await
    }

    async fn get_all(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Option<ProductDto>>>, RepositoryError> {
        self.call(|respond_to| RepositoryCall::GetAll { respond_to }, cancel).await
    }

    async fn update(
        &self,
        item: ProductDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        self.call(|respond_to| RepositoryCall::Update { item, respond_to }, cancel).await
    }

    async fn delete(
        &self,
        id: i32,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, RepositoryError> {
        self.call(|respond_to| RepositoryCall::Delete { id, respond_to }, cancel).await
    }
}

/// Helper to verify that the next call is an Add
pub async fn expect_add(
    receiver: &mut mpsc::Receiver<RepositoryCall>,
) -> Option<(ProductDto, Reply<Option<ProductDto>>)> {
    match receiver.recv().await {
        Some(RepositoryCall::Add { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a GetById
pub async fn expect_get_by_id(
    receiver: &mut mpsc::Receiver<RepositoryCall>,
) -> Option<(i32, Reply<Option<ProductDto>>)> {
    match receiver.recv().await {
        Some(RepositoryCall::GetById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a GetAll
pub async fn expect_get_all(
    receiver: &mut mpsc::Receiver<RepositoryCall>,
) -> Option<Reply<Option<Vec<Option<ProductDto>>>>> {
    match receiver.recv().await {
        Some(RepositoryCall::GetAll { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is an Update
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<RepositoryCall>,
) -> Option<(ProductDto, Reply<Option<ProductDto>>)> {
    match receiver.recv().await {
        Some(RepositoryCall::Update { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a Delete
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<RepositoryCall>,
) -> Option<(i32, Reply<Option<ProductDto>>)> {
    match receiver.recv().await {
        Some(RepositoryCall::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_repository() {
        let (repository, mut receiver) = create_mock_repository(10);

        let lookup = tokio::spawn(async move {
            repository.get_by_id(9, &CancellationToken::new()).await
        });

        let (id, responder) = expect_get_by_id(&mut receiver).await.expect("Expected GetById call");
        assert_eq!(id, 9);
        responder.send(Ok(Some(ProductDto::new(Some(9), "Pen")))).unwrap();

        let result = lookup.await.unwrap();
        assert_eq!(result, Ok(Some(ProductDto::new(Some(9), "Pen"))));
    }
}
