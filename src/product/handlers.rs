use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::commands::{CreateProductCommand, DeleteProductCommand, UpdateProductCommand};
use super::error::ProductError;
use super::queries::{GetAllProductsQuery, GetProductByIdQuery};
use crate::domain::ProductDto;
use crate::error::DispatchError;
use crate::mediator::RequestHandler;
use crate::repository::ProductRepositoryRef;

// =============================================================================
// COMMAND HANDLERS
// =============================================================================

pub struct CreateProductHandler {
    repository: ProductRepositoryRef,
}

impl CreateProductHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<CreateProductCommand> for CreateProductHandler {
    /// Stores the product unless one with the same id already exists.
    ///
    /// # Errors
    /// - `ProductAlreadyExists` if the id is taken
    /// - `CreateFailed` if the store reports nothing stored
    #[instrument(name = "create_product", skip_all, fields(product_id = ?request.product.as_ref().and_then(|p| p.id)))]
    async fn handle(
        &self,
        request: CreateProductCommand,
        cancel: &CancellationToken,
    ) -> Result<ProductDto, DispatchError> {
        let product = request.product.ok_or(ProductError::ItemCanNotBeNull)?;

        // Without an id the store assigns one, so there is nothing to collide with.
        if let Some(id) = product.id {
            if self.repository.get_by_id(id, cancel).await?.is_some() {
                warn!("Product already exists");
                return Err(ProductError::ProductAlreadyExists.into());
            }
        }

        let Some(created) = self.repository.add(product, cancel).await? else {
            warn!("Store did not create product");
            return Err(ProductError::CreateFailed.into());
        };

        info!(id = ?created.id, "Product created");
        Ok(created)
    }
}

pub struct UpdateProductHandler {
    repository: ProductRepositoryRef,
}

impl UpdateProductHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<UpdateProductCommand> for UpdateProductHandler {
    #[instrument(name = "update_product", skip_all, fields(product_id = ?request.product.as_ref().and_then(|p| p.id)))]
    async fn handle(
        &self,
        request: UpdateProductCommand,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, DispatchError> {
        let product = request.product.ok_or(ProductError::ItemCanNotBeNull)?;
        let id = product.id.ok_or(ProductError::IdIsRequired)?;

        if self.repository.get_by_id(id, cancel).await?.is_none() {
            warn!("Product not found");
            return Err(ProductError::DataNotFound.into());
        }

        let updated = self.repository.update(product, cancel).await?;
        info!(stored = updated.is_some(), "Product updated");
        Ok(updated)
    }
}

pub struct DeleteProductHandler {
    repository: ProductRepositoryRef,
}

impl DeleteProductHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DeleteProductCommand> for DeleteProductHandler {
    /// An empty result from the store after the existence check is returned
    /// as-is, not treated as a failure.
    #[instrument(name = "delete_product", skip_all, fields(product_id = ?request.id))]
    async fn handle(
        &self,
        request: DeleteProductCommand,
        cancel: &CancellationToken,
    ) -> Result<Option<ProductDto>, DispatchError> {
        let id = request.id.ok_or(ProductError::IdIsRequired)?;

        if self.repository.get_by_id(id, cancel).await?.is_none() {
            warn!("Product not found");
            return Err(ProductError::DataNotFound.into());
        }

        let deleted = self.repository.delete(id, cancel).await?;
        info!(removed = deleted.is_some(), "Product deleted");
        Ok(deleted)
    }
}

// =============================================================================
// QUERY HANDLERS
// =============================================================================

pub struct GetProductByIdHandler {
    repository: ProductRepositoryRef,
}

impl GetProductByIdHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetProductByIdQuery> for GetProductByIdHandler {
    #[instrument(name = "get_product", skip_all, fields(product_id = ?request.id))]
    async fn handle(
        &self,
        request: GetProductByIdQuery,
        cancel: &CancellationToken,
    ) -> Result<ProductDto, DispatchError> {
        let id = request.id.ok_or(ProductError::IdIsRequired)?;

        match self.repository.get_by_id(id, cancel).await? {
            Some(product) => Ok(product),
            None => {
                warn!("Product not found");
                Err(ProductError::DataNotFound.into())
            }
        }
    }
}

pub struct GetAllProductsHandler {
    repository: ProductRepositoryRef,
}

impl GetAllProductsHandler {
    pub fn new(repository: ProductRepositoryRef) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetAllProductsQuery> for GetAllProductsHandler {
    /// An empty list is a valid answer; only an absent collection is
    /// `DataNotFound`.
    #[instrument(name = "get_all_products", skip_all)]
    async fn handle(
        &self,
        _request: GetAllProductsQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<Option<ProductDto>>, DispatchError> {
        match self.repository.get_all(cancel).await? {
            Some(products) => {
                info!(count = products.len(), "Products listed");
                Ok(products)
            }
            None => {
                warn!("Product collection absent");
                Err(ProductError::DataNotFound.into())
            }
        }
    }
}
