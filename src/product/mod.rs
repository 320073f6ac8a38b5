//! Product use cases: the commands and queries, their validators, their
//! handlers, and the errors the handlers raise.

mod commands;
mod error;
mod handlers;
mod queries;
mod validators;

pub use commands::*;
pub use error::*;
pub use handlers::*;
pub use queries::*;
pub use validators::*;

use crate::error::ConfigurationError;
use crate::mediator::MediatorBuilder;
use crate::repository::ProductRepositoryRef;

/// Registers every product validator and handler on `builder`, all sharing
/// one repository.
pub fn register(
    builder: MediatorBuilder,
    repository: ProductRepositoryRef,
) -> Result<MediatorBuilder, ConfigurationError> {
    builder
        .validator::<CreateProductCommand, _>(CreateProductValidator::new())
        .validator::<UpdateProductCommand, _>(UpdateProductValidator::new())
        .validator::<DeleteProductCommand, _>(DeleteProductValidator::new())
        .validator::<GetProductByIdQuery, _>(GetProductByIdValidator::new())
        .handler::<CreateProductCommand, _>(CreateProductHandler::new(repository.clone()))?
        .handler::<UpdateProductCommand, _>(UpdateProductHandler::new(repository.clone()))?
        .handler::<DeleteProductCommand, _>(DeleteProductHandler::new(repository.clone()))?
        .handler::<GetProductByIdQuery, _>(GetProductByIdHandler::new(repository.clone()))?
        .handler::<GetAllProductsQuery, _>(GetAllProductsHandler::new(repository))
}
