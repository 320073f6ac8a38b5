use thiserror::Error;

use crate::domain::MappingError;
use crate::product::ProductError;
use crate::validation::ValidationFailure;

/// Raised by the pipeline before any handler runs. Carries only the first
/// failing rule, even when several rules failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .failure.error_message)]
pub struct ValidationError {
    pub failure: ValidationFailure,
}

impl ValidationError {
    pub fn message(&self) -> &str {
        &self.failure.error_message
    }

    pub fn property_name(&self) -> &str {
        &self.failure.property_name
    }
}

/// Wiring mistakes in the request registry. These are programming errors,
/// not something a caller can fix by changing the request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No handler registered for {0}")]
    MissingHandler(&'static str),
    #[error("More than one handler registered for {0}")]
    DuplicateHandler(&'static str),
}

/// Failures reported by a repository adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Repository operation cancelled")]
    Cancelled,
    #[error("Product store unavailable: {0}")]
    Unavailable(String),
    #[error("Product database error: {0}")]
    Database(String),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

/// Everything `Mediator::send` can fail with. Handler errors pass through
/// unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
