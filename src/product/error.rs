use thiserror::Error;

/// Use-case violations raised by the product handlers. Each kind has a fixed
/// description.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("Product is already exist")]
    ProductAlreadyExists,
    #[error("Creation was not successed.")]
    CreateFailed,
    #[error("Product does not exist")]
    DataNotFound,
    #[error("Product item can not be null.")]
    ItemCanNotBeNull,
    #[error("Id can not be null")]
    IdIsRequired,
}
