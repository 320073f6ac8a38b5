//! # Mediator
//!
//! Command/query dispatch with validation in front of every handler.
//!
//! 1. Define a request type and implement [`Request`] for it, naming the result.
//! 2. Implement [`RequestHandler`] for that request.
//! 3. Optionally add one or more [`Validator`](crate::validation::Validator)s.
//! 4. Register everything on a [`MediatorBuilder`] and call `build()`.
//!
//! ```rust,ignore
//! let mediator = Mediator::builder()
//!     .validator::<GetProductByIdQuery, _>(GetProductByIdValidator::new())
//!     .handler::<GetProductByIdQuery, _>(GetProductByIdHandler::new(repository))?
//!     .build()?;
//!
//! let product = mediator.send(GetProductByIdQuery::new(1), &cancel).await?;
//! ```

mod dispatcher;
mod request;

pub use dispatcher::*;
pub use request::*;
