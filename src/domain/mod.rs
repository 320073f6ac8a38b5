//! Product data shapes and the mapping between transfer and stored forms.

pub mod product;

pub use product::*;
