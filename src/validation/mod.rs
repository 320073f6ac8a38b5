//! Declarative rule sets for checking requests before they reach a handler.

mod rules;

pub use rules::*;
