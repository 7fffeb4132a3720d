//! Error types for reltime-engine operations.
//!
//! An unrecognised phrase is not an error: it resolves to
//! [`ContextFlag::NoMatch`](crate::grammar::ContextFlag::NoMatch).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Overflow: {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
