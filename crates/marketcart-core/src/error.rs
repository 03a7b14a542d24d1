//! Error types for the marketcart core.

use thiserror::Error;

use crate::types::ProductId;

/// Errors raised while encoding, decoding, or validating a cart snapshot.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("snapshot lists product {0} more than once")]
    DuplicateId(ProductId),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
