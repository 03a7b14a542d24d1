//! Error types for the cart.

use marketcart_store::StoreError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// A handle was used after its cart scope was closed or dropped.
    ///
    /// This is a programming error on the caller's side.
    #[error("cart handle used outside of an active cart scope")]
    OutOfScope,

    /// Storage error while opening a backend.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The persistence writer is no longer running.
    #[error("cart writer stopped")]
    WriterStopped,
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
