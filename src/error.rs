use thiserror::Error;

use crate::bus::ItemId;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SiteError>;

/// Site tree error types.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A state transition the item's current state does not allow.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// No item with this id exists in the tree.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// I/O errors from a variant's backing storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
