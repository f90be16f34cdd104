use thiserror::Error;

use eggman_core::DomainError;
use eggman_storage::StorageError;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The persisted collection could not be read back.
    #[error("persisted inventory is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to serialize inventory: {0}")]
    Serialize(#[from] serde_json::Error),
}
