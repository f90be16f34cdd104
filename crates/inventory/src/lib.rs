//! Equipment inventory domain.
//!
//! [`InventoryStore`] owns the equipment collection, the form draft and the
//! list filters, and mirrors the collection into a [`KeyValueStore`] after
//! every mutation. Rendering is left to the caller: it reads derived views,
//! invokes operations, and listens on [`InventoryStore::subscribe`].
//!
//! [`KeyValueStore`]: eggman_storage::KeyValueStore

pub mod equipment;
pub mod error;
pub mod filter;
pub mod interaction;
pub mod store;

pub use equipment::{CATEGORY_OPTIONS, Equipment, EquipmentDraft, EquipmentId, EquipmentStatus};
pub use error::{InventoryError, InventoryResult};
pub use filter::{EquipmentFilter, InventorySummary};
pub use interaction::{Confirm, DELETE_PROMPT, FOCUS_DELAY, FocusRequest, FormField};
pub use store::{DeleteOutcome, InventoryChange, InventoryStore, SaveOutcome, STORAGE_KEY};
