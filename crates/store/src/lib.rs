//! Local persistence for CareSync.
//!
//! - [`storage`]: key-value backends (memory and file)
//! - [`entity_store`]: typed whole-collection reads and writes
//! - [`bus`]: cross-context change notifications
//! - [`seed`]: demo data for first open

pub mod bus;
pub mod entity_store;
mod error;
pub mod seed;
pub mod storage;

pub use bus::{BusHandle, ChangeBus, ChangeNotice, ContextId, EntityKind, Subscription, SubscriptionGuard};
pub use entity_store::{Collection, EntityStore};
pub use error::{StoreError, StoreResult};
pub use seed::SeedData;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockKeyValueStorage;
