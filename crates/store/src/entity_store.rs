//! Typed collection access over a key-value backend.
//!
//! Every collection lives whole in one slot as a JSON array; a write
//! replaces the entire array. The session slot holds the signed-in user id
//! as a raw string.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use domain::{
    ElderlyProfile, Task, User, STORAGE_KEY_ELDERLY, STORAGE_KEY_SESSION, STORAGE_KEY_TASKS,
    STORAGE_KEY_THEME, STORAGE_KEY_USERS,
};

use crate::bus::EntityKind;
use crate::error::{StoreError, StoreResult};
use crate::seed::SeedData;
use crate::storage::KeyValueStorage;

/// An entity type persisted as one whole-array slot
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KEY: &'static str;
    const KIND: EntityKind;
}

impl Collection for User {
    const KEY: &'static str = STORAGE_KEY_USERS;
    const KIND: EntityKind = EntityKind::Users;
}

impl Collection for ElderlyProfile {
    const KEY: &'static str = STORAGE_KEY_ELDERLY;
    const KIND: EntityKind = EntityKind::Profiles;
}

impl Collection for Task {
    const KEY: &'static str = STORAGE_KEY_TASKS;
    const KIND: EntityKind = EntityKind::Tasks;
}

impl EntityKind {
    /// Storage slot holding this collection
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Tasks => Task::KEY,
            EntityKind::Users => User::KEY,
            EntityKind::Profiles => ElderlyProfile::KEY,
        }
    }
}

/// Collection-level persistence shared by every context on the device.
#[derive(Clone)]
pub struct EntityStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl EntityStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Open a store, seeding any collection slot that is still absent.
    pub async fn open(storage: Arc<dyn KeyValueStorage>, seed: Option<SeedData>) -> StoreResult<Self> {
        let store = Self::new(storage);
        if let Some(seed) = seed {
            store.seed(&seed).await?;
        }
        Ok(store)
    }

    async fn seed(&self, seed: &SeedData) -> StoreResult<()> {
        let users = self.initialize_if_absent(&seed.users).await?;
        let profiles = self.initialize_if_absent(&seed.profiles).await?;
        let tasks = self.initialize_if_absent(&seed.tasks).await?;
        if users || profiles || tasks {
            tracing::info!(users, profiles, tasks, "seeded default collections");
        }
        Ok(())
    }

    /// Read a whole collection. An absent slot reads as empty; an unparsable
    /// one is an error so it never gets silently overwritten.
    pub async fn read<T: Collection>(&self) -> StoreResult<Vec<T>> {
        match self.storage.get(T::KEY).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                tracing::error!(key = T::KEY, error = %source, "corrupt collection slot");
                StoreError::Corrupt {
                    key: T::KEY.to_string(),
                    source,
                }
            }),
        }
    }

    /// Replace a whole collection
    pub async fn write<T: Collection>(&self, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(T::KEY, raw).await?;
        tracing::debug!(key = T::KEY, count = items.len(), "wrote collection");
        Ok(())
    }

    /// Write `items` only when the slot has never been written.
    /// Returns true if the slot was initialized.
    pub async fn initialize_if_absent<T: Collection>(&self, items: &[T]) -> StoreResult<bool> {
        if self.storage.get(T::KEY).await?.is_some() {
            return Ok(false);
        }
        self.write(items).await?;
        Ok(true)
    }

    /// Id of the signed-in user, if any
    pub async fn session(&self) -> StoreResult<Option<String>> {
        Ok(self
            .storage
            .get(STORAGE_KEY_SESSION)
            .await?
            .filter(|id| !id.is_empty()))
    }

    pub async fn set_session(&self, user_id: &str) -> StoreResult<()> {
        self.storage
            .set(STORAGE_KEY_SESSION, user_id.to_string())
            .await
    }

    pub async fn clear_session(&self) -> StoreResult<()> {
        self.storage.remove(STORAGE_KEY_SESSION).await
    }

    /// Read the persisted theme name
    pub async fn theme(&self) -> StoreResult<Option<String>> {
        self.storage.get(STORAGE_KEY_THEME).await
    }

    pub async fn set_theme(&self, theme: &str) -> StoreResult<()> {
        self.storage.set(STORAGE_KEY_THEME, theme.to_string()).await
    }

    /// Drop every collection and the session, then reseed if asked.
    pub async fn reset(&self, seed: Option<&SeedData>) -> StoreResult<()> {
        for key in [
            STORAGE_KEY_USERS,
            STORAGE_KEY_ELDERLY,
            STORAGE_KEY_TASKS,
            STORAGE_KEY_SESSION,
        ] {
            self.storage.remove(key).await?;
        }
        tracing::info!("cleared local data");
        if let Some(seed) = seed {
            self.seed(seed).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, MockKeyValueStorage};
    use domain::{UserRole, PRIMARY_ADMIN_ID};

    fn admin() -> User {
        User::new(
            PRIMARY_ADMIN_ID.to_string(),
            "Ana".to_string(),
            "admin".to_string(),
            "admin".to_string(),
            UserRole::Admin,
        )
    }

    #[tokio::test]
    async fn test_absent_slot_reads_empty() {
        let store = EntityStore::new(Arc::new(MemoryStorage::new()));
        let tasks: Vec<Task> = store.read().await.unwrap();
        assert!(tasks.is_empty());
        assert_eq!(store.session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_replaces_collection() {
        let store = EntityStore::new(Arc::new(MemoryStorage::new()));
        store.write(&[admin()]).await.unwrap();
        store.write::<User>(&[]).await.unwrap();

        let users: Vec<User> = store.read().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_slot() {
        let store = EntityStore::new(Arc::new(MemoryStorage::new()));
        store.write::<User>(&[]).await.unwrap();

        let initialized = store.initialize_if_absent(&[admin()]).await.unwrap();
        assert!(!initialized);
        assert!(store.read::<User>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_an_error() {
        let storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY_TASKS, "{not json".to_string())
            .await
            .unwrap();
        let store = EntityStore::new(Arc::new(storage));

        let err = store.read::<Task>().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let mut storage = MockKeyValueStorage::new();
        storage
            .expect_set()
            .returning(|_, _| Err(StoreError::Unavailable("quota exceeded".to_string())));
        let store = EntityStore::new(Arc::new(storage));

        let err = store.write(&[admin()]).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = EntityStore::new(Arc::new(MemoryStorage::new()));
        store.set_session("u2").await.unwrap();
        assert_eq!(store.session().await.unwrap(), Some("u2".to_string()));

        store.clear_session().await.unwrap();
        assert_eq!(store.session().await.unwrap(), None);
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(EntityKind::Tasks.storage_key(), "caresync_tasks_v10");
        assert_eq!(EntityKind::Users.storage_key(), "caresync_users_v10");
        assert_eq!(EntityKind::Profiles.storage_key(), "caresync_elderly_v10");
    }
}
