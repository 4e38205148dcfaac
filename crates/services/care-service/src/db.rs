//! `CareDb` - the full data access surface for one context.
//!
//! A context is one running instance of the app (one window, one CLI
//! invocation). Contexts on the same device share an [`EntityStore`] and a
//! [`ChangeBus`]; each gets its own `CareDb` and therefore its own bus
//! identity.

use std::sync::Arc;

use common::{AppResult, CareConfig, ServiceConfig};
use domain::{
    CreateUser, ElderlyProfile, NewElderlyProfile, NewTask, Task, TaskStatus, Theme, User,
    UserRole,
};
use store::{
    BusHandle, ChangeBus, ChangeNotice, EntityKind, EntityStore, FileStorage, KeyValueStorage,
    MemoryStorage, SeedData, Subscription, SubscriptionGuard,
};

use crate::infra::Persistence;
use crate::service::{
    AuthService, PreferenceService, ProfileService, ServiceContainer, Services, TaskService,
    UserService,
};

pub struct CareDb {
    services: Services,
    store: Arc<EntityStore>,
    bus: BusHandle,
}

impl CareDb {
    /// Connect a new context to a shared store and bus
    pub fn connect(store: Arc<EntityStore>, bus: &ChangeBus, config: ServiceConfig) -> Self {
        let handle = bus.connect();
        let persistence = Persistence::new(store.clone(), handle.clone());
        Self {
            services: Services::from_persistence(persistence, config),
            store,
            bus: handle,
        }
    }

    /// Open file-backed storage from configuration, seeding absent slots
    /// when enabled.
    pub async fn open(config: &CareConfig, bus: &ChangeBus) -> AppResult<Self> {
        let storage = FileStorage::open(&config.store.data_dir).await?;
        let store = open_store(Arc::new(storage), config.store.seed_defaults).await?;
        Ok(Self::connect(Arc::new(store), bus, config.service.clone()))
    }

    /// Seeded in-memory store with no simulated latency
    pub async fn in_memory(bus: &ChangeBus) -> AppResult<Self> {
        let store = open_store(Arc::new(MemoryStorage::new()), true).await?;
        Ok(Self::connect(Arc::new(store), bus, ServiceConfig::immediate()))
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<User> {
        self.services.auth().login(identifier, password).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let input = CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.services.auth().signup(input).await
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.services.auth().logout().await
    }

    pub async fn get_current_user(&self) -> AppResult<Option<User>> {
        self.services.auth().current_user().await
    }

    // -------------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------------

    pub async fn get_users(&self) -> AppResult<Vec<User>> {
        self.services.users().list_users().await
    }

    pub async fn get_tasks(&self) -> AppResult<Vec<Task>> {
        self.services.tasks().list_tasks().await
    }

    pub async fn get_task(&self, task_id: &str) -> AppResult<Task> {
        self.services.tasks().get_task(task_id).await
    }

    pub async fn get_elderly_profiles(&self) -> AppResult<Vec<ElderlyProfile>> {
        self.services.profiles().list_profiles().await
    }

    // -------------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------------

    pub async fn create_task(&self, task: NewTask) -> AppResult<Task> {
        self.services.tasks().create_task(task).await
    }

    pub async fn assign_task(&self, task_id: &str, user_id: Option<&str>) -> AppResult<Task> {
        self.services
            .tasks()
            .assign_task(task_id, user_id.map(str::to_string))
            .await
    }

    pub async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> AppResult<Task> {
        self.services.tasks().update_task_status(task_id, status).await
    }

    pub async fn delete_task(&self, task_id: &str) -> AppResult<()> {
        self.services.tasks().delete_task(task_id).await
    }

    // -------------------------------------------------------------------------
    // Profiles and users
    // -------------------------------------------------------------------------

    pub async fn create_elderly_profile(&self, profile: NewElderlyProfile) -> AppResult<ElderlyProfile> {
        self.services.profiles().create_profile(profile).await
    }

    pub async fn delete_elderly_profile(&self, profile_id: &str) -> AppResult<()> {
        self.services.profiles().delete_profile(profile_id).await
    }

    pub async fn update_user_role(&self, user_id: &str, role: UserRole) -> AppResult<User> {
        self.services.users().update_user_role(user_id, role).await
    }

    pub async fn delete_user(&self, user_id: &str) -> AppResult<()> {
        self.services.users().delete_user(user_id).await
    }

    // -------------------------------------------------------------------------
    // Preferences and notifications
    // -------------------------------------------------------------------------

    pub async fn theme(&self) -> AppResult<Theme> {
        self.services.preferences().theme().await
    }

    pub async fn set_theme(&self, theme: Theme) -> AppResult<()> {
        self.services.preferences().set_theme(theme).await
    }

    /// Call `handler` whenever another context changes a collection.
    /// Dropping the guard unsubscribes.
    pub fn subscribe_to_changes<F>(&self, handler: F) -> SubscriptionGuard
    where
        F: Fn(ChangeNotice) + Send + Sync + 'static,
    {
        self.bus.subscribe_with(handler)
    }

    /// Wipe local data back to the demo seed and sign out
    pub async fn reset(&self) -> AppResult<()> {
        self.store.reset(Some(&SeedData::defaults())).await?;
        for kind in [EntityKind::Users, EntityKind::Profiles, EntityKind::Tasks] {
            self.bus.publish(kind);
        }
        Ok(())
    }

    /// Pull-style stream of change notices from other contexts
    pub fn changes(&self) -> Subscription {
        self.bus.subscribe()
    }
}

impl ServiceContainer for CareDb {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.services.auth()
    }

    fn tasks(&self) -> Arc<dyn TaskService> {
        self.services.tasks()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.services.profiles()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.services.users()
    }

    fn preferences(&self) -> Arc<dyn PreferenceService> {
        self.services.preferences()
    }
}

async fn open_store(storage: Arc<dyn KeyValueStorage>, seed_defaults: bool) -> AppResult<EntityStore> {
    let seed = seed_defaults.then(SeedData::defaults);
    Ok(EntityStore::open(storage, seed).await?)
}
