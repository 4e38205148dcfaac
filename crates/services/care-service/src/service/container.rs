//! Service Container - Centralized access to every data access service.

use std::sync::Arc;

use common::ServiceConfig;

use super::{
    AuthService, Authenticator, PreferenceManager, PreferenceService, ProfileManager,
    ProfileService, TaskManager, TaskService, UserManager, UserService,
};
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn tasks(&self) -> Arc<dyn TaskService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn preferences(&self) -> Arc<dyn PreferenceService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    task_service: Arc<dyn TaskService>,
    profile_service: Arc<dyn ProfileService>,
    user_service: Arc<dyn UserService>,
    preference_service: Arc<dyn PreferenceService>,
}

impl Services {
    /// Build every service over one context's persistence
    pub fn from_persistence(persistence: Persistence, config: ServiceConfig) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(persistence.clone(), config)),
            task_service: Arc::new(TaskManager::new(persistence.clone())),
            profile_service: Arc::new(ProfileManager::new(persistence.clone())),
            user_service: Arc::new(UserManager::new(persistence.clone())),
            preference_service: Arc::new(PreferenceManager::new(persistence)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn tasks(&self) -> Arc<dyn TaskService> {
        self.task_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn preferences(&self) -> Arc<dyn PreferenceService> {
        self.preference_service.clone()
    }
}
