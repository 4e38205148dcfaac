//! Profile service - Care recipients.

use async_trait::async_trait;

use common::AppResult;
use domain::{new_id, validate_input, ElderlyProfile, NewElderlyProfile, Task, ELDERLY_ID_PREFIX};

use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// All elderly profiles
    async fn list_profiles(&self) -> AppResult<Vec<ElderlyProfile>>;

    /// Append a profile; id and avatar are generated when missing
    async fn create_profile(&self, input: NewElderlyProfile) -> AppResult<ElderlyProfile>;

    /// Remove a profile together with every task scheduled for it.
    /// Removing a missing id succeeds.
    async fn delete_profile(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of ProfileService.
pub struct ProfileManager {
    persistence: Persistence,
}

impl ProfileManager {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl ProfileService for ProfileManager {
    async fn list_profiles(&self) -> AppResult<Vec<ElderlyProfile>> {
        let profiles = self.persistence.load::<ElderlyProfile>().await?;
        tracing::debug!(count = profiles.len(), "loaded profiles");
        Ok(profiles)
    }

    async fn create_profile(&self, mut input: NewElderlyProfile) -> AppResult<ElderlyProfile> {
        input.name = input.name.trim().to_string();
        validate_input(&input)?;

        let id = input
            .id
            .take()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| new_id(ELDERLY_ID_PREFIX));
        let profile = ElderlyProfile::from_new(id, input);

        let mut profiles = self.persistence.load::<ElderlyProfile>().await?;
        profiles.push(profile.clone());
        self.persistence.save(&profiles).await?;

        tracing::info!(profile_id = %profile.id, "profile created");
        Ok(profile)
    }

    async fn delete_profile(&self, id: &str) -> AppResult<()> {
        let mut profiles = self.persistence.load::<ElderlyProfile>().await?;
        profiles.retain(|p| p.id != id);
        self.persistence.save(&profiles).await?;

        // Tasks never outlive their care recipient
        let mut tasks = self.persistence.load::<Task>().await?;
        let before = tasks.len();
        tasks.retain(|t| t.elderly_id != id);
        self.persistence.save(&tasks).await?;

        tracing::info!(profile_id = id, tasks_removed = before - tasks.len(), "profile deleted");
        Ok(())
    }
}
