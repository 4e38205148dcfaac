//! User service - Roster management.

use async_trait::async_trait;

use common::{AppResult, OptionExt};
use domain::{Task, User, UserRole};

use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// Permission checks live in the application state layer; these operations
/// apply whatever they are asked to.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// All users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Replace a user's role
    async fn update_user_role(&self, id: &str, role: UserRole) -> AppResult<User>;

    /// Remove a user and unassign every task they held.
    /// Removing a missing id succeeds.
    async fn delete_user(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    persistence: Persistence,
}

impl UserManager {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = self.persistence.load::<User>().await?;
        tracing::debug!(count = users.len(), "loaded users");
        Ok(users)
    }

    async fn update_user_role(&self, id: &str, role: UserRole) -> AppResult<User> {
        let mut users = self.persistence.load::<User>().await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_not_found("User")?;
        user.update_role(role);
        let updated = user.clone();

        self.persistence.save(&users).await?;
        tracing::info!(user_id = id, %role, "user role changed");
        Ok(updated)
    }

    async fn delete_user(&self, id: &str) -> AppResult<()> {
        let mut users = self.persistence.load::<User>().await?;
        users.retain(|u| u.id != id);
        self.persistence.save(&users).await?;

        // Tasks stay; they just lose their assignee
        let mut tasks = self.persistence.load::<Task>().await?;
        let mut unassigned = 0;
        for task in tasks.iter_mut().filter(|t| t.is_assigned_to(id)) {
            task.assign(None);
            unassigned += 1;
        }
        self.persistence.save(&tasks).await?;

        tracing::info!(user_id = id, unassigned, "user deleted");
        Ok(())
    }
}
