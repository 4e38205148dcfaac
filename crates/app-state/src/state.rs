//! Application state for one context.
//!
//! Holds a cached copy of the signed-in user and the three collections. The
//! store stays the authority: creations and updates are written first and
//! then re-fetched, while deletions and role changes are applied locally
//! first and rolled back if the write fails.

use std::sync::Arc;

use care_service_lib::{CareDb, ServiceContainer};
use common::{AppResult, OptionExt};
use domain::view::sort_by_schedule;
use domain::{
    CreateUser, ElderlyProfile, NewElderlyProfile, NewTask, Task, TaskStatus, Theme, User,
    UserRole,
};
use store::{ChangeNotice, Subscription};

use crate::permissions::{check_completion, check_user_management, require_admin, require_user};

pub struct CareState {
    services: Arc<dyn ServiceContainer>,
    changes: Option<Subscription>,
    current_user: Option<User>,
    tasks: Vec<Task>,
    users: Vec<User>,
    elderly_profiles: Vec<ElderlyProfile>,
    loading: bool,
    theme: Theme,
}

impl CareState {
    /// State over any service container; `changes` feeds cross-context
    /// reloads when present.
    pub fn new(services: Arc<dyn ServiceContainer>, changes: Option<Subscription>) -> Self {
        Self {
            services,
            changes,
            current_user: None,
            tasks: Vec::new(),
            users: Vec::new(),
            elderly_profiles: Vec::new(),
            loading: false,
            theme: Theme::default(),
        }
    }

    /// State bound to a data access context and its change notifications
    pub fn for_db(db: Arc<CareDb>) -> Self {
        let changes = db.changes();
        Self::new(db, Some(changes))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Tasks ordered by scheduled time
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn elderly_profiles(&self) -> &[ElderlyProfile] {
        &self.elderly_profiles
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn elderly_profile(&self, profile_id: &str) -> Option<&ElderlyProfile> {
        self.elderly_profiles.iter().find(|p| p.id == profile_id)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restore theme and session; load everything when signed in
    pub async fn mount(&mut self) -> AppResult<()> {
        self.theme = self.services.preferences().theme().await?;

        self.loading = true;
        let result = self.restore_session().await;
        self.loading = false;
        result
    }

    async fn restore_session(&mut self) -> AppResult<()> {
        self.current_user = self.services.auth().current_user().await?;
        if let Some(user) = &self.current_user {
            tracing::debug!(user_id = %user.id, "session restored");
            self.load_all().await?;
        }
        Ok(())
    }

    /// Fetch the three collections concurrently
    pub async fn load_all(&mut self) -> AppResult<()> {
        let task_service = self.services.tasks();
        let user_service = self.services.users();
        let profile_service = self.services.profiles();

        let (mut tasks, users, profiles) = tokio::try_join!(
            task_service.list_tasks(),
            user_service.list_users(),
            profile_service.list_profiles(),
        )?;
        sort_by_schedule(&mut tasks);

        self.tasks = tasks;
        self.users = users;
        self.elderly_profiles = profiles;
        Ok(())
    }

    pub async fn refresh_tasks(&mut self) -> AppResult<()> {
        let mut tasks = self.services.tasks().list_tasks().await?;
        sort_by_schedule(&mut tasks);
        self.tasks = tasks;
        Ok(())
    }

    pub async fn refresh_profiles(&mut self) -> AppResult<()> {
        self.elderly_profiles = self.services.profiles().list_profiles().await?;
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&mut self, identifier: &str, password: &str) -> AppResult<User> {
        self.loading = true;
        let result = self.services.auth().login(identifier, password).await;
        let result = match result {
            Ok(user) => self.sign_in(user).await,
            Err(e) => Err(e),
        };
        self.loading = false;
        result
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let input = CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        self.loading = true;
        let result = match self.services.auth().signup(input).await {
            Ok(user) => self.sign_in(user).await,
            Err(e) => Err(e),
        };
        self.loading = false;
        result
    }

    /// The session is already persisted at this point, so a failed load
    /// leaves the user signed in with empty collections.
    async fn sign_in(&mut self, user: User) -> AppResult<User> {
        self.current_user = Some(user.clone());
        if let Err(e) = self.load_all().await {
            tracing::error!(user_id = %user.id, error = %e, "signed in but failed to load data");
        }
        Ok(user)
    }

    pub async fn logout(&mut self) -> AppResult<()> {
        self.services.auth().logout().await?;
        self.current_user = None;
        self.tasks.clear();
        Ok(())
    }

    // =========================================================================
    // Refresh-after-write operations
    // =========================================================================

    pub async fn create_task(&mut self, input: NewTask) -> AppResult<Task> {
        let task = self.services.tasks().create_task(input).await?;
        self.refresh_tasks().await?;
        Ok(task)
    }

    pub async fn assign_task(&mut self, task_id: &str, user_id: Option<String>) -> AppResult<Task> {
        let task = self.services.tasks().assign_task(task_id, user_id).await?;
        self.refresh_tasks().await?;
        Ok(task)
    }

    pub async fn update_task_status(&mut self, task_id: &str, status: TaskStatus) -> AppResult<Task> {
        let task = self
            .services
            .tasks()
            .update_task_status(task_id, status)
            .await?;
        self.refresh_tasks().await?;
        Ok(task)
    }

    pub async fn create_profile(&mut self, input: NewElderlyProfile) -> AppResult<ElderlyProfile> {
        let profile = self.services.profiles().create_profile(input).await?;
        self.refresh_profiles().await?;
        Ok(profile)
    }

    /// Take the task if it is not mine, release it if it is
    pub async fn toggle_assignment(&mut self, task_id: &str) -> AppResult<Task> {
        let me = require_user(self.current_user.as_ref())?.id.clone();
        let task = self.task(task_id).ok_or_not_found("Task")?;

        let assignee = if task.is_assigned_to(&me) { None } else { Some(me) };
        self.assign_task(task_id, assignee).await
    }

    /// COMPLETED goes back to PENDING, anything else becomes COMPLETED
    pub async fn toggle_completion(&mut self, task_id: &str) -> AppResult<Task> {
        let task = self.task(task_id).ok_or_not_found("Task")?;
        check_completion(self.current_user.as_ref(), task)?;

        let status = task.status.toggled();
        self.update_task_status(task_id, status).await
    }

    // =========================================================================
    // Optimistic operations
    // =========================================================================

    pub async fn delete_task(&mut self, task_id: &str) -> AppResult<()> {
        let snapshot = self.tasks.clone();
        self.tasks.retain(|t| t.id != task_id);

        if let Err(e) = self.services.tasks().delete_task(task_id).await {
            tracing::warn!(task_id, error = %e, "delete task failed, rolling back");
            self.tasks = snapshot;
            return Err(e);
        }
        Ok(())
    }

    pub async fn delete_profile(&mut self, profile_id: &str) -> AppResult<()> {
        require_admin(self.current_user.as_ref())?;

        let profiles_snapshot = self.elderly_profiles.clone();
        let tasks_snapshot = self.tasks.clone();
        self.elderly_profiles.retain(|p| p.id != profile_id);
        self.tasks.retain(|t| t.elderly_id != profile_id);

        if let Err(e) = self.services.profiles().delete_profile(profile_id).await {
            tracing::warn!(profile_id, error = %e, "delete profile failed, rolling back");
            self.elderly_profiles = profiles_snapshot;
            self.tasks = tasks_snapshot;
            return Err(e);
        }
        Ok(())
    }

    pub async fn delete_user(&mut self, user_id: &str) -> AppResult<()> {
        let target = self.user(user_id).ok_or_not_found("User")?;
        check_user_management(self.current_user.as_ref(), target)?;

        let users_snapshot = self.users.clone();
        let tasks_snapshot = self.tasks.clone();
        self.users.retain(|u| u.id != user_id);
        for task in self.tasks.iter_mut().filter(|t| t.is_assigned_to(user_id)) {
            task.assign(None);
        }

        if let Err(e) = self.services.users().delete_user(user_id).await {
            tracing::warn!(user_id, error = %e, "delete user failed, rolling back");
            self.users = users_snapshot;
            self.tasks = tasks_snapshot;
            return Err(e);
        }
        Ok(())
    }

    pub async fn update_user_role(&mut self, user_id: &str, role: UserRole) -> AppResult<User> {
        let target = self.user(user_id).ok_or_not_found("User")?;
        check_user_management(self.current_user.as_ref(), target)?;

        let users_snapshot = self.users.clone();
        let current_snapshot = self.current_user.clone();
        for user in self.users.iter_mut().filter(|u| u.id == user_id) {
            user.update_role(role);
        }
        if let Some(current) = self.current_user.as_mut().filter(|u| u.id == user_id) {
            current.update_role(role);
        }

        match self.services.users().update_user_role(user_id, role).await {
            Ok(user) => Ok(user),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "role change failed, rolling back");
                self.users = users_snapshot;
                self.current_user = current_snapshot;
                Err(e)
            }
        }
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub async fn toggle_theme(&mut self) -> AppResult<Theme> {
        let theme = self.theme.toggled();
        self.services.preferences().set_theme(theme).await?;
        self.theme = theme;
        Ok(theme)
    }

    // =========================================================================
    // Cross-context notifications
    // =========================================================================

    /// Apply every notice already delivered. Returns true when a reload ran.
    pub async fn process_notifications(&mut self) -> AppResult<bool> {
        let received = match self.changes.as_mut() {
            Some(changes) => changes.drain(),
            None => false,
        };
        self.reload_after_change(received).await
    }

    /// Wait for the next notice from another context and apply it.
    /// `None` once notifications have ended.
    pub async fn next_change(&mut self) -> AppResult<Option<ChangeNotice>> {
        let Some(changes) = self.changes.as_mut() else {
            return Ok(None);
        };
        let notice = changes.recv().await;
        self.reload_after_change(notice.is_some()).await?;
        Ok(notice)
    }

    async fn reload_after_change(&mut self, received: bool) -> AppResult<bool> {
        if !received || !self.is_authenticated() {
            return Ok(false);
        }
        tracing::debug!("collections changed elsewhere, reloading");
        self.load_all().await?;
        Ok(true)
    }
}
