//! Task service - Scheduling, assignment and status of care tasks.

use async_trait::async_trait;
use chrono::Utc;

use common::{AppResult, OptionExt};
use domain::{new_id, validate_input, NewTask, Task, TaskStatus, TASK_ID_PREFIX};

use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Task service trait for dependency injection.
///
/// Every mutation rewrites the whole task collection; concurrent writers
/// from other contexts are last-write-wins.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// All tasks in stored order
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// Single task by id
    async fn get_task(&self, id: &str) -> AppResult<Task>;

    /// Append a task; an id is generated when the input has none
    async fn create_task(&self, input: NewTask) -> AppResult<Task>;

    /// Set or clear (`None`) the assignee
    async fn assign_task(&self, id: &str, user_id: Option<String>) -> AppResult<Task>;

    /// Change status, keeping `completed_at` consistent
    async fn update_task_status(&self, id: &str, status: TaskStatus) -> AppResult<Task>;

    /// Remove a task; removing a missing id succeeds
    async fn delete_task(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of TaskService.
pub struct TaskManager {
    persistence: Persistence,
}

impl TaskManager {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    /// Apply `change` to one task and persist the collection
    async fn modify<F>(&self, id: &str, change: F) -> AppResult<Task>
    where
        F: FnOnce(&mut Task) + Send,
    {
        let mut tasks = self.persistence.load::<Task>().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_not_found("Task")?;
        change(task);
        let updated = task.clone();

        self.persistence.save(&tasks).await?;
        Ok(updated)
    }
}

#[async_trait]
impl TaskService for TaskManager {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let tasks = self.persistence.load::<Task>().await?;
        tracing::debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    async fn get_task(&self, id: &str) -> AppResult<Task> {
        self.persistence
            .load::<Task>()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_not_found("Task")
    }

    async fn create_task(&self, mut input: NewTask) -> AppResult<Task> {
        input.title = input.title.trim().to_string();
        validate_input(&input)?;

        let id = input
            .id
            .take()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| new_id(TASK_ID_PREFIX));
        let task = Task::from_new(id, input, Utc::now());

        let mut tasks = self.persistence.load::<Task>().await?;
        tasks.push(task.clone());
        self.persistence.save(&tasks).await?;

        tracing::info!(task_id = %task.id, elderly_id = %task.elderly_id, "task created");
        Ok(task)
    }

    async fn assign_task(&self, id: &str, user_id: Option<String>) -> AppResult<Task> {
        let task = self.modify(id, |t| t.assign(user_id)).await?;
        tracing::info!(
            task_id = %task.id,
            assigned_to = task.assigned_to_id.as_deref().unwrap_or("-"),
            "task assignment changed"
        );
        Ok(task)
    }

    async fn update_task_status(&self, id: &str, status: TaskStatus) -> AppResult<Task> {
        let now = Utc::now();
        let task = self.modify(id, |t| t.set_status(status, now)).await?;
        tracing::info!(task_id = %task.id, status = ?task.status, "task status changed");
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> AppResult<()> {
        let mut tasks = self.persistence.load::<Task>().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        self.persistence.save(&tasks).await?;
        tracing::info!(task_id = id, removed = before - tasks.len(), "task deleted");
        Ok(())
    }
}
