//! Read-only projections over the task list used by task screens.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::task::{Task, TaskStatus};

/// Status filter offered on the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    /// Anything not yet COMPLETED
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status != TaskStatus::Completed,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(TaskFilter::All),
            "PENDING" => Ok(TaskFilter::Pending),
            "COMPLETED" => Ok(TaskFilter::Completed),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

/// Sort tasks by `scheduled_at`, earliest first
pub fn sort_by_schedule(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.scheduled_at);
}

/// Tasks passing the status filter whose title contains `search`
/// (case-insensitive). An empty search matches everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: TaskFilter, search: &str) -> Vec<&'a Task> {
    let needle = search.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| filter.matches(t))
        .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
        .collect()
}

/// Group tasks by scheduled calendar day, days ascending.
/// Order inside a day follows the input order.
pub fn group_by_day<'a, I>(tasks: I) -> BTreeMap<NaiveDate, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.scheduled_day()).or_default().push(task);
    }
    groups
}

/// Tasks scheduled on `day`
pub fn tasks_on_day(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.scheduled_day() == day).collect()
}

/// Rounded percentage of COMPLETED tasks; 0 for an empty list
pub fn completion_progress<'a, I>(tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    let (done, total) = tasks.into_iter().fold((0usize, 0usize), |(done, total), t| {
        (done + usize::from(t.is_completed()), total + 1)
    });
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}
