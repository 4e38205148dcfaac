//! Domain layer - Core caregiving entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared by the store, the data access services and the
//! application state layer.

pub mod constants;
pub mod error;
pub mod profile;
pub mod task;
pub mod theme;
pub mod user;
pub mod view;

pub use constants::*;
pub use error::{validate_input, DomainError, DomainResult};
pub use profile::{parse_conditions, ElderlyProfile, Gender, NewElderlyProfile};
pub use task::{NewTask, Task, TaskPriority, TaskStatus, TaskType};
pub use theme::Theme;
pub use user::{avatar_url, CreateUser, User, UserResponse, UserRole};
pub use view::TaskFilter;

/// Generate a unique entity id with the given prefix
pub fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}
