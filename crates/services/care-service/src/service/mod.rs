//! Data access services.
//!
//! One service per concern, each a trait with a concrete manager so callers
//! can be tested against mocks. Mutations read the whole collection, apply
//! the change, write it back and announce it on the change bus.

mod auth_service;
pub mod container;
mod preference_service;
mod profile_service;
mod task_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator};
pub use preference_service::{PreferenceManager, PreferenceService};
pub use profile_service::{ProfileManager, ProfileService};
pub use task_service::{TaskManager, TaskService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use preference_service::MockPreferenceService;
#[cfg(any(test, feature = "test-utils"))]
pub use profile_service::MockProfileService;
#[cfg(any(test, feature = "test-utils"))]
pub use task_service::MockTaskService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
