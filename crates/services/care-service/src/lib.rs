//! Care Service Library
//!
//! The data access layer: authentication, tasks, profiles, users and
//! preferences over device-local storage, with change notifications for
//! other contexts on the same device.

pub mod db;
pub mod infra;
pub mod service;

pub use db::CareDb;
pub use service::{
    AuthService, PreferenceService, ProfileService, ServiceContainer, Services, TaskService,
    UserService,
};
