//! Common utilities shared across the CareSync crates.
//!
//! This crate provides:
//! - Unified error handling (`AppError`, `AppResult`)
//! - The uniform operation response shape (`ActionResponse`)
//! - Configuration structures

pub mod config;
pub mod error;
pub mod response;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use response::ActionResponse;
