//! Application state layer.
//!
//! Mediates between a presentation surface and the data access services:
//! caches the signed-in user and collections, applies role checks, and
//! keeps itself current when other contexts write.

pub mod permissions;
mod state;

pub use state::CareState;
