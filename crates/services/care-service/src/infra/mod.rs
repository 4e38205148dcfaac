//! Infrastructure shared by the services.

mod persistence;

pub use persistence::Persistence;
