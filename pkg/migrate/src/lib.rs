//! Read-only verification that legacy authorization objects are mirrored in RBAC.

pub mod error;
pub mod parity;
pub mod visitor;

pub use error::MigrateError;
