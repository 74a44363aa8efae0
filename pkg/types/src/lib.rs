//! Data model for the legacy authorization API and the RBAC API.
//!
//! The two models describe the same four object kinds but differ in shape:
//! the legacy model uses sets where RBAC uses lists, carries role-ref
//! namespaces that RBAC infers from the ref kind, and has subject kinds that
//! RBAC does not know about.

pub mod authorization;
pub mod config;
pub mod meta;
pub mod object;
pub mod rbac;
pub mod validate;
