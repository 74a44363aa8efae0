//! Read-only access to both authorization models on the API server.
//!
//! Nothing here writes: the only component allowed to write RBAC objects is
//! the background sync controller.

pub mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use pkg_types::object::{AuthorizationObject, ObjectKind, RbacObject};

pub use error::FetchError;

/// Get/list access to the object store behind the API server.
///
/// `namespace` is ignored for cluster-scoped kinds.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn get_authorization(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<AuthorizationObject, FetchError>;

    /// List legacy objects of `kind`, across all namespaces when `namespace` is `None`.
    async fn list_authorization(
        &self,
        kind: ObjectKind,
        namespace: Option<&str>,
    ) -> Result<Vec<AuthorizationObject>, FetchError>;

    async fn get_rbac(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<RbacObject, FetchError>;
}
