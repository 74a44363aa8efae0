//! In-process object store implementing [`ObjectClient`].
//!
//! Used by tests. Objects are seeded and removed directly; failures can be
//! injected per object to simulate an unhealthy API server.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pkg_constants::rbac::{AUTHORIZATION_GROUP, RBAC_GROUP};
use pkg_types::object::{AuthorizationObject, HasMetadata, ObjectKind, RbacObject};

use crate::ObjectClient;
use crate::error::FetchError;

/// (kind, namespace, name). Namespace is empty for cluster-scoped kinds.
type ObjectKey = (ObjectKind, String, String);

fn object_key(kind: ObjectKind, namespace: &str, name: &str) -> ObjectKey {
    let namespace = if kind.is_namespaced() { namespace } else { "" };
    (kind, namespace.to_string(), name.to_string())
}

fn key_of<T: HasMetadata>(obj: &T) -> ObjectKey {
    let meta = obj.metadata();
    object_key(obj.kind(), &meta.namespace, &meta.name)
}

/// Concurrent in-memory store for both models.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    authorization: Arc<DashMap<ObjectKey, AuthorizationObject>>,
    rbac: Arc<DashMap<ObjectKey, RbacObject>>,
    authorization_failures: Arc<DashMap<ObjectKey, FetchError>>,
    rbac_failures: Arc<DashMap<ObjectKey, FetchError>>,
    authorization_gets: Arc<AtomicUsize>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_authorization(&self, obj: AuthorizationObject) {
        self.authorization.insert(key_of(&obj), obj);
    }

    pub fn insert_rbac(&self, obj: RbacObject) {
        self.rbac.insert(key_of(&obj), obj);
    }

    pub fn remove_authorization(&self, kind: ObjectKind, namespace: &str, name: &str) {
        self.authorization.remove(&object_key(kind, namespace, name));
    }

    /// Make every get of this legacy object fail with `err`.
    pub fn fail_authorization(&self, kind: ObjectKind, namespace: &str, name: &str, err: FetchError) {
        self.authorization_failures
            .insert(object_key(kind, namespace, name), err);
    }

    /// Make every get of this RBAC object fail with `err`.
    pub fn fail_rbac(&self, kind: ObjectKind, namespace: &str, name: &str, err: FetchError) {
        self.rbac_failures.insert(object_key(kind, namespace, name), err);
    }

    /// Number of single-object legacy gets served so far.
    pub fn authorization_gets(&self) -> usize {
        self.authorization_gets.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectClient for MemoryClient {
    async fn get_authorization(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<AuthorizationObject, FetchError> {
        self.authorization_gets.fetch_add(1, Ordering::Relaxed);
        let key = object_key(kind, namespace, name);
        if let Some(err) = self.authorization_failures.get(&key) {
            return Err(err.clone());
        }
        self.authorization
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FetchError::NotFound {
                resource: format!("{}.{}", kind.resource(), AUTHORIZATION_GROUP),
                name: name.to_string(),
            })
    }

    async fn list_authorization(
        &self,
        kind: ObjectKind,
        namespace: Option<&str>,
    ) -> Result<Vec<AuthorizationObject>, FetchError> {
        let mut items: Vec<AuthorizationObject> = self
            .authorization
            .iter()
            .filter(|entry| {
                let (k, ns, _) = entry.key();
                *k == kind
                    && match namespace {
                        Some(want) if kind.is_namespaced() => ns == want,
                        _ => true,
                    }
            })
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|obj| obj.key());
        Ok(items)
    }

    async fn get_rbac(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<RbacObject, FetchError> {
        let key = object_key(kind, namespace, name);
        if let Some(err) = self.rbac_failures.get(&key) {
            return Err(err.clone());
        }
        self.rbac
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| FetchError::NotFound {
                resource: format!("{}.{}", kind.resource(), RBAC_GROUP),
                name: name.to_string(),
            })
    }
}
