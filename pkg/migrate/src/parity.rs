use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use pkg_client::{FetchError, ObjectClient};
use pkg_rbacconv::ConversionError;
use pkg_rbacconv::compare::is_update_required;
use pkg_rbacconv::scheme::convert_to_rbac;
use pkg_types::object::{AuthorizationObject, HasMetadata, ObjectKind};

use crate::error::MigrateError;
use crate::visitor::{ActionOutcome, MigrateAction};

/// Why a legacy object and its RBAC mirror disagree.
#[derive(Debug, Error)]
pub enum ParityError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{kind} {key} is not in sync with RBAC")]
    OutOfSync { kind: ObjectKind, key: String },

    #[error("{kind} {key} is not in sync with RBAC: {source}")]
    Missing {
        kind: ObjectKind,
        key: String,
        source: FetchError,
    },
}

/// Checks that each legacy object has an identical RBAC mirror. Never writes.
///
/// Mismatches, missing mirrors and server timeouts are presumed to be sync
/// lag and are reported as retriable, but only after the legacy object has
/// been fetched again: if that fetch fails, its error is reported instead.
pub struct ParityChecker<C> {
    client: C,
}

impl<C: ObjectClient> ParityChecker<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn check(&self, obj: &AuthorizationObject) -> Result<(), MigrateError> {
        let err = match self.check_parity(obj).await {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if !err.is_retriable() {
            return Err(err);
        }

        let meta = obj.metadata();
        debug!("Refreshing {} {} after: {}", obj.kind(), obj.key(), err);
        if let Err(refresh_err) = self
            .client
            .get_authorization(obj.kind(), &meta.namespace, &meta.name)
            .await
        {
            warn!(
                "Refresh of {} {} failed, reporting that instead: {}",
                obj.kind(),
                obj.key(),
                refresh_err
            );
            return Err(MigrateError::not_retriable(ParityError::Fetch(refresh_err)));
        }
        Err(err)
    }

    async fn check_parity(&self, obj: &AuthorizationObject) -> Result<(), MigrateError> {
        let kind = obj.kind();
        let mut converted = convert_to_rbac(obj)
            .map_err(|e| MigrateError::not_retriable(ParityError::Conversion(e)))?;

        let meta = converted.metadata();
        let persisted = match self.client.get_rbac(kind, &meta.namespace, &meta.name).await {
            Ok(persisted) => persisted,
            Err(e) if e.is_not_found() => {
                return Err(MigrateError::retriable(ParityError::Missing {
                    kind,
                    key: obj.key(),
                    source: e,
                }));
            }
            Err(e) if e.is_server_timeout() => {
                return Err(MigrateError::retriable(ParityError::Fetch(e)));
            }
            Err(e) => return Err(MigrateError::not_retriable(ParityError::Fetch(e))),
        };

        if is_update_required(&mut converted, &persisted) {
            return Err(MigrateError::retriable(ParityError::OutOfSync {
                kind,
                key: obj.key(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl<C: ObjectClient> MigrateAction for ParityChecker<C> {
    async fn act(&self, obj: &AuthorizationObject) -> Result<ActionOutcome, MigrateError> {
        self.check(obj).await.map(|()| ActionOutcome::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_client::memory::MemoryClient;
    use pkg_types::meta::ObjectMeta;
    use pkg_types::object::RbacObject;
    use pkg_types::{authorization, rbac};
    use std::collections::BTreeSet;

    fn make_binding(role_ns: &str) -> AuthorizationObject {
        AuthorizationObject::RoleBinding(authorization::RoleBinding {
            metadata: ObjectMeta {
                name: "editors".to_string(),
                namespace: "ns0".to_string(),
                uid: "legacy-uid".to_string(),
                resource_version: "7".to_string(),
                ..Default::default()
            },
            subjects: vec![authorization::Subject {
                kind: "User".to_string(),
                name: "alice".to_string(),
                namespace: String::new(),
            }],
            role_ref: authorization::RoleRef {
                name: "edit".to_string(),
                namespace: role_ns.to_string(),
            },
        })
    }

    fn make_role(verbs: &[&str]) -> AuthorizationObject {
        AuthorizationObject::ClusterRole(authorization::ClusterRole {
            metadata: ObjectMeta {
                name: "reader".to_string(),
                ..Default::default()
            },
            rules: vec![authorization::PolicyRule {
                verbs: verbs.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
                resources: ["pods".to_string()].into(),
                api_groups: vec![String::new()],
                ..Default::default()
            }],
            aggregation_rule: None,
        })
    }

    /// Seed both models with `obj` and its mirror as the sync controller would.
    fn mirrored(client: &MemoryClient, obj: AuthorizationObject) {
        let mut mirror = convert_to_rbac(&obj).unwrap();
        let meta = mirror.metadata_mut();
        meta.uid = "rbac-uid".to_string();
        meta.resource_version = "12".to_string();
        meta.self_link = "/apis/rbac.authorization.k8s.io/v1/x".to_string();
        client.insert_rbac(mirror);
        client.insert_authorization(obj);
    }

    fn parity_error(err: &MigrateError) -> &ParityError {
        err.inner().downcast_ref::<ParityError>().unwrap()
    }

    #[tokio::test]
    async fn test_in_sync() {
        let client = MemoryClient::new();
        mirrored(&client, make_binding("ns0"));
        let checker = ParityChecker::new(client.clone());

        checker.check(&make_binding("ns0")).await.unwrap();
        assert_eq!(client.authorization_gets(), 0);
    }

    #[tokio::test]
    async fn test_missing_mirror_is_retriable_after_refresh() {
        let client = MemoryClient::new();
        client.insert_authorization(make_binding(""));
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_binding("")).await.unwrap_err();
        assert!(err.is_retriable());
        assert!(matches!(parity_error(&err), ParityError::Missing { .. }));
        assert!(err.to_string().contains("is not in sync with RBAC"));
        assert_eq!(client.authorization_gets(), 1);
    }

    #[tokio::test]
    async fn test_out_of_sync_is_retriable() {
        let client = MemoryClient::new();
        mirrored(&client, make_role(&["get"]));
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_role(&["get", "list"])).await.unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(err.to_string(), "ClusterRole reader is not in sync with RBAC");
    }

    #[tokio::test]
    async fn test_refresh_failure_replaces_original_error() {
        // Legacy object deleted after it was listed: the mirror is gone and so is the source.
        let client = MemoryClient::new();
        client.insert_authorization(make_role(&["get"]));
        client.remove_authorization(ObjectKind::ClusterRole, "", "reader");
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_role(&["get"])).await.unwrap_err();
        assert!(!err.is_retriable());
        let ParityError::Fetch(fetch) = parity_error(&err) else {
            panic!("expected refresh fetch error, got {}", err);
        };
        assert!(fetch.is_not_found());
        assert!(fetch.to_string().contains("authorization.openshift.io"));
        assert_eq!(client.authorization_gets(), 1);
    }

    #[tokio::test]
    async fn test_server_timeout_is_retriable() {
        let client = MemoryClient::new();
        mirrored(&client, make_role(&["get"]));
        client.fail_rbac(
            ObjectKind::ClusterRole,
            "",
            "reader",
            FetchError::ServerTimeout("etcd slow".to_string()),
        );
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_role(&["get"])).await.unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(client.authorization_gets(), 1);
    }

    #[tokio::test]
    async fn test_other_fetch_errors_are_not_retried() {
        let client = MemoryClient::new();
        mirrored(&client, make_role(&["get"]));
        client.fail_rbac(
            ObjectKind::ClusterRole,
            "",
            "reader",
            FetchError::Status {
                code: 403,
                message: "forbidden".to_string(),
            },
        );
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_role(&["get"])).await.unwrap_err();
        assert!(!err.is_retriable());
        assert_eq!(client.authorization_gets(), 0);
    }

    #[tokio::test]
    async fn test_conversion_error_is_not_retried() {
        let client = MemoryClient::new();
        let checker = ParityChecker::new(client.clone());

        let err = checker.check(&make_binding("ns1")).await.unwrap_err();
        assert!(!err.is_retriable());
        assert!(matches!(parity_error(&err), ParityError::Conversion(_)));
        assert!(err.to_string().contains(r#"instead of current namespace "ns0""#));
        assert_eq!(client.authorization_gets(), 0);
    }

    #[tokio::test]
    async fn test_empty_mirror_is_out_of_sync() {
        let client = MemoryClient::new();
        client.insert_authorization(make_role(&["get"]));
        client.insert_rbac(RbacObject::ClusterRole(rbac::ClusterRole {
            metadata: ObjectMeta {
                name: "reader".to_string(),
                ..Default::default()
            },
            rules: vec![],
            aggregation_rule: None,
        }));
        let checker = ParityChecker::new(client);

        let err = checker.check(&make_role(&["get"])).await.unwrap_err();
        assert!(matches!(parity_error(&err), ParityError::OutOfSync { .. }));
    }
}
