use serde::{Deserialize, Serialize};
use std::str::FromStr;

use pkg_constants::rbac::{
    CLUSTER_ROLE_BINDING_KIND, CLUSTER_ROLE_KIND, ROLE_BINDING_KIND, ROLE_KIND,
};

use crate::meta::ObjectMeta;
use crate::{authorization, rbac};

// --- Object kinds ---

/// The four object kinds that exist in both models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    ClusterRole,
    Role,
    ClusterRoleBinding,
    RoleBinding,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::ClusterRole,
        ObjectKind::Role,
        ObjectKind::ClusterRoleBinding,
        ObjectKind::RoleBinding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::ClusterRole => CLUSTER_ROLE_KIND,
            ObjectKind::Role => ROLE_KIND,
            ObjectKind::ClusterRoleBinding => CLUSTER_ROLE_BINDING_KIND,
            ObjectKind::RoleBinding => ROLE_BINDING_KIND,
        }
    }

    /// Plural resource name used in API paths.
    pub fn resource(&self) -> &'static str {
        match self {
            ObjectKind::ClusterRole => "clusterroles",
            ObjectKind::Role => "roles",
            ObjectKind::ClusterRoleBinding => "clusterrolebindings",
            ObjectKind::RoleBinding => "rolebindings",
        }
    }

    pub fn is_namespaced(&self) -> bool {
        matches!(self, ObjectKind::Role | ObjectKind::RoleBinding)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = anyhow::Error;

    /// Accepts the kind name (any case) or the plural resource name,
    /// optionally qualified with a group (`roles.authorization.openshift.io`).
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let bare = s.split('.').next().unwrap_or_default().to_ascii_lowercase();
        ObjectKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(&bare) || k.resource() == bare)
            .ok_or_else(|| anyhow::anyhow!("unknown resource type {:?}", s))
    }
}

// --- Metadata access ---

/// Uniform access to kind and metadata across the object enums.
pub trait HasMetadata {
    fn kind(&self) -> ObjectKind;
    fn metadata(&self) -> &ObjectMeta;
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// `namespace/name` for namespaced kinds, `name` otherwise.
    fn key(&self) -> String {
        let meta = self.metadata();
        if self.kind().is_namespaced() {
            format!("{}/{}", meta.namespace, meta.name)
        } else {
            meta.name.clone()
        }
    }
}

// --- Tagged objects ---

/// Any legacy authorization object, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AuthorizationObject {
    ClusterRole(authorization::ClusterRole),
    Role(authorization::Role),
    ClusterRoleBinding(authorization::ClusterRoleBinding),
    RoleBinding(authorization::RoleBinding),
}

/// Any RBAC object, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RbacObject {
    ClusterRole(rbac::ClusterRole),
    Role(rbac::Role),
    ClusterRoleBinding(rbac::ClusterRoleBinding),
    RoleBinding(rbac::RoleBinding),
}

impl HasMetadata for AuthorizationObject {
    fn kind(&self) -> ObjectKind {
        match self {
            AuthorizationObject::ClusterRole(_) => ObjectKind::ClusterRole,
            AuthorizationObject::Role(_) => ObjectKind::Role,
            AuthorizationObject::ClusterRoleBinding(_) => ObjectKind::ClusterRoleBinding,
            AuthorizationObject::RoleBinding(_) => ObjectKind::RoleBinding,
        }
    }

    fn metadata(&self) -> &ObjectMeta {
        match self {
            AuthorizationObject::ClusterRole(o) => &o.metadata,
            AuthorizationObject::Role(o) => &o.metadata,
            AuthorizationObject::ClusterRoleBinding(o) => &o.metadata,
            AuthorizationObject::RoleBinding(o) => &o.metadata,
        }
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            AuthorizationObject::ClusterRole(o) => &mut o.metadata,
            AuthorizationObject::Role(o) => &mut o.metadata,
            AuthorizationObject::ClusterRoleBinding(o) => &mut o.metadata,
            AuthorizationObject::RoleBinding(o) => &mut o.metadata,
        }
    }
}

impl HasMetadata for RbacObject {
    fn kind(&self) -> ObjectKind {
        match self {
            RbacObject::ClusterRole(_) => ObjectKind::ClusterRole,
            RbacObject::Role(_) => ObjectKind::Role,
            RbacObject::ClusterRoleBinding(_) => ObjectKind::ClusterRoleBinding,
            RbacObject::RoleBinding(_) => ObjectKind::RoleBinding,
        }
    }

    fn metadata(&self) -> &ObjectMeta {
        match self {
            RbacObject::ClusterRole(o) => &o.metadata,
            RbacObject::Role(o) => &o.metadata,
            RbacObject::ClusterRoleBinding(o) => &o.metadata,
            RbacObject::RoleBinding(o) => &o.metadata,
        }
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            RbacObject::ClusterRole(o) => &mut o.metadata,
            RbacObject::Role(o) => &mut o.metadata,
            RbacObject::ClusterRoleBinding(o) => &mut o.metadata,
            RbacObject::RoleBinding(o) => &mut o.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("Role".parse::<ObjectKind>().unwrap(), ObjectKind::Role);
        assert_eq!("clusterroles".parse::<ObjectKind>().unwrap(), ObjectKind::ClusterRole);
        assert_eq!(
            "rolebindings.authorization.openshift.io".parse::<ObjectKind>().unwrap(),
            ObjectKind::RoleBinding
        );
        assert!("pods".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_key() {
        let role = AuthorizationObject::Role(authorization::Role {
            metadata: ObjectMeta {
                name: "edit".to_string(),
                namespace: "ns0".to_string(),
                ..Default::default()
            },
            rules: vec![],
        });
        assert_eq!(role.key(), "ns0/edit");

        let cluster_role = RbacObject::ClusterRole(rbac::ClusterRole {
            metadata: ObjectMeta {
                name: "admin".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(cluster_role.key(), "admin");
    }

    #[test]
    fn test_tagged_decode() {
        let json = r#"{
            "apiVersion": "rbac.authorization.k8s.io/v1",
            "kind": "RoleBinding",
            "metadata": {"name": "view", "namespace": "ns0"},
            "subjects": [{"kind": "User", "apiGroup": "rbac.authorization.k8s.io", "name": "alice"}],
            "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "ClusterRole", "name": "view"}
        }"#;
        let obj: RbacObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.kind(), ObjectKind::RoleBinding);
        assert_eq!(obj.key(), "ns0/view");
    }
}
