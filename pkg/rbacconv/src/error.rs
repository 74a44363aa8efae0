use thiserror::Error;

/// Malformed input that no amount of retrying will fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid kind for origin subject: {0:?}")]
    InvalidOriginSubjectKind(String),

    #[error("invalid kind for rbac subject: {0:?}")]
    InvalidRbacSubjectKind(String),

    #[error("invalid kind {kind:?} for rbac role ref {name:?}")]
    InvalidRoleRefKind { kind: String, name: String },

    #[error(
        "invalid origin cluster role binding {name}: attempts to reference role in namespace {namespace:?} instead of cluster scope"
    )]
    ClusterRoleBindingNamespace { name: String, namespace: String },

    #[error(
        "invalid origin role binding {name}: attempts to reference role in namespace {actual:?} instead of current namespace {expected:?}"
    )]
    RoleBindingNamespace {
        name: String,
        actual: String,
        expected: String,
    },

    #[error("unsupported apiVersion {0:?}")]
    UnsupportedApiVersion(String),

    #[error("malformed object: {0}")]
    Malformed(String),
}
