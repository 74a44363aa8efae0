//! API groups, kind names, and well-known annotations shared by both
//! authorization models.

// ─── API groups ───────────────────────────────────────────────────────────

/// Group of the legacy rule-based authorization API.
pub const AUTHORIZATION_GROUP: &str = "authorization.openshift.io";

/// Group of the RBAC API. Also the fixed `apiGroup` of RBAC users, groups and role refs.
pub const RBAC_GROUP: &str = "rbac.authorization.k8s.io";

/// `apiVersion` written on legacy authorization objects.
pub const AUTHORIZATION_API_VERSION: &str = "authorization.openshift.io/v1";

/// `apiVersion` written on RBAC objects.
pub const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";

// ─── Kinds ────────────────────────────────────────────────────────────────

pub const CLUSTER_ROLE_KIND: &str = "ClusterRole";
pub const ROLE_KIND: &str = "Role";
pub const CLUSTER_ROLE_BINDING_KIND: &str = "ClusterRoleBinding";
pub const ROLE_BINDING_KIND: &str = "RoleBinding";

pub const USER_KIND: &str = "User";
pub const GROUP_KIND: &str = "Group";
pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";

/// Legacy-only subject kinds for identities whose names are not valid user/group names.
pub const SYSTEM_USER_KIND: &str = "SystemUser";
pub const SYSTEM_GROUP_KIND: &str = "SystemGroup";

// ─── Annotations ──────────────────────────────────────────────────────────

/// Legacy annotation: "true" means the reconciler must leave the object alone.
pub const RECONCILE_PROTECT_ANNOTATION: &str = "openshift.io/reconcile-protect";

/// RBAC annotation: "false" means the reconciler must leave the object alone.
/// Polarity is the inverse of [`RECONCILE_PROTECT_ANNOTATION`].
pub const AUTOUPDATE_ANNOTATION: &str = "rbac.authorization.k8s.io/autoupdate";
