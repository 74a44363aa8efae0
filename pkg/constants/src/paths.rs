//! API path and filesystem path constants.

// ─── API ──────────────────────────────────────────────────────────────────

/// Path prefix for the legacy authorization API.
pub const AUTHORIZATION_API_PREFIX: &str = "/apis/authorization.openshift.io/v1";

/// Path prefix for the RBAC API.
pub const RBAC_API_PREFIX: &str = "/apis/rbac.authorization.k8s.io/v1";

// ─── CLI ──────────────────────────────────────────────────────────────────

/// Default config file path for `authz-migrate`.
pub const DEFAULT_MIGRATE_CONFIG: &str = "/etc/k3rs/authz-migrate.yaml";
