//! Legacy rule-based authorization model (`authorization.openshift.io`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::meta::ObjectMeta;

// --- Policy rules ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(default)]
    pub verbs: BTreeSet<String>,
    /// Deprecated. Never honored by the authorizer and never representable in RBAC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_restrictions: Option<serde_json::Value>,
    /// Ordered and not deduplicated, unlike the other fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub resources: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub resource_names: BTreeSet<String>,
    #[serde(
        default,
        rename = "nonResourceURLs",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub non_resource_urls: BTreeSet<String>,
}

impl PolicyRule {
    /// True if any of the resource-selecting fields is populated.
    pub fn is_resource_rule(&self) -> bool {
        !self.api_groups.is_empty() || !self.resources.is_empty() || !self.resource_names.is_empty()
    }

    pub fn is_non_resource_rule(&self) -> bool {
        !self.non_resource_urls.is_empty()
    }
}

// --- Roles ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRole {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    /// Opaque; copied through conversion without inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_rule: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

// --- Subject ---

/// Identity referenced by a binding.
///
/// `kind` is one of User, SystemUser, Group, SystemGroup or ServiceAccount.
/// It stays a plain string so objects with unknown kinds still decode and
/// can be rejected by conversion with a precise error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: String,
    pub name: String,
    /// Only meaningful for service accounts.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

// --- Role reference ---

/// Reference from a binding to a role. An empty namespace means a cluster role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

// --- Bindings ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}
