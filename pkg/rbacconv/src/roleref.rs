use pkg_constants::rbac::{CLUSTER_ROLE_KIND, RBAC_GROUP, ROLE_KIND};
use pkg_types::{authorization, rbac};

use crate::error::ConversionError;

/// An empty namespace references a cluster role, anything else a namespaced role.
pub fn convert_to_rbac_role_ref(role_ref: &authorization::RoleRef) -> rbac::RoleRef {
    let kind = if role_ref.namespace.is_empty() {
        CLUSTER_ROLE_KIND
    } else {
        ROLE_KIND
    };
    rbac::RoleRef {
        api_group: RBAC_GROUP.to_string(),
        kind: kind.to_string(),
        name: role_ref.name.clone(),
    }
}

/// `namespace` is the owning binding's namespace, or empty for a cluster binding.
pub fn convert_to_authorization_role_ref(
    role_ref: &rbac::RoleRef,
    namespace: &str,
) -> Result<authorization::RoleRef, ConversionError> {
    let namespace = match role_ref.kind.as_str() {
        CLUSTER_ROLE_KIND => "",
        ROLE_KIND => namespace,
        other => {
            return Err(ConversionError::InvalidRoleRefKind {
                kind: other.to_string(),
                name: role_ref.name.clone(),
            });
        }
    };
    Ok(authorization::RoleRef {
        name: role_ref.name.clone(),
        namespace: namespace.to_string(),
    })
}
