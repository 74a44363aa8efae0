use pkg_types::object::{HasMetadata, RbacObject};
use pkg_types::rbac;

/// Prepare a freshly converted RBAC object for creation.
///
/// The legacy authorizer matched verbs, groups and resources case-insensitively
/// and RBAC does not, so those are lowercased. Resource names and URLs are
/// exact identifiers and are left alone. The resource version is cleared
/// because a create must not carry one.
pub fn normalize_for_create(obj: &mut RbacObject) {
    match obj {
        RbacObject::ClusterRole(role) => normalize_rules(&mut role.rules),
        RbacObject::Role(role) => normalize_rules(&mut role.rules),
        RbacObject::ClusterRoleBinding(_) | RbacObject::RoleBinding(_) => {}
    }
    obj.metadata_mut().resource_version.clear();
}

fn normalize_rules(rules: &mut [rbac::PolicyRule]) {
    for rule in rules {
        lowercase_all(&mut rule.verbs);
        lowercase_all(&mut rule.api_groups);
        lowercase_all(&mut rule.resources);
    }
}

fn lowercase_all(values: &mut [String]) {
    for value in values {
        *value = value.to_lowercase();
    }
}
