//! Per-kind object conversion in both directions.
//!
//! Every function copies metadata verbatim apart from the reconcile
//! annotation, and delegates rules, subjects and role refs to the leaf
//! converters.

use pkg_types::meta::ObjectMeta;
use pkg_types::{authorization, rbac};

use crate::annotations::{convert_to_authorization_annotations, convert_to_rbac_annotations};
use crate::error::ConversionError;
use crate::roleref::{convert_to_authorization_role_ref, convert_to_rbac_role_ref};
use crate::rules::{convert_to_authorization_rules, convert_to_rbac_rules};
use crate::subjects::{convert_to_authorization_subjects, convert_to_rbac_subjects};

fn convert_to_rbac_meta(meta: &ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        annotations: convert_to_rbac_annotations(&meta.annotations).into_owned(),
        ..meta.clone()
    }
}

fn convert_to_authorization_meta(meta: &ObjectMeta) -> ObjectMeta {
    ObjectMeta {
        annotations: convert_to_authorization_annotations(&meta.annotations).into_owned(),
        ..meta.clone()
    }
}

// ============================================================
// Legacy authorization → RBAC
// ============================================================

pub fn convert_to_rbac_cluster_role(
    in_role: &authorization::ClusterRole,
) -> Result<rbac::ClusterRole, ConversionError> {
    Ok(rbac::ClusterRole {
        metadata: convert_to_rbac_meta(&in_role.metadata),
        rules: convert_to_rbac_rules(&in_role.rules),
        aggregation_rule: in_role.aggregation_rule.clone(),
    })
}

pub fn convert_to_rbac_role(in_role: &authorization::Role) -> Result<rbac::Role, ConversionError> {
    Ok(rbac::Role {
        metadata: convert_to_rbac_meta(&in_role.metadata),
        rules: convert_to_rbac_rules(&in_role.rules),
    })
}

pub fn convert_to_rbac_cluster_role_binding(
    in_binding: &authorization::ClusterRoleBinding,
) -> Result<rbac::ClusterRoleBinding, ConversionError> {
    if !in_binding.role_ref.namespace.is_empty() {
        return Err(ConversionError::ClusterRoleBindingNamespace {
            name: in_binding.metadata.name.clone(),
            namespace: in_binding.role_ref.namespace.clone(),
        });
    }

    Ok(rbac::ClusterRoleBinding {
        metadata: convert_to_rbac_meta(&in_binding.metadata),
        subjects: convert_to_rbac_subjects(&in_binding.subjects)?,
        role_ref: convert_to_rbac_role_ref(&in_binding.role_ref),
    })
}

pub fn convert_to_rbac_role_binding(
    in_binding: &authorization::RoleBinding,
) -> Result<rbac::RoleBinding, ConversionError> {
    let ref_namespace = &in_binding.role_ref.namespace;
    if !ref_namespace.is_empty() && *ref_namespace != in_binding.metadata.namespace {
        return Err(ConversionError::RoleBindingNamespace {
            name: in_binding.metadata.name.clone(),
            actual: ref_namespace.clone(),
            expected: in_binding.metadata.namespace.clone(),
        });
    }

    Ok(rbac::RoleBinding {
        metadata: convert_to_rbac_meta(&in_binding.metadata),
        subjects: convert_to_rbac_subjects(&in_binding.subjects)?,
        role_ref: convert_to_rbac_role_ref(&in_binding.role_ref),
    })
}

// ============================================================
// RBAC → legacy authorization
// ============================================================

pub fn convert_to_authorization_cluster_role(
    in_role: &rbac::ClusterRole,
) -> Result<authorization::ClusterRole, ConversionError> {
    Ok(authorization::ClusterRole {
        metadata: convert_to_authorization_meta(&in_role.metadata),
        rules: convert_to_authorization_rules(&in_role.rules),
        aggregation_rule: in_role.aggregation_rule.clone(),
    })
}

pub fn convert_to_authorization_role(
    in_role: &rbac::Role,
) -> Result<authorization::Role, ConversionError> {
    Ok(authorization::Role {
        metadata: convert_to_authorization_meta(&in_role.metadata),
        rules: convert_to_authorization_rules(&in_role.rules),
    })
}

pub fn convert_to_authorization_cluster_role_binding(
    in_binding: &rbac::ClusterRoleBinding,
) -> Result<authorization::ClusterRoleBinding, ConversionError> {
    Ok(authorization::ClusterRoleBinding {
        metadata: convert_to_authorization_meta(&in_binding.metadata),
        subjects: convert_to_authorization_subjects(&in_binding.subjects)?,
        role_ref: convert_to_authorization_role_ref(&in_binding.role_ref, "")?,
    })
}

pub fn convert_to_authorization_role_binding(
    in_binding: &rbac::RoleBinding,
) -> Result<authorization::RoleBinding, ConversionError> {
    Ok(authorization::RoleBinding {
        metadata: convert_to_authorization_meta(&in_binding.metadata),
        subjects: convert_to_authorization_subjects(&in_binding.subjects)?,
        role_ref: convert_to_authorization_role_ref(
            &in_binding.role_ref,
            &in_binding.metadata.namespace,
        )?,
    })
}
