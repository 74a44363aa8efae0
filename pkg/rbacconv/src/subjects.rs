use pkg_constants::rbac::{
    GROUP_KIND, RBAC_GROUP, SERVICE_ACCOUNT_KIND, SYSTEM_GROUP_KIND, SYSTEM_USER_KIND, USER_KIND,
};
use pkg_types::validate::{validate_group_name, validate_user_name};
use pkg_types::{authorization, rbac};

use crate::error::ConversionError;

/// Convert legacy subjects to RBAC subjects, failing on the first unknown kind.
///
/// RBAC has no System variants, so `SystemUser`/`SystemGroup` collapse into
/// `User`/`Group`.
pub fn convert_to_rbac_subjects(
    in_subjects: &[authorization::Subject],
) -> Result<Vec<rbac::Subject>, ConversionError> {
    in_subjects.iter().map(convert_to_rbac_subject).collect()
}

fn convert_to_rbac_subject(
    subject: &authorization::Subject,
) -> Result<rbac::Subject, ConversionError> {
    let converted = match subject.kind.as_str() {
        SERVICE_ACCOUNT_KIND => rbac::Subject {
            kind: SERVICE_ACCOUNT_KIND.to_string(),
            api_group: String::new(),
            name: subject.name.clone(),
            namespace: subject.namespace.clone(),
        },
        USER_KIND | SYSTEM_USER_KIND => rbac::Subject {
            kind: USER_KIND.to_string(),
            api_group: RBAC_GROUP.to_string(),
            name: subject.name.clone(),
            namespace: String::new(),
        },
        GROUP_KIND | SYSTEM_GROUP_KIND => rbac::Subject {
            kind: GROUP_KIND.to_string(),
            api_group: RBAC_GROUP.to_string(),
            name: subject.name.clone(),
            namespace: String::new(),
        },
        other => return Err(ConversionError::InvalidOriginSubjectKind(other.to_string())),
    };
    Ok(converted)
}

/// Convert RBAC subjects to legacy subjects, failing on the first unknown kind.
///
/// Users and groups whose names are not valid legacy user/group names become
/// `SystemUser`/`SystemGroup`. This reconstructs the distinction from name
/// shape; it is not an exact inverse of [`convert_to_rbac_subjects`].
pub fn convert_to_authorization_subjects(
    in_subjects: &[rbac::Subject],
) -> Result<Vec<authorization::Subject>, ConversionError> {
    in_subjects.iter().map(convert_to_authorization_subject).collect()
}

fn convert_to_authorization_subject(
    subject: &rbac::Subject,
) -> Result<authorization::Subject, ConversionError> {
    let converted = match subject.kind.as_str() {
        SERVICE_ACCOUNT_KIND => authorization::Subject {
            kind: SERVICE_ACCOUNT_KIND.to_string(),
            name: subject.name.clone(),
            namespace: subject.namespace.clone(),
        },
        USER_KIND => {
            let kind = if validate_user_name(&subject.name).is_ok() {
                USER_KIND
            } else {
                SYSTEM_USER_KIND
            };
            authorization::Subject {
                kind: kind.to_string(),
                name: subject.name.clone(),
                namespace: String::new(),
            }
        }
        GROUP_KIND => {
            let kind = if validate_group_name(&subject.name).is_ok() {
                GROUP_KIND
            } else {
                SYSTEM_GROUP_KIND
            };
            authorization::Subject {
                kind: kind.to_string(),
                name: subject.name.clone(),
                namespace: String::new(),
            }
        }
        other => return Err(ConversionError::InvalidRbacSubjectKind(other.to_string())),
    };
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(kind: &str, name: &str, namespace: &str) -> authorization::Subject {
        authorization::Subject {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }

    fn target(kind: &str, name: &str) -> rbac::Subject {
        rbac::Subject {
            kind: kind.to_string(),
            api_group: RBAC_GROUP.to_string(),
            name: name.to_string(),
            namespace: String::new(),
        }
    }

    #[test]
    fn test_forward_kinds() {
        let out = convert_to_rbac_subjects(&[
            origin("User", "alice", ""),
            origin("SystemUser", "system:admin", ""),
            origin("Group", "devs", ""),
            origin("SystemGroup", "system:masters", ""),
            origin("ServiceAccount", "builder", "ns0"),
        ])
        .unwrap();

        assert_eq!(out[0], target("User", "alice"));
        assert_eq!(out[1], target("User", "system:admin"));
        assert_eq!(out[2], target("Group", "devs"));
        assert_eq!(out[3], target("Group", "system:masters"));
        assert_eq!(
            out[4],
            rbac::Subject {
                kind: "ServiceAccount".to_string(),
                api_group: String::new(),
                name: "builder".to_string(),
                namespace: "ns0".to_string(),
            }
        );
    }

    #[test]
    fn test_reverse_reclassifies_system_names() {
        let out = convert_to_authorization_subjects(&[
            target("User", "alice"),
            target("User", "system:admin"),
            target("User", "~"),
            target("Group", "devs"),
            target("Group", "system:authenticated"),
        ])
        .unwrap();

        let kinds: Vec<&str> = out.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["User", "SystemUser", "SystemUser", "Group", "SystemGroup"]
        );
    }

    #[test]
    fn test_invalid_origin_kind() {
        let err = convert_to_rbac_subjects(&[
            origin("User", "alice", ""),
            origin("fancyuser", "bob", ""),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("fancyuser"));
        assert_eq!(err.to_string(), r#"invalid kind for origin subject: "fancyuser""#);
    }

    #[test]
    fn test_invalid_rbac_kind() {
        let err = convert_to_authorization_subjects(&[target("evenfancieruser", "bob")]).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid kind for rbac subject: "evenfancieruser""#);
    }
}
