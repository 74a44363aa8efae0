use pkg_types::object::{HasMetadata, RbacObject};

/// Report whether `candidate` differs from the persisted object it mirrors.
///
/// Store-assigned metadata (self link, uid, resource version, creation
/// timestamp) cannot be reproduced by conversion, so it is copied from
/// `persisted` into `candidate` before the deep comparison. `candidate` is
/// left modified.
pub fn is_update_required(candidate: &mut RbacObject, persisted: &RbacObject) -> bool {
    let from = persisted.metadata();
    let to = candidate.metadata_mut();
    to.self_link = from.self_link.clone();
    to.uid = from.uid.clone();
    to.resource_version = from.resource_version.clone();
    to.creation_timestamp = from.creation_timestamp;

    candidate != persisted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pkg_types::meta::ObjectMeta;
    use pkg_types::rbac;

    fn make_role(verbs: &[&str]) -> rbac::ClusterRole {
        rbac::ClusterRole {
            metadata: ObjectMeta {
                name: "reader".to_string(),
                ..Default::default()
            },
            rules: vec![rbac::PolicyRule {
                verbs: verbs.iter().map(|s| s.to_string()).collect(),
                resources: vec!["pods".to_string()],
                api_groups: vec![String::new()],
                ..Default::default()
            }],
            aggregation_rule: None,
        }
    }

    fn persisted(role: rbac::ClusterRole) -> RbacObject {
        let mut role = role;
        role.metadata.uid = "abc-123".to_string();
        role.metadata.resource_version = "99".to_string();
        role.metadata.self_link = "/apis/rbac.authorization.k8s.io/v1/clusterroles/reader".to_string();
        role.metadata.creation_timestamp = Some(Utc::now());
        RbacObject::ClusterRole(role)
    }

    #[test]
    fn test_store_metadata_ignored() {
        let stored = persisted(make_role(&["get"]));
        let mut candidate = RbacObject::ClusterRole(make_role(&["get"]));
        assert!(!is_update_required(&mut candidate, &stored));
        assert_eq!(candidate.metadata().uid, "abc-123");
    }

    #[test]
    fn test_rule_difference_detected() {
        let stored = persisted(make_role(&["get"]));
        let mut candidate = RbacObject::ClusterRole(make_role(&["get", "list"]));
        assert!(is_update_required(&mut candidate, &stored));
    }

    #[test]
    fn test_label_difference_detected() {
        let stored = persisted(make_role(&["get"]));
        let mut role = make_role(&["get"]);
        role.metadata.labels.insert("tier".to_string(), "gold".to_string());
        let mut candidate = RbacObject::ClusterRole(role);
        assert!(is_update_required(&mut candidate, &stored));
    }
}
