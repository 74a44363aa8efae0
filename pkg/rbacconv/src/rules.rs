use pkg_types::{authorization, rbac};
use std::collections::BTreeSet;

/// Convert legacy rules to RBAC rules.
///
/// Rules with attribute restrictions are dropped: the legacy authorizer never
/// matched them, and RBAC cannot express them. A rule that selects both
/// resources and non-resource URLs is split in two, since an RBAC rule must
/// do one or the other.
pub fn convert_to_rbac_rules(in_rules: &[authorization::PolicyRule]) -> Vec<rbac::PolicyRule> {
    let mut rules = Vec::with_capacity(in_rules.len());
    for rule in in_rules {
        if rule.attribute_restrictions.is_some() {
            continue;
        }

        if rule.is_resource_rule() && rule.is_non_resource_rule() {
            rules.push(rbac::PolicyRule {
                verbs: to_list(&rule.verbs),
                api_groups: rule.api_groups.clone(),
                resources: to_list(&rule.resources),
                resource_names: to_list(&rule.resource_names),
                non_resource_urls: vec![],
            });
            rules.push(rbac::PolicyRule {
                verbs: to_list(&rule.verbs),
                non_resource_urls: to_list(&rule.non_resource_urls),
                ..Default::default()
            });
        } else {
            rules.push(rbac::PolicyRule {
                verbs: to_list(&rule.verbs),
                api_groups: rule.api_groups.clone(),
                resources: to_list(&rule.resources),
                resource_names: to_list(&rule.resource_names),
                non_resource_urls: to_list(&rule.non_resource_urls),
            });
        }
    }
    rules
}

/// Convert RBAC rules back to legacy rules, one to one.
pub fn convert_to_authorization_rules(
    in_rules: &[rbac::PolicyRule],
) -> Vec<authorization::PolicyRule> {
    in_rules
        .iter()
        .map(|rule| authorization::PolicyRule {
            verbs: to_set(&rule.verbs),
            attribute_restrictions: None,
            api_groups: rule.api_groups.clone(),
            resources: to_set(&rule.resources),
            resource_names: to_set(&rule.resource_names),
            non_resource_urls: to_set(&rule.non_resource_urls),
        })
        .collect()
}

fn to_list(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().cloned().collect()
}

fn to_set(list: &[String]) -> BTreeSet<String> {
    list.iter().cloned().collect()
}
