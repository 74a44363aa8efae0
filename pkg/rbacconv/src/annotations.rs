use pkg_constants::rbac::{AUTOUPDATE_ANNOTATION, RECONCILE_PROTECT_ANNOTATION};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Negation table for the only values either annotation recognizes.
const INVERTED: [(&str, &str); 2] = [("true", "false"), ("false", "true")];

/// Swap `openshift.io/reconcile-protect` for `rbac.authorization.k8s.io/autoupdate`.
pub fn convert_to_rbac_annotations(
    annotations: &BTreeMap<String, String>,
) -> Cow<'_, BTreeMap<String, String>> {
    invert(annotations, RECONCILE_PROTECT_ANNOTATION, AUTOUPDATE_ANNOTATION)
}

/// Swap `rbac.authorization.k8s.io/autoupdate` for `openshift.io/reconcile-protect`.
pub fn convert_to_authorization_annotations(
    annotations: &BTreeMap<String, String>,
) -> Cow<'_, BTreeMap<String, String>> {
    invert(annotations, AUTOUPDATE_ANNOTATION, RECONCILE_PROTECT_ANNOTATION)
}

/// Replace `from_key` with `to_key` holding the negated value.
///
/// Absent keys and unrecognized values leave the map untouched and borrowed.
fn invert<'a>(
    annotations: &'a BTreeMap<String, String>,
    from_key: &str,
    to_key: &str,
) -> Cow<'a, BTreeMap<String, String>> {
    let Some(value) = annotations.get(from_key) else {
        return Cow::Borrowed(annotations);
    };
    let Some((_, negated)) = INVERTED.iter().find(|(v, _)| *v == value.as_str()) else {
        return Cow::Borrowed(annotations);
    };

    let mut out = annotations.clone();
    out.remove(from_key);
    out.insert(to_key.to_string(), negated.to_string());
    Cow::Owned(out)
}
