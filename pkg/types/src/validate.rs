use anyhow::{Result, bail};

/// Validate a name used as a single API path segment.
/// Rules: not "." or "..", must not contain '/' or '%'.
pub fn validate_path_segment_name(name: &str) -> Result<()> {
    if name == "." || name == ".." {
        bail!("name may not be '{}'", name);
    }
    for illegal in ["/", "%"] {
        if name.contains(illegal) {
            bail!("name may not contain '{}'", illegal);
        }
    }
    Ok(())
}

/// Validate a legacy user name. Names failing this check belong to `SystemUser` subjects.
pub fn validate_user_name(name: &str) -> Result<()> {
    validate_identity_name(name)
}

/// Validate a legacy group name. Names failing this check belong to `SystemGroup` subjects.
pub fn validate_group_name(name: &str) -> Result<()> {
    validate_identity_name(name)
}

fn validate_identity_name(name: &str) -> Result<()> {
    validate_path_segment_name(name)?;
    if name.contains(':') {
        bail!("name '{}' may not contain \":\"", name);
    }
    if name == "~" {
        bail!("name may not equal \"~\"");
    }
    Ok(())
}
