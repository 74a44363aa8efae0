use serde::{Deserialize, Serialize};

/// `authz-migrate` configuration file (YAML).
///
/// Example `authz-migrate.yaml`:
/// ```yaml
/// server: https://10.0.0.1:6443
/// token: my-secret-token
/// timeout-secs: 30
/// namespace: team-a
/// insecure-skip-tls-verify: false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrateConfigFile {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "timeout-secs")]
    pub timeout_secs: Option<u64>,
    /// Restrict checks to one namespace; cluster-scoped objects are then ignored.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Accept any server certificate. Off unless set.
    #[serde(default, alias = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: Option<bool>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
