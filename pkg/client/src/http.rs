use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use pkg_constants::paths::{AUTHORIZATION_API_PREFIX, RBAC_API_PREFIX};
use pkg_constants::rbac::{AUTHORIZATION_GROUP, RBAC_GROUP};
use pkg_types::object::{AuthorizationObject, ObjectKind, RbacObject};

use crate::ObjectClient;
use crate::error::FetchError;

/// Subset of the API server's `Status` error body.
#[derive(Debug, Default, Deserialize)]
struct Status {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<Value>,
}

/// `ObjectClient` talking to the API server over HTTP(S).
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    server: String,
    token: Option<String>,
}

impl HttpClient {
    /// Certificate verification is skipped only when `insecure_skip_tls_verify` is set.
    pub fn new(
        server: &str,
        token: Option<String>,
        timeout: Duration,
        insecure_skip_tls_verify: bool,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_skip_tls_verify)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            server: server.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get_json(&self, path: &str, resource: &str, name: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.server, path);
        debug!("GET {}", url);

        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(transport_error)?;

        let code = resp.status().as_u16();
        if resp.status().is_success() {
            return resp
                .json::<Value>()
                .await
                .map_err(|e| FetchError::Decode(e.to_string()));
        }

        let body = resp.text().await.unwrap_or_default();
        let status: Status = serde_json::from_str(&body).unwrap_or_default();
        Err(classify_status(code, status, resource, name, body))
    }
}

#[async_trait]
impl ObjectClient for HttpClient {
    async fn get_authorization(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<AuthorizationObject, FetchError> {
        let path = object_path(AUTHORIZATION_API_PREFIX, kind, namespace, name);
        let resource = format!("{}.{}", kind.resource(), AUTHORIZATION_GROUP);
        let value = self.get_json(&path, &resource, name).await?;
        decode_authorization(kind, value)
    }

    async fn list_authorization(
        &self,
        kind: ObjectKind,
        namespace: Option<&str>,
    ) -> Result<Vec<AuthorizationObject>, FetchError> {
        let path = list_path(AUTHORIZATION_API_PREFIX, kind, namespace);
        let resource = format!("{}.{}", kind.resource(), AUTHORIZATION_GROUP);
        let value = self.get_json(&path, &resource, "").await?;
        let list: ObjectList = decode(value)?;
        list.items
            .into_iter()
            .map(|item| decode_authorization(kind, item))
            .collect()
    }

    async fn get_rbac(
        &self,
        kind: ObjectKind,
        namespace: &str,
        name: &str,
    ) -> Result<RbacObject, FetchError> {
        let path = object_path(RBAC_API_PREFIX, kind, namespace, name);
        let resource = format!("{}.{}", kind.resource(), RBAC_GROUP);
        let value = self.get_json(&path, &resource, name).await?;
        decode_rbac(kind, value)
    }
}

fn object_path(prefix: &str, kind: ObjectKind, namespace: &str, name: &str) -> String {
    if kind.is_namespaced() {
        format!("{}/namespaces/{}/{}/{}", prefix, namespace, kind.resource(), name)
    } else {
        format!("{}/{}/{}", prefix, kind.resource(), name)
    }
}

fn list_path(prefix: &str, kind: ObjectKind, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if kind.is_namespaced() => {
            format!("{}/namespaces/{}/{}", prefix, ns, kind.resource())
        }
        _ => format!("{}/{}", prefix, kind.resource()),
    }
}

/// Not-found and timeout responses are kept distinct: callers treat them as transient.
fn classify_status(code: u16, status: Status, resource: &str, name: &str, body: String) -> FetchError {
    match (code, status.reason.as_str()) {
        (404, _) | (_, "NotFound") => FetchError::NotFound {
            resource: resource.to_string(),
            name: name.to_string(),
        },
        (504, _) | (_, "ServerTimeout") | (_, "Timeout") => {
            FetchError::ServerTimeout(if status.message.is_empty() { body } else { status.message })
        }
        _ => FetchError::Status {
            code,
            message: if status.message.is_empty() { body } else { status.message },
        },
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::ServerTimeout(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

// List items usually omit `kind`, so objects are decoded by the requested kind
// rather than through the tagged enum.
fn decode_authorization(kind: ObjectKind, value: Value) -> Result<AuthorizationObject, FetchError> {
    Ok(match kind {
        ObjectKind::ClusterRole => AuthorizationObject::ClusterRole(decode(value)?),
        ObjectKind::Role => AuthorizationObject::Role(decode(value)?),
        ObjectKind::ClusterRoleBinding => AuthorizationObject::ClusterRoleBinding(decode(value)?),
        ObjectKind::RoleBinding => AuthorizationObject::RoleBinding(decode(value)?),
    })
}

fn decode_rbac(kind: ObjectKind, value: Value) -> Result<RbacObject, FetchError> {
    Ok(match kind {
        ObjectKind::ClusterRole => RbacObject::ClusterRole(decode(value)?),
        ObjectKind::Role => RbacObject::Role(decode(value)?),
        ObjectKind::ClusterRoleBinding => RbacObject::ClusterRoleBinding(decode(value)?),
        ObjectKind::RoleBinding => RbacObject::RoleBinding(decode(value)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Path, http::StatusCode, response::IntoResponse, routing::get};
    use pkg_types::object::HasMetadata;
    use serde_json::json;

    async fn get_role(Path((ns, name)): Path<(String, String)>) -> impl IntoResponse {
        if name == "slow" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"kind": "Status", "reason": "ServerTimeout", "message": "try later"})),
            )
                .into_response();
        }
        if name == "gateway" {
            return (StatusCode::GATEWAY_TIMEOUT, "upstream timed out").into_response();
        }
        if name == "busy" {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"kind": "Status", "reason": "Timeout", "message": "request did not complete"})),
            )
                .into_response();
        }
        if name == "hang" {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if name == "secret" {
            return (StatusCode::FORBIDDEN, Json(json!({"reason": "Forbidden", "message": "denied"})))
                .into_response();
        }
        (
            StatusCode::OK,
            Json(json!({
                "metadata": {"name": name, "namespace": ns},
                "rules": [{"verbs": ["get"], "resources": ["pods"], "apiGroups": [""]}]
            })),
        )
            .into_response()
    }

    async fn list_cluster_roles() -> impl IntoResponse {
        Json(json!({
            "kind": "ClusterRoleList",
            "items": [
                {"metadata": {"name": "admin"}, "rules": []},
                {"metadata": {"name": "view"}, "rules": []}
            ]
        }))
    }

    async fn start_server() -> String {
        let app = Router::new()
            .route(
                "/apis/authorization.openshift.io/v1/namespaces/{ns}/roles/{name}",
                get(get_role),
            )
            .route(
                "/apis/authorization.openshift.io/v1/clusterroles",
                get(list_cluster_roles),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(server: &str) -> HttpClient {
        HttpClient::new(server, Some("token".to_string()), Duration::from_secs(5), false).unwrap()
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            object_path(RBAC_API_PREFIX, ObjectKind::RoleBinding, "ns0", "view"),
            "/apis/rbac.authorization.k8s.io/v1/namespaces/ns0/rolebindings/view"
        );
        assert_eq!(
            object_path(RBAC_API_PREFIX, ObjectKind::ClusterRole, "ignored", "admin"),
            "/apis/rbac.authorization.k8s.io/v1/clusterroles/admin"
        );
        assert_eq!(
            list_path(AUTHORIZATION_API_PREFIX, ObjectKind::ClusterRoleBinding, Some("ns0")),
            "/apis/authorization.openshift.io/v1/clusterrolebindings"
        );
    }

    #[tokio::test]
    async fn test_get_and_classify() {
        let server = start_server().await;
        let client = client(&server);

        let role = client
            .get_authorization(ObjectKind::Role, "ns0", "edit")
            .await
            .unwrap();
        assert_eq!(role.key(), "ns0/edit");

        let err = client
            .get_authorization(ObjectKind::Role, "ns0", "slow")
            .await
            .unwrap_err();
        assert!(err.is_server_timeout());

        let err = client
            .get_authorization(ObjectKind::Role, "ns0", "secret")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                code: 403,
                message: "denied".to_string()
            }
        );

        let err = client
            .get_rbac(ObjectKind::ClusterRole, "", "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            r#"clusterroles.rbac.authorization.k8s.io "missing" not found"#
        );
    }

    #[tokio::test]
    async fn test_timeouts_are_server_timeouts() {
        let server = start_server().await;
        let client = client(&server);

        let err = client
            .get_authorization(ObjectKind::Role, "ns0", "gateway")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::ServerTimeout("upstream timed out".to_string()));

        let err = client
            .get_authorization(ObjectKind::Role, "ns0", "busy")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::ServerTimeout("request did not complete".to_string()));

        let impatient =
            HttpClient::new(&server, None, Duration::from_millis(200), false).unwrap();
        let err = impatient
            .get_authorization(ObjectKind::Role, "ns0", "hang")
            .await
            .unwrap_err();
        assert!(err.is_server_timeout());
    }

    #[tokio::test]
    async fn test_list_decodes_items_by_kind() {
        let server = start_server().await;
        let roles = client(&server)
            .list_authorization(ObjectKind::ClusterRole, None)
            .await
            .unwrap();
        let names: Vec<String> = roles.iter().map(|r| r.key()).collect();
        assert_eq!(names, vec!["admin".to_string(), "view".to_string()]);
    }
}
