//! Conversion at the serialization boundary.
//!
//! Objects of either model are recognized by `apiVersion` + `kind` and
//! converted to the other model by dispatching on the kind.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use pkg_constants::rbac::{AUTHORIZATION_API_VERSION, RBAC_API_VERSION};
use pkg_types::object::{AuthorizationObject, HasMetadata, RbacObject};

use crate::error::ConversionError;
use crate::objects::*;

/// An object of either model.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Authorization(AuthorizationObject),
    Rbac(RbacObject),
}

pub fn convert_to_rbac(obj: &AuthorizationObject) -> Result<RbacObject, ConversionError> {
    let converted = match obj {
        AuthorizationObject::ClusterRole(o) => RbacObject::ClusterRole(convert_to_rbac_cluster_role(o)?),
        AuthorizationObject::Role(o) => RbacObject::Role(convert_to_rbac_role(o)?),
        AuthorizationObject::ClusterRoleBinding(o) => {
            RbacObject::ClusterRoleBinding(convert_to_rbac_cluster_role_binding(o)?)
        }
        AuthorizationObject::RoleBinding(o) => RbacObject::RoleBinding(convert_to_rbac_role_binding(o)?),
    };
    Ok(converted)
}

pub fn convert_to_authorization(obj: &RbacObject) -> Result<AuthorizationObject, ConversionError> {
    let converted = match obj {
        RbacObject::ClusterRole(o) => {
            AuthorizationObject::ClusterRole(convert_to_authorization_cluster_role(o)?)
        }
        RbacObject::Role(o) => AuthorizationObject::Role(convert_to_authorization_role(o)?),
        RbacObject::ClusterRoleBinding(o) => {
            AuthorizationObject::ClusterRoleBinding(convert_to_authorization_cluster_role_binding(o)?)
        }
        RbacObject::RoleBinding(o) => {
            AuthorizationObject::RoleBinding(convert_to_authorization_role_binding(o)?)
        }
    };
    Ok(converted)
}

/// Convert an object into the other model.
pub fn convert(obj: &Object) -> Result<Object, ConversionError> {
    match obj {
        Object::Authorization(o) => convert_to_rbac(o).map(Object::Rbac),
        Object::Rbac(o) => convert_to_authorization(o).map(Object::Authorization),
    }
}

/// Decode a raw object, choosing the model from its `apiVersion`.
pub fn decode(value: Value) -> Result<Object, ConversionError> {
    let api_version = value
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let obj = match api_version.as_str() {
        AUTHORIZATION_API_VERSION => Object::Authorization(
            serde_json::from_value(value).map_err(|e| ConversionError::Malformed(e.to_string()))?,
        ),
        RBAC_API_VERSION => Object::Rbac(
            serde_json::from_value(value).map_err(|e| ConversionError::Malformed(e.to_string()))?,
        ),
        _ => return Err(ConversionError::UnsupportedApiVersion(api_version)),
    };
    Ok(obj)
}

/// Encode an object with its `apiVersion` and `kind`.
pub fn encode(obj: &Object) -> Result<Value, ConversionError> {
    let (api_version, value) = match obj {
        Object::Authorization(o) => (AUTHORIZATION_API_VERSION, serde_json::to_value(o)),
        Object::Rbac(o) => (RBAC_API_VERSION, serde_json::to_value(o)),
    };
    let mut value = value.map_err(|e| ConversionError::Malformed(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        map.insert("apiVersion".to_string(), Value::String(api_version.to_string()));
    }
    Ok(value)
}

/// Decode every non-empty document of a multi-document YAML (or JSON) stream.
pub fn decode_documents(text: &str) -> anyhow::Result<Vec<Object>> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let obj = decode(value)?;
        match &obj {
            Object::Authorization(o) => debug!("Decoded {} {}", o.kind(), o.key()),
            Object::Rbac(o) => debug!("Decoded rbac {} {}", o.kind(), o.key()),
        }
        objects.push(obj);
    }
    Ok(objects)
}
