use super::ContainerId;
use chrono::NaiveDateTime;
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

/// What a container groups together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    #[default]
    Generic,
    Rsa,
    Certificate,
}

/// A named reference from a container to one of its secrets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub name: String,
    pub secret_ref: String,
}

impl SecretRef {
    pub fn new(name: impl Into<String>, secret_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret_ref: secret_ref.into(),
        }
    }
}

/// A service registered as using a container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// A group of secret references stored under one reference URL.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub container_ref: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub container_type: Option<ContainerType>,
    pub status: Option<String>,
    pub secret_refs: Vec<SecretRef>,
    pub consumers: Vec<Consumer>,
    pub creator_id: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
}

/// Payload for creating a container.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ContainerCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secret_refs: Vec<SecretRef>,
}

impl ContainerCreate {
    pub fn new(name: impl Into<String>, container_type: ContainerType) -> Self {
        Self {
            name: Some(name.into()),
            container_type,
            secret_refs: Vec::new(),
        }
    }

    pub fn with_secret(mut self, name: impl Into<String>, secret_ref: impl Into<String>) -> Self {
        self.secret_refs.push(SecretRef::new(name, secret_ref));
        self
    }
}

/// Payload for updating a container. Only the fields that are set are sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ContainerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub container_type: Option<ContainerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_refs: Option<Vec<SecretRef>>,
}

impl Resource for Container {
    type Id = ContainerId;
    type Create = ContainerCreate;
    type Update = ContainerUpdate;

    const KIND: &'static str = "container";
    const BASE_PATH: &'static str = "containers";
    const RESOURCES_KEY: &'static str = "containers";
    const REF_KEY: &'static str = "container_ref";

    fn href(&self) -> Option<&str> {
        self.container_ref.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_service_body() {
        let body = json!({
            "container_ref": "http://kms/v1/containers/c-1",
            "name": "tls",
            "type": "certificate",
            "status": "ACTIVE",
            "secret_refs": [{"name": "certificate", "secret_ref": "http://kms/v1/secrets/s-1"}],
            "consumers": [{"name": "lb", "URL": "http://lb/1"}],
            "created": "2026-01-02T03:04:05.123456",
            "unknown_field": true
        });

        let container: Container = serde_json::from_value(body).unwrap();
        assert_eq!(container.id(), Some(ContainerId::from("c-1")));
        assert_eq!(container.container_type, Some(ContainerType::Certificate));
        assert_eq!(container.secret_refs[0].name, "certificate");
        assert_eq!(container.consumers[0].url, "http://lb/1");
        assert!(container.created.is_some());
        assert!(container.updated.is_none());
    }

    #[test]
    fn test_create_payload_omits_unset_fields() {
        let payload = ContainerCreate::new("plain", ContainerType::Generic);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "plain", "type": "generic"})
        );

        let update = ContainerUpdate {
            name: Some("renamed".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"name": "renamed"}));
    }
}
