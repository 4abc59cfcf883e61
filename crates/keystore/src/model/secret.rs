use super::SecretId;
use chrono::NaiveDateTime;
use resource_framework::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    Symmetric,
    Public,
    Private,
    Passphrase,
    Certificate,
    #[default]
    Opaque,
}

/// A stored secret and its metadata.
///
/// `payload` is only present when the service returns it; listing secrets never does.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    pub secret_ref: Option<String>,
    pub name: Option<String>,
    pub algorithm: Option<String>,
    pub bit_length: Option<u32>,
    pub mode: Option<String>,
    pub secret_type: Option<SecretType>,
    pub expiration: Option<String>,
    pub status: Option<String>,
    pub content_types: BTreeMap<String, String>,
    pub payload: Option<String>,
    pub payload_content_type: Option<String>,
    pub payload_content_encoding: Option<String>,
    pub creator_id: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
}

/// Payload for storing a secret. Unset fields are left to the service.
///
/// `Debug` never prints the payload itself, so the value can be logged safely.
#[derive(Clone, Default, Serialize)]
pub struct SecretCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<SecretType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_encoding: Option<String>,
}

impl SecretCreate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Attaches a plain-text payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self.payload_content_type = Some("text/plain".to_owned());
        self
    }
}

impl fmt::Debug for SecretCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCreate")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("bit_length", &self.bit_length)
            .field("mode", &self.mode)
            .field("secret_type", &self.secret_type)
            .field("expiration", &self.expiration)
            .field("payload", &self.payload.as_ref().map(|_| "<redacted>"))
            .field("payload_content_type", &self.payload_content_type)
            .field("payload_content_encoding", &self.payload_content_encoding)
            .finish()
    }
}

/// Every writable field is optional, so updates reuse the create payload.
pub type SecretUpdate = SecretCreate;

impl Resource for Secret {
    type Id = SecretId;
    type Create = SecretCreate;
    type Update = SecretUpdate;

    const KIND: &'static str = "secret";
    const BASE_PATH: &'static str = "secrets";
    const RESOURCES_KEY: &'static str = "secrets";
    const REF_KEY: &'static str = "secret_ref";

    fn href(&self) -> Option<&str> {
        self.secret_ref.as_deref()
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
    fn test_decodes_listing_entry() {
        let secret: Secret = serde_json::from_value(json!({
            "secret_ref": "https://kms/v1/secrets/s-1/",
            "name": "db-password",
            "secret_type": "passphrase",
            "expiration": null,
            "content_types": {"default": "text/plain"}
        }))
        .unwrap();

        assert_eq!(secret.id(), Some(SecretId::from("s-1")));
        assert_eq!(secret.secret_type, Some(SecretType::Passphrase));
        assert_eq!(secret.content_types["default"], "text/plain");
        assert!(secret.payload.is_none());
    }

    #[test]
    fn test_payload_sets_content_type() {
        let payload = SecretCreate::named("token").with_payload("hunter2");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "token", "payload": "hunter2", "payload_content_type": "text/plain"})
        );
    }

    #[test]
    fn test_debug_redacts_payload() {
        let rendered = format!("{:?}", SecretCreate::named("x").with_payload("p"));
        assert!(!rendered.contains("\"p\""));
        assert!(rendered.contains("<redacted>"));

        let rendered = format!("{:?}", SecretCreate::named("db-password").with_payload("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("db-password"));
        assert!(rendered.contains("text/plain"));

        let empty = format!("{:?}", SecretCreate::named("x"));
        assert!(empty.contains("payload: None"));
    }
}
