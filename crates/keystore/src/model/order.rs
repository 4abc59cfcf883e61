use super::OrderId;
use chrono::NaiveDateTime;
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

/// What an order asks the key manager to generate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Key,
    Asymmetric,
    Certificate,
}

/// Parameters of the secret an order generates. The order's name lives here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

/// A request for the key manager to generate a key, key pair or certificate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_ref: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub status: Option<String>,
    pub meta: OrderMeta,
    pub secret_ref: Option<String>,
    pub container_ref: Option<String>,
    pub error_status_code: Option<String>,
    pub error_reason: Option<String>,
    pub sub_status: Option<String>,
    pub sub_status_message: Option<String>,
    pub creator_id: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
}

/// Payload for creating an order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct OrderCreate {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub meta: OrderMeta,
}

impl OrderCreate {
    /// A symmetric key order, e.g. `OrderCreate::key("disk", "aes", 256)`.
    pub fn key(name: impl Into<String>, algorithm: impl Into<String>, bit_length: u32) -> Self {
        Self {
            order_type: OrderType::Key,
            meta: OrderMeta {
                name: Some(name.into()),
                algorithm: Some(algorithm.into()),
                bit_length: Some(bit_length),
                ..Default::default()
            },
        }
    }
}

/// Payload for updating an order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<OrderMeta>,
}

impl Resource for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;

    const KIND: &'static str = "order";
    const BASE_PATH: &'static str = "orders";
    const RESOURCES_KEY: &'static str = "orders";
    const REF_KEY: &'static str = "order_ref";

    fn href(&self) -> Option<&str> {
        self.order_ref.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.meta.name.as_deref()
    }
}
