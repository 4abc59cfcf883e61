//! # Resource Trait
//!
//! The `Resource` trait defines the contract every remote resource kind (Container, Order,
//! Secret, …) must implement to be served by the generic `ResourceActor`. It names the
//! associated id and payload types and the REST coordinates of the collection (path, list
//! key, reference key). Implementing it is all it takes to get the uniform
//! create / get / update / delete / list / find API for a new kind.
//!
//! # Architecture Note
//! The key manager identifies entities by *reference URLs*
//! (`"container_ref": "https://kms/v1/containers/<uuid>"`). The id is the last path segment
//! of that reference, see [`id_from_ref`]. Instances only carry the reference; the id is
//! derived on demand by the provided [`Resource::id`] method.

use crate::error::SessionError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any remote resource kind must implement to be served by `ResourceActor`.
///
/// Values are read and written wholesale as JSON objects, hence the serde bounds on the
/// entity and on both payload types.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The unique identifier for this kind. Ids are opaque strings on the wire.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<String> + AsRef<str> + 'static;

    /// The attributes sent when creating an instance.
    type Create: Serialize + Send + Sync + Debug + 'static;

    /// The attributes sent when updating an existing instance.
    type Update: Serialize + Send + Sync + Debug + 'static;

    /// Human readable kind, used in logs and errors (e.g. `"container"`).
    const KIND: &'static str;

    /// Collection path relative to the service endpoint (e.g. `"containers"`).
    const BASE_PATH: &'static str;

    /// Key holding the array in list responses (e.g. `"containers"`).
    const RESOURCES_KEY: &'static str;

    /// Key holding the reference URL (e.g. `"container_ref"`).
    const REF_KEY: &'static str;

    /// The reference URL, if the service has assigned one.
    fn href(&self) -> Option<&str>;

    /// The display name used by `find`.
    fn name(&self) -> Option<&str>;

    /// The id derived from [`Resource::href`].
    fn id(&self) -> Option<Self::Id> {
        self.href()
            .map(id_from_ref)
            .filter(|id| !id.is_empty())
            .map(|id| Self::Id::from(id.to_owned()))
    }
}

/// Conversion accepted wherever a proxy method takes "an id or an instance".
///
/// Instances convert through their reference; an instance the service never saw
/// fails with [`SessionError::MissingId`].
pub trait IntoResourceId<T: Resource> {
    fn into_resource_id(self) -> Result<T::Id, SessionError>;
}

/// Filters understood by `list`. Pagination is left to the service defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub name: Option<String>,
}

impl ListQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Returns the last non-empty path segment of a reference URL.
///
/// A bare id is returned unchanged.
pub fn id_from_ref(href: &str) -> &str {
    href.trim_end_matches('/').rsplit('/').next().unwrap_or(href)
}

/// Shallow-merges the fields of `patch` into `target`, skipping nulls.
///
/// Both values must be JSON objects.
pub fn merge_attrs(target: &mut Value, patch: Value) -> Result<(), SessionError> {
    let (Value::Object(target), Value::Object(patch)) = (target, patch) else {
        return Err(SessionError::InvalidResponse(
            "expected JSON objects".to_string(),
        ));
    };
    for (key, value) in patch {
        if !value.is_null() {
            target.insert(key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_from_ref_takes_last_segment() {
        assert_eq!(
            id_from_ref("https://kms.example.com/v1/secrets/3f1a-42"),
            "3f1a-42"
        );
        assert_eq!(id_from_ref("https://kms/v1/containers/abc/"), "abc");
        assert_eq!(id_from_ref("plain-id"), "plain-id");
    }

    #[test]
    fn test_merge_attrs_skips_nulls() {
        let mut target = json!({ "name": "old", "status": "ACTIVE" });
        merge_attrs(&mut target, json!({ "name": "new", "status": null, "mode": "cbc" })).unwrap();
        assert_eq!(
            target,
            json!({ "name": "new", "status": "ACTIVE", "mode": "cbc" })
        );
    }

    #[test]
    fn test_merge_attrs_rejects_non_objects() {
        let mut target = json!([1, 2]);
        let result = merge_attrs(&mut target, json!({ "a": 1 }));
        assert!(matches!(result, Err(SessionError::InvalidResponse(_))));
    }
}
