//! # In-Memory Backend
//!
//! An in-process stand-in for the key manager. It assigns reference URLs the way the
//! service does, stamps `status` / `created` / `updated`, and keeps entities in insertion
//! order so `list` is deterministic.

use crate::backend::Backend;
use crate::error::SessionError;
use crate::resource::{merge_attrs, ListQuery, Resource};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Base URL used for generated references when none is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9311/v1";

/// Stores entities of one kind in memory.
#[derive(Debug)]
pub struct MemoryBackend<T: Resource> {
    base_url: String,
    store: HashMap<T::Id, T>,
    order: Vec<T::Id>,
}

impl<T: Resource> Default for MemoryBackend<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl<T: Resource> MemoryBackend<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            store: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn href(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, T::BASE_PATH, id)
    }
}

fn now() -> Value {
    json!(chrono::Utc::now().naive_utc())
}

#[async_trait]
impl<T: Resource> Backend<T> for MemoryBackend<T> {
    async fn create(&mut self, attrs: T::Create) -> Result<T, SessionError> {
        let uuid = Uuid::new_v4().to_string();
        let timestamp = now();

        let mut assigned = Map::new();
        assigned.insert(T::REF_KEY.to_owned(), json!(self.href(&uuid)));
        assigned.insert("status".to_owned(), json!("ACTIVE"));
        assigned.insert("created".to_owned(), timestamp.clone());
        assigned.insert("updated".to_owned(), timestamp);

        let mut body = serde_json::to_value(&attrs)?;
        merge_attrs(&mut body, Value::Object(assigned))?;

        let item: T = serde_json::from_value(body)?;
        let id = T::Id::from(uuid);
        self.store.insert(id.clone(), item.clone());
        self.order.push(id);
        Ok(item)
    }

    async fn get(&mut self, id: &T::Id) -> Result<Option<T>, SessionError> {
        Ok(self.store.get(id).cloned())
    }

    async fn update(&mut self, id: &T::Id, attrs: T::Update) -> Result<Option<T>, SessionError> {
        let Some(item) = self.store.get_mut(id) else {
            return Ok(None);
        };
        let mut body = serde_json::to_value(&*item)?;
        merge_attrs(&mut body, serde_json::to_value(&attrs)?)?;
        merge_attrs(&mut body, json!({ "updated": now() }))?;
        *item = serde_json::from_value(body)?;
        Ok(Some(item.clone()))
    }

    async fn delete(&mut self, id: &T::Id) -> Result<bool, SessionError> {
        if self.store.remove(id).is_none() {
            return Ok(false);
        }
        self.order.retain(|existing| existing != id);
        Ok(true)
    }

    async fn list(&mut self, query: &ListQuery) -> Result<Vec<T>, SessionError> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|item| match &query.name {
                Some(name) => item.name() == Some(name.as_str()),
                None => true,
            })
            .cloned()
            .collect())
    }
}
