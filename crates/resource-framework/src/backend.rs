//! # Backend Trait
//!
//! A `Backend<T>` performs the raw storage operations for one resource kind. It reports
//! absence with `None` / `false` rather than errors; the `ResourceActor` turns those into
//! `NotFound` (or not) depending on the request, so the not-found rules live in one place.
//!
//! Two implementations ship with the framework:
//! - [`MemoryBackend`](crate::memory::MemoryBackend) – in-process emulation of the key manager.
//! - [`HttpBackend`](crate::http::HttpBackend) – REST client against a real key manager.

use crate::error::SessionError;
use crate::resource::{ListQuery, Resource};
use async_trait::async_trait;

#[async_trait]
pub trait Backend<T: Resource>: Send + 'static {
    /// Create a new instance and return it as the service sees it.
    async fn create(&mut self, attrs: T::Create) -> Result<T, SessionError>;

    /// Fetch one instance, `None` when it does not exist.
    async fn get(&mut self, id: &T::Id) -> Result<Option<T>, SessionError>;

    /// Apply `attrs` and return the updated instance, `None` when it does not exist.
    async fn update(&mut self, id: &T::Id, attrs: T::Update) -> Result<Option<T>, SessionError>;

    /// Remove an instance. Returns whether anything was removed.
    async fn delete(&mut self, id: &T::Id) -> Result<bool, SessionError>;

    /// One page of instances matching `query`.
    async fn list(&mut self, query: &ListQuery) -> Result<Vec<T>, SessionError>;
}
