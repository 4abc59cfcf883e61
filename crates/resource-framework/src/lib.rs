//! # Resource Framework
//!
//! Generic session plumbing for talking to a key manager. Every resource kind gets the same
//! six helpers (create, get, update, delete, list, find) behind a typed client, so a proxy
//! for a new kind is only a set of one-line forwarding methods.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Resource Layer** ([`Resource`]) - the entity shape, its payloads and where it lives
//!    on the service (`BASE_PATH`, `RESOURCES_KEY`, `REF_KEY`).
//! 2. **Runtime Layer** ([`ResourceActor`] + [`Backend`]) - sequential request processing
//!    and the rules shared by all kinds.
//! 3. **Interface Layer** ([`ResourceClient`]) - the cloneable handle callers use.
//!
//! ```text
//!  Proxy ──► ResourceClient<T> ──mpsc──► ResourceActor<T, B> ──► B: Backend<T>
//!                  ▲                                                 │
//!                  └───────────── oneshot(Result<_, SessionError>) ◄─┘
//! ```
//!
//! Two backends ship with the crate:
//!
//! - [`memory::MemoryBackend`] keeps entities in process and behaves like the service
//!   (reference URLs, `status`, timestamps). Used by tests and offline runs.
//! - [`http::HttpBackend`] speaks the key manager's JSON REST API through a shared
//!   [`http::HttpSession`].
//!
//! ## Shared Semantics
//!
//! - `get` / `update` of a missing entity is [`SessionError::NotFound`].
//! - `delete` of a missing entity succeeds when `ignore_missing` is set.
//! - `find` tries the argument as an id, then as an exact name. More than one match by
//!   name is [`SessionError::DuplicateResource`].
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and owns its backend.
//! - Requests to one kind are processed **sequentially**; different kinds run in parallel.
//! - Dropping every client ends the actor's loop.
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockClient` for scripted responses and
//! `create_mock_client` + `expect_*` helpers for asserting that a request was forwarded
//! unchanged.

pub mod actor;
pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod message;
pub mod mock;
pub mod resource;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use backend::Backend;
pub use client::ResourceClient;
pub use error::SessionError;
pub use message::{ResourceRequest, Response};
pub use resource::{id_from_ref, merge_attrs, IntoResourceId, ListQuery, Resource};
