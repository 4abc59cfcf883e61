//! # Keystore
//!
//! A typed proxy over a Barbican-style key manager. Containers, orders and secrets each
//! get create / delete / find / get / list / update on [`Proxy`], and every call is handed
//! unchanged to the generic session layer in `resource_framework`.
//!
//! ## Module Tour
//!
//! - [`model`] - `Container`, `Order`, `Secret`, their id newtypes and payloads
//! - [`proxy`] - the 18 forwarding methods
//! - [`error`] - [`KeystoreError`], the domain view of session failures
//! - [`config`] - environment settings and backend selection
//! - [`lifecycle`] - [`KeystoreSystem`] (actor wiring and shutdown) and tracing setup
//!
//! ## Quick Start
//!
//! ```rust
//! use keystore::{KeystoreSystem, Proxy};
//! use keystore::model::SecretCreate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keystore::KeystoreError> {
//!     let system = KeystoreSystem::in_memory(8);
//!
//!     let secret = system
//!         .proxy
//!         .create_secret(SecretCreate::named("db-password").with_payload("hunter2"))
//!         .await?;
//!     let found = system.proxy.find_secret("db-password").await?;
//!     assert_eq!(found.as_ref(), Some(&secret));
//!
//!     system.proxy.delete_secret(&secret, Proxy::DEFAULT_IGNORE_MISSING).await?;
//!     system.shutdown().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod proxy;

pub use config::KeystoreConfig;
pub use error::KeystoreError;
pub use lifecycle::KeystoreSystem;
pub use proxy::Proxy;
