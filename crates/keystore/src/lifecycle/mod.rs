//! Runtime orchestration and lifecycle management.
//!
//! - [`KeystoreSystem`] - picks a backend, starts one actor per resource kind and shuts
//!   them down again
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod keystore_system;
pub mod tracing;

pub use keystore_system::*;
pub use tracing::*;
