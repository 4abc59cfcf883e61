//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber::fmt` layer filtered by
//! `RUST_LOG`. Only the binary calls it; library code just emits events.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: `Actor started` / `Shutdown` per resource kind (`info`)
//! - **Proxy Calls**: one span per method with the id or name involved (`debug`)
//! - **Session Operations**: Created / Updated / Deleted (`info`), lookups (`debug`)
//! - **Failures**: not-found, duplicates and HTTP errors (`warn`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and writes only
//! RUST_LOG=info keystore list secrets
//!
//! # Every request, including create payloads
//! RUST_LOG=debug keystore demo
//!
//! # Only the session layer
//! RUST_LOG=resource_framework=debug keystore find containers tls
//! ```
//!
//! Every event carries a `resource` field (`container`, `order`, `secret`), so the module
//! path is left out of the output.
//!
//! ```text
//! INFO Actor started resource="secret"
//! DEBUG get_secret: Sending request id=1b6c…
//! WARN Not found resource="secret" id=1b6c…
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
