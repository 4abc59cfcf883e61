use crate::config::{KeystoreConfig, ENDPOINT_VAR};
use crate::error::KeystoreError;
use crate::model::{Container, Order, Secret};
use crate::proxy::Proxy;
use resource_framework::http::{HttpBackend, HttpSession};
use resource_framework::memory::MemoryBackend;
use resource_framework::{Backend, ResourceActor, SessionError};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime that owns the three resource actors behind a [`Proxy`].
///
/// `KeystoreSystem` is responsible for:
/// - **Backend Selection**: in-memory emulation or the remote key manager
/// - **Lifecycle Management**: spawning one actor per resource kind and stopping them
///
/// # Example
///
/// ```ignore
/// let system = KeystoreSystem::from_config(&KeystoreConfig::from_env())?;
///
/// let secret = system.proxy.create_secret(SecretCreate::named("db-password")).await?;
/// let found = system.proxy.find_secret("db-password").await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct KeystoreSystem {
    /// Entry point for all key manager calls
    pub proxy: Proxy,

    /// Task handles for the running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl KeystoreSystem {
    /// Starts the system against in-process storage.
    pub fn in_memory(buffer_size: usize) -> Self {
        info!("Starting keystore with in-memory backend");
        Self::start(
            buffer_size,
            MemoryBackend::default(),
            MemoryBackend::default(),
            MemoryBackend::default(),
        )
    }

    /// Starts the system against the key manager at `config.endpoint`.
    ///
    /// The three kinds share one HTTP connection pool and the same credentials.
    pub fn connect(config: &KeystoreConfig) -> Result<Self, KeystoreError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| KeystoreError::Config(format!("{ENDPOINT_VAR} is not set")))?;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(KeystoreError::Config(format!(
                "{ENDPOINT_VAR} must be an http(s) URL, got '{endpoint}'"
            )));
        }

        let mut session = HttpSession::new(endpoint, config.timeout())?;
        if let Some(token) = &config.token {
            session = session.with_token(token.clone());
        }
        if let Some(project_id) = &config.project_id {
            session = session.with_project_id(project_id.clone());
        }

        info!(endpoint = session.endpoint(), "Starting keystore with HTTP backend");
        Ok(Self::start(
            config.channel_buffer,
            HttpBackend::new(session.clone()),
            HttpBackend::new(session.clone()),
            HttpBackend::new(session),
        ))
    }

    /// Remote when an endpoint is configured, in-memory otherwise.
    pub fn from_config(config: &KeystoreConfig) -> Result<Self, KeystoreError> {
        if config.is_remote() {
            Self::connect(config)
        } else {
            Ok(Self::in_memory(config.channel_buffer))
        }
    }

    fn start<C, O, S>(buffer_size: usize, containers: C, orders: O, secrets: S) -> Self
    where
        C: Backend<Container>,
        O: Backend<Order>,
        S: Backend<Secret>,
    {
        let (container_actor, container_client) = ResourceActor::new(buffer_size, containers);
        let (order_actor, order_client) = ResourceActor::new(buffer_size, orders);
        let (secret_actor, secret_client) = ResourceActor::new(buffer_size, secrets);

        let handles = vec![
            tokio::spawn(container_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(secret_actor.run()),
        ];

        Self {
            proxy: Proxy::new(container_client, order_client, secret_client),
            handles,
        }
    }

    /// Gracefully shuts down the actors.
    ///
    /// Dropping the proxy closes the channels and each actor exits its loop once its queue
    /// is drained. Clones of the proxy handed out earlier keep their actor alive, so drop
    /// them first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(KeystoreError::Communication)` if an actor task panicked
    pub async fn shutdown(self) -> Result<(), KeystoreError> {
        info!("Shutting down keystore...");
        drop(self.proxy);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(KeystoreError::Communication(SessionError::BackendDropped));
            }
        }

        info!("Keystore shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_starts_and_stops() {
        let system = KeystoreSystem::in_memory(4);
        assert!(system.proxy.secrets().await.unwrap().is_empty());
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_from_config_without_endpoint_is_in_memory() {
        let system = KeystoreSystem::from_config(&KeystoreConfig::default()).unwrap();
        assert!(system.proxy.containers().await.unwrap().is_empty());
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_endpoint() {
        let config = KeystoreConfig {
            endpoint: Some("kms:9311".into()),
            ..Default::default()
        };
        let result = KeystoreSystem::connect(&config);
        assert!(matches!(result, Err(KeystoreError::Config(_))));

        let result = KeystoreSystem::connect(&KeystoreConfig::default());
        assert!(matches!(result, Err(KeystoreError::Config(_))));
    }
}
