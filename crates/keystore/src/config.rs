//! # Keystore Configuration
//!
//! Connection settings loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OS_KEY_MANAGER_ENDPOINT` | unset: use the in-memory backend |
//! | `OS_AUTH_TOKEN` | unset |
//! | `OS_PROJECT_ID` | unset |
//! | `KEYSTORE_TIMEOUT_SECS` | 30 |
//! | `KEYSTORE_CHANNEL_BUFFER` | 32 |
//!
//! Numeric settings are at least 1; a zero timeout would fail every request.

use resource_framework::http::DEFAULT_TIMEOUT;
use std::time::Duration;

pub const ENDPOINT_VAR: &str = "OS_KEY_MANAGER_ENDPOINT";
pub const TOKEN_VAR: &str = "OS_AUTH_TOKEN";
pub const PROJECT_ID_VAR: &str = "OS_PROJECT_ID";
pub const TIMEOUT_VAR: &str = "KEYSTORE_TIMEOUT_SECS";
pub const CHANNEL_BUFFER_VAR: &str = "KEYSTORE_CHANNEL_BUFFER";

pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();
pub const DEFAULT_CHANNEL_BUFFER: usize = 32;

/// Key manager connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreConfig {
    /// Base URL of the key manager API, e.g. `http://kms:9311/v1`.
    /// `None` selects the in-memory backend.
    pub endpoint: Option<String>,
    /// Pre-issued token sent as `X-Auth-Token`.
    pub token: Option<String>,
    /// Sent as `X-Project-Id`.
    pub project_id: Option<String>,
    pub timeout_secs: u64,
    /// Capacity of each resource actor's request queue.
    pub channel_buffer: usize,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            project_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
        }
    }
}

impl KeystoreConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            endpoint: non_empty(ENDPOINT_VAR),
            token: non_empty(TOKEN_VAR),
            project_id: non_empty(PROJECT_ID_VAR),
            timeout_secs: var_or_default(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS).max(1),
            channel_buffer: var_or_default(&lookup, CHANNEL_BUFFER_VAR, DEFAULT_CHANNEL_BUFFER)
                .max(1),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when requests go to a remote key manager.
    pub fn is_remote(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Read a variable or return the default when it is missing or unparsable
fn var_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> KeystoreConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KeystoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_memory_backend() {
        let config = config(&[]);
        assert_eq!(config, KeystoreConfig::default());
        assert!(!config.is_remote());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_reads_remote_settings() {
        let config = config(&[
            (ENDPOINT_VAR, "http://kms:9311/v1"),
            (TOKEN_VAR, "tok"),
            (PROJECT_ID_VAR, "proj"),
            (TIMEOUT_VAR, "5"),
            (CHANNEL_BUFFER_VAR, "8"),
        ]);
        assert_eq!(config.endpoint.as_deref(), Some("http://kms:9311/v1"));
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.project_id.as_deref(), Some("proj"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.channel_buffer, 8);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config(&[
            (ENDPOINT_VAR, "  "),
            (TIMEOUT_VAR, "soon"),
            (CHANNEL_BUFFER_VAR, "0"),
        ]);
        assert!(config.endpoint.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.channel_buffer, 1);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = config(&[(TIMEOUT_VAR, "0")]);
        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
