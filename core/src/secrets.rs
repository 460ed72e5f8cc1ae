//! Credential storage contract
//!
//! Adapters consume secrets through this trait and never cache the values;
//! a credential edit takes effect on the next call. The gateway ships two
//! implementations and callers may bring their own (OS keychain, vault).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Opaque key/value secret storage
///
/// Keys are provider-scoped constants (API keys, base-URL overrides, signing
/// key pairs). `save` and `delete` report success; read-only stores return
/// `false`.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret, `None` when absent
    fn load(&self, key: &str) -> Option<String>;

    /// Store a secret, returning whether the write took effect
    fn save(&self, key: &str, value: &str) -> bool;

    /// Remove a secret, returning whether anything was removed
    fn delete(&self, key: &str) -> bool;
}

/// In-memory secret store
///
/// Suitable for tests and short-lived processes; contents vanish with the
/// process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    secrets: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with entries
    pub fn with_secrets<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            secrets: Arc::new(RwLock::new(map)),
        }
    }
}

impl SecretStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.secrets
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> bool {
        match self.secrets.write() {
            Ok(mut map) => {
                map.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn delete(&self, key: &str) -> bool {
        self.secrets
            .write()
            .map(|mut map| map.remove(key).is_some())
            .unwrap_or(false)
    }
}

/// Environment-backed secret store
///
/// Reads process environment variables by key; writes are rejected. Empty
/// values count as absent so a blank `FOO_API_KEY=` in a shell profile does
/// not look like a configured credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvStore;

impl EnvStore {
    /// Create the environment-backed store
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for EnvStore {
    fn load(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }

    fn save(&self, _key: &str, _value: &str) -> bool {
        false
    }

    fn delete(&self, _key: &str) -> bool {
        false
    }
}
