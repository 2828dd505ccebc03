//! In-memory one-time secret storage.
//!
//! Secrets live only in RAM, are zeroized on drop, and are handed out at
//! most once. Never persisted to disk.

use crate::secrets::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Client-supplied secret payload, stored verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Pending secrets keyed by token.
///
/// Every operation holds the single map lock for its whole span, so a
/// take-and-delete can never be split by another caller.
pub struct SecretStore {
    secrets: Mutex<HashMap<Token, Secret>>,
}

impl SecretStore {
    /// Create a new empty secret store.
    pub fn new() -> Self {
        Self {
            secrets: Mutex::new(HashMap::new()),
        }
    }

    /// Store a secret under `token`.
    ///
    /// An existing entry under the same token is overwritten. With 256-bit
    /// random tokens this is not expected to happen.
    pub async fn put(&self, token: Token, secret: Secret) {
        let mut guard = self.secrets.lock().await;
        guard.insert(token, secret);
    }

    /// Remove and return the secret for `token`.
    ///
    /// Exactly one caller ever receives a given secret; every other call
    /// for the same token returns `None`.
    pub async fn take_and_delete(&self, token: &Token) -> Option<Secret> {
        let mut guard = self.secrets.lock().await;
        guard.remove(token)
    }

    /// Number of secrets still waiting to be retrieved.
    pub async fn len(&self) -> usize {
        self.secrets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.lock().await.is_empty()
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("secrets", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Shared secret store handle for request handlers.
pub type SharedSecretStore = Arc<SecretStore>;

/// Create a new shared secret store.
pub fn create_secret_store() -> SharedSecretStore {
    Arc::new(SecretStore::new())
}
