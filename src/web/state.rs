use crate::config::WebConfig;
use crate::secrets::{create_secret_store, SharedSecretStore, TokenGenerator};

/// Shared state for the secret endpoints.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedSecretStore,
    pub tokens: TokenGenerator,
    /// Honour `X-Forwarded-Proto` when building URLs
    pub trust_forwarded_proto: bool,
    /// Host used in URLs when the request names none
    pub fallback_host: String,
}

impl AppState {
    pub fn new(store: SharedSecretStore, web: &WebConfig) -> Self {
        Self {
            store,
            tokens: TokenGenerator::new(),
            trust_forwarded_proto: web.trust_forwarded_proto,
            fallback_host: web.bind_addr(),
        }
    }

    /// State with a fresh, empty store.
    pub fn with_new_store(web: &WebConfig) -> Self {
        Self::new(create_secret_store(), web)
    }
}
