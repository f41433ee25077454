//! Resolves the provider API key for a single request.
use secrecy::{ExposeSecret, SecretString};

use crate::config::ProviderConfig;

/// Where the provider API key comes from.
///
/// `Env` is read on every `resolve` call so a rotated key is picked up
/// without restarting the service.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    Pinned(SecretString),
    Env(String),
}

impl ApiKeySource {
    pub fn from_config(config: &ProviderConfig) -> Self {
        match &config.api_key {
            Some(key) => ApiKeySource::Pinned(key.clone()),
            None => ApiKeySource::Env(config.api_key_env.clone()),
        }
    }

    /// Returns `None` when the key is absent or blank.
    pub fn resolve(&self) -> Option<SecretString> {
        let key = match self {
            ApiKeySource::Pinned(key) => key.clone(),
            ApiKeySource::Env(var) => SecretString::from(std::env::var(var).ok()?),
        };

        let exists = !key.expose_secret().trim().is_empty();
        tracing::debug!(api_key_exists = exists, "resolved provider api key");

        exists.then_some(key)
    }
}
