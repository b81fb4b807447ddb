//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use envelope::Sealer;

use crate::config::Config;

/// Application state shared across all request handlers and middleware.
///
/// Cloned per request, so every field is cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Seals and opens envelopes under the configured shared secret.
    pub sealer: Sealer,
    /// Request path prefixes whose bodies may be sealed.
    pub encrypted_path_prefixes: Arc<Vec<String>>,
    /// Upper bound on bodies buffered by the decrypt middleware.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(sealer: Sealer, encrypted_path_prefixes: Vec<String>, max_body_bytes: usize) -> Self {
        Self {
            sealer,
            encrypted_path_prefixes: Arc::new(encrypted_path_prefixes),
            max_body_bytes,
        }
    }

    /// Build state from validated configuration.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Sealer::new(&cfg.encryption_key),
            cfg.path_prefixes(),
            cfg.max_body_bytes,
        )
    }

    /// `true` if requests to `path` go through the decrypt middleware.
    pub fn is_encrypted_path(&self, path: &str) -> bool {
        self.encrypted_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
pub(crate) const TEST_SECRET: &str = "test-encryption-key-32-characters-long";

#[cfg(test)]
impl Default for AppState {
    /// State keyed with [`TEST_SECRET`] and the default auth prefixes.
    fn default() -> Self {
        Self::new(
            Sealer::new(&envelope::SharedSecret::from(TEST_SECRET)),
            vec!["/api/auth/register".into(), "/api/auth/login".into()],
            64 * 1024,
        )
    }
}
