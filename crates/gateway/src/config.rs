//! Configuration loading and validation for the gateway.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use envelope::SharedSecret;
use serde::Deserialize;

/// Validated gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Shared secret used to derive the envelope key. **Required.**
    /// Must match the value compiled into the apps.
    pub encryption_key: SharedSecret,

    /// Port the HTTP server listens on. TLS terminates upstream.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Comma-separated path prefixes whose request bodies may arrive sealed.
    #[serde(default = "default_encrypted_path_prefixes")]
    pub encrypted_path_prefixes: String,

    /// Largest request body the decrypt middleware will buffer.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Per-request timeout applied to all routes.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_encrypted_path_prefixes() -> String {
    "/api/auth/register,/api/auth/login".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parsed list of path prefixes routed through the decrypt middleware.
    pub fn path_prefixes(&self) -> Vec<String> {
        self.encrypted_path_prefixes
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.is_blank() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if let Some(bad) = self.path_prefixes().iter().find(|p| !p.starts_with('/')) {
            anyhow::bail!("ENCRYPTED_PATH_PREFIXES entry {bad:?} must start with '/'");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            encryption_key: SharedSecret::from("test-encryption-key-32-characters-long"),
            listen_port: default_listen_port(),
            encrypted_path_prefixes: default_encrypted_path_prefixes(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_max_body_bytes(), 1_048_576);
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn default_prefixes_cover_auth_routes() {
        assert_eq!(
            valid().path_prefixes(),
            vec!["/api/auth/register".to_owned(), "/api/auth/login".to_owned()]
        );
    }

    #[test]
    fn prefixes_are_trimmed_and_empty_entries_dropped() {
        let cfg = Config {
            encrypted_path_prefixes: " /a , ,/b,".into(),
            ..valid()
        };
        assert_eq!(cfg.path_prefixes(), vec!["/a".to_owned(), "/b".to_owned()]);
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_accepts_short_key() {
        let cfg = Config {
            encryption_key: SharedSecret::from("short"),
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_key() {
        let cfg = Config {
            encryption_key: SharedSecret::from("   "),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            request_timeout_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_body_limit() {
        let cfg = Config {
            max_body_bytes: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_prefix() {
        let cfg = Config {
            encrypted_path_prefixes: "/api/auth/login,api/other".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_key() {
        let out = format!("{:?}", valid());
        assert!(!out.contains("test-encryption-key"));
    }
}
