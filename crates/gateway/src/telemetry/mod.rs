//! Structured logging for the gateway.
//!
//! # Logging invariants
//!
//! - **No plaintext, envelope strings, or key material** in any log field.
//!   Log lengths and error kinds instead.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: one flattened JSON object per event on stdout.
///
/// # Errors
///
/// Returns an error if the level directive does not parse or a global
/// subscriber is already installed.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), log_level)?;

    let json = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .try_init()
        .context("failed to initialise tracing subscriber")
}

/// `RUST_LOG` wins when it is set and non-empty; otherwise `log_level` is used.
fn log_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter> {
    let directives = match rust_log.map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => log_level,
    };
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter `{directives}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_used_without_rust_log() {
        let filter = log_filter(None, "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn rust_log_takes_precedence() {
        let filter = log_filter(Some("gateway=trace"), "info").unwrap();
        assert_eq!(filter.to_string(), "gateway=trace");
    }

    #[test]
    fn blank_rust_log_falls_back_to_level() {
        let filter = log_filter(Some("  "), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_level_is_an_error() {
        assert!(log_filter(None, "gateway=notalevel").is_err());
    }
}
