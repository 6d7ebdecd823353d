//! Runtime configuration and shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::session::SessionRegistry;
use crate::store::EntryStore;

/// Configuration sourced from the environment, with CLI flag overrides
/// applied by `main` before validation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// The single admin secret; required, no default.
    pub admin_password: String,
    /// Directory holding the entry records.
    pub content_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `ADMIN_PASSWORD` (required; checked by [`Config::validate`])
    /// - `CONTENT_DIR` (default `content`)
    pub fn from_env() -> Self {
        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:8080");
        let content_dir = PathBuf::from(env_or("CONTENT_DIR", "content"));
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_default();

        Self {
            bind_addr,
            admin_password,
            content_dir,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.admin_password.is_empty(),
            "ADMIN_PASSWORD is required"
        );
        Ok(())
    }
}

/// Environment lookup where an unset or empty variable falls back to
/// the default.
fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// State shared across all handlers, injected at router construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<EntryStore>,
    pub sessions: Arc<SessionRegistry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch process environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &["BIND_ADDR", "ADMIN_PASSWORD", "CONTENT_DIR"];

    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
        f();
        for (k, v) in &saved {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        with_env_vars(&[], || {
            let config = Config::from_env();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.content_dir, PathBuf::from("content"));
            assert!(config.validate().is_err());
        });
    }

    #[test]
    fn env_values_win_over_defaults() {
        with_env_vars(
            &[
                ("BIND_ADDR", "127.0.0.1:9090"),
                ("ADMIN_PASSWORD", "hunter2"),
                ("CONTENT_DIR", "/tmp/entries"),
            ],
            || {
                let config = Config::from_env();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.content_dir, PathBuf::from("/tmp/entries"));
                assert!(config.validate().is_ok());
            },
        );
    }

    #[test]
    fn empty_env_values_fall_back_to_defaults() {
        with_env_vars(
            &[("BIND_ADDR", ""), ("CONTENT_DIR", ""), ("ADMIN_PASSWORD", "hunter2")],
            || {
                let config = Config::from_env();
                assert_eq!(config.bind_addr, "0.0.0.0:8080");
                assert_eq!(config.content_dir, PathBuf::from("content"));
            },
        );
    }
}
