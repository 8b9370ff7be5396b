//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use tictactoe::SessionConfig;

/// Default upper bound on concurrently running sessions
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Maximum number of concurrently running sessions
    pub max_sessions: usize,
    /// Template for every spawned session
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `max_sessions_override` - Optional session limit override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        max_sessions_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            max_sessions_override,
        )
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        bind_override: Option<SocketAddr>,
        max_sessions_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_var(&lookup, "SERVER_BIND")?.unwrap_or_else(default_bind),
        };

        let max_sessions = match max_sessions_override {
            Some(max_sessions) => max_sessions,
            None => parse_var(&lookup, "MAX_SESSIONS")?.unwrap_or(DEFAULT_MAX_SESSIONS),
        };

        let defaults = SessionConfig::default();
        let session = SessionConfig {
            name: lookup("SESSION_NAME").unwrap_or(defaults.name),
            inbox_capacity: parse_var(&lookup, "SESSION_INBOX_CAPACITY")?
                .unwrap_or(defaults.inbox_capacity),
            event_buffer: parse_var(&lookup, "SESSION_EVENT_BUFFER")?
                .unwrap_or(defaults.event_buffer),
        };

        Ok(ServerConfig {
            bind,
            max_sessions,
            session,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_SESSIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.session
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "SESSION_*".to_string(),
                reason,
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Bind address when neither `--bind` nor `SERVER_BIND` is given
fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6969))
}

/// Parse a variable if it is set. Unlike a silent fallback, a value that is
/// present but malformed is an error.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("{value:?}: {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), None, None)
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:6969".parse().unwrap());
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.session, SessionConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_values() {
        let config = load(&[
            ("SERVER_BIND", "0.0.0.0:7000"),
            ("MAX_SESSIONS", "3"),
            ("SESSION_EVENT_BUFFER", "8"),
        ])
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:7000".parse().unwrap());
        assert_eq!(config.max_sessions, 3);
        assert_eq!(config.session.event_buffer, 8);
    }

    #[test]
    fn test_overrides_win() {
        let vars: HashMap<&str, &str> = [("MAX_SESSIONS", "3")].into_iter().collect();
        let config = ServerConfig::from_lookup(
            |key| vars.get(key).map(|v| v.to_string()),
            Some("127.0.0.1:9000".parse().unwrap()),
            Some(10),
        )
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.max_sessions, 10);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let err = load(&[("MAX_SESSIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("MAX_SESSIONS"));
    }

    #[test]
    fn test_validation() {
        let config = load(&[("MAX_SESSIONS", "0")]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = load(&[("SESSION_INBOX_CAPACITY", "0")]).unwrap();
        assert!(config.validate().is_err());
    }
}
