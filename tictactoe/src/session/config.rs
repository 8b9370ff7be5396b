//! Session configuration models.

use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session name, used in logs and snapshots
    pub name: String,

    /// Capacity of the actor's command inbox
    pub inbox_capacity: usize,

    /// Per-participant event buffer. A participant that falls this far
    /// behind is detached.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "Session".to_string(),
            inbox_capacity: 64,
            event_buffer: 64,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Session name must not be empty".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be greater than 0".to_string());
        }

        if self.event_buffer == 0 {
            return Err("Event buffer must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Copy of this configuration renamed for a numbered session
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacities_rejected() {
        let config = SessionConfig {
            inbox_capacity: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            event_buffer: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let config = SessionConfig::default().named("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_named_keeps_capacities() {
        let base = SessionConfig {
            event_buffer: 8,
            ..SessionConfig::default()
        };
        let named = base.named("Session 7");
        assert_eq!(named.name, "Session 7");
        assert_eq!(named.event_buffer, 8);
        assert_eq!(named.inbox_capacity, base.inbox_capacity);
    }
}
