//! Interaction Configuration
//!
//! Tunables for the announcer, focus handling and the session timeout
//! warning. Every section falls back to its defaults, so a config file only
//! needs the keys it changes.

use std::path::Path;

use serde::Deserialize;

use crate::A11yError;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    pub announcer: AnnouncerConfig,
    pub focus: FocusConfig,
    pub session: SessionConfig,
}

/// Live-region announcements
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    /// How long a message stays in its live region
    pub dwell_ms: u64,
    /// Upper bound of undelivered messages
    pub max_pending: usize,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3_000,
            max_pending: 100,
        }
    }
}

/// Focus scopes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Move initial focus on the next animation frame instead of immediately
    pub defer_initial_focus: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self { defer_initial_focus: true }
    }
}

/// Session timeout warning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Countdown shown when the warning opens
    pub warning_secs: u32,
    /// Remaining time after the user extends the session
    pub extend_secs: u32,
    /// Ticks only announce on multiples of this
    pub announce_every_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            warning_secs: 30,
            extend_secs: 120,
            announce_every_secs: 10,
        }
    }
}

impl A11yConfig {
    /// Parse and validate TOML
    pub fn from_toml_str(content: &str) -> Result<Self, A11yError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, A11yError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded interaction config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), A11yError> {
        if self.announcer.dwell_ms == 0 {
            return Err(invalid("announcer.dwell_ms", "must be greater than zero"));
        }
        if self.announcer.max_pending == 0 {
            return Err(invalid("announcer.max_pending", "must be greater than zero"));
        }
        if self.session.warning_secs == 0 {
            return Err(invalid("session.warning_secs", "must be greater than zero"));
        }
        if self.session.extend_secs == 0 {
            return Err(invalid("session.extend_secs", "must be greater than zero"));
        }
        if self.session.announce_every_secs == 0 {
            return Err(invalid("session.announce_every_secs", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> A11yError {
    A11yError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = A11yConfig::default();
        assert_eq!(config.announcer.dwell_ms, 3_000);
        assert!(config.focus.defer_initial_focus);
        assert_eq!(config.session.warning_secs, 30);
        assert_eq!(config.session.extend_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = A11yConfig::from_toml_str(
            r#"
            [session]
            extend_secs = 300

            [focus]
            defer_initial_focus = false
            "#,
        )
        .unwrap();
        assert_eq!(config.session.extend_secs, 300);
        assert_eq!(config.session.warning_secs, 30);
        assert!(!config.focus.defer_initial_focus);
        assert_eq!(config.announcer, AnnouncerConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = A11yConfig::from_toml_str("[announcer]\ndwell_ms = 0").unwrap_err();
        assert!(matches!(err, A11yError::InvalidConfig { ref field, .. } if field == "announcer.dwell_ms"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = A11yConfig::from_toml_str("[session\nwarning_secs = ").unwrap_err();
        assert!(matches!(err, A11yError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = A11yConfig::load(Path::new("/nonexistent/bankui.toml")).unwrap_err();
        assert!(matches!(err, A11yError::Io(_)));
    }
}
