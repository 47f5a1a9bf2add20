//! Configuration errors
//!
//! The simulation itself never fails: out-of-range grid access is clamped,
//! firing at the bullet cap is dropped and pacing overruns are only counted.
//! Building a game from a bad configuration is the one fallible path.

use std::fmt;

/// Errors raised while loading or validating a [`crate::GameConfig`]
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    Io(std::io::Error),
    /// Config file is not valid JSON for `GameConfig`
    Parse(serde_json::Error),
    /// Config parsed but describes an impossible game
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config I/O error: {}", err),
            ConfigError::Parse(err) => write!(f, "config parse error: {}", err),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
