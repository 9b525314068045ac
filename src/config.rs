//! Server configuration from environment variables.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// HOST, PORT, DATA_DIR and TOURNAMENT_PASSPHRASE.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory for JSON tournament files; in-memory storage when unset.
    pub data_dir: Option<PathBuf>,
    /// When set, write endpoints require this passphrase.
    pub passphrase: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: None,
            passphrase: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset. An unparsable PORT falls back
    /// to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let port = match get("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{}', using {}", p, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };
        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            data_dir: get("DATA_DIR").map(PathBuf::from),
            passphrase: get("TOURNAMENT_PASSPHRASE"),
        }
    }

    /// True when no passphrase is configured or `provided` matches it.
    pub fn passphrase_matches(&self, provided: Option<&str>) -> bool {
        match &self.passphrase {
            None => true,
            Some(expected) => provided == Some(expected.as_str()),
        }
    }
}
