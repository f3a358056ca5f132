//! Server configuration, loaded from environment variables.
//!
//! All variables are optional; defaults match the values the relay has
//! always shipped with (bind `127.0.0.1:8000`, one allowed Vite dev
//! origin).
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PARLEY_HOST` | Bind address (default `127.0.0.1`) |
//! | `PARLEY_PORT` | TCP port (default `8000`) |
//! | `PARLEY_ALLOWED_ORIGINS` | Comma-separated CORS origins, or `*` |
//! | `PARLEY_STATIC_DIR` | Path to the prebuilt frontend bundle |

use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `PARLEY_PORT` was set but is not a valid TCP port number.
    #[error("invalid PARLEY_PORT value {value:?}: {source}")]
    InvalidPort {
        /// The raw value found in the environment.
        value: String,
        /// The underlying parse error.
        source: std::num::ParseIntError,
    },
}

/// Configuration for the relay server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to.
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// CORS origin allow-list. A single `*` entry selects wildcard
    /// mode (any origin, no credentials).
    pub allowed_origins: Vec<String>,
    /// Directory holding the prebuilt frontend bundle, if any. When
    /// unset, no static mount is installed.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8000,
            allowed_origins: vec![String::from("http://localhost:5173")],
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PARLEY_PORT` is set but
    /// does not parse as a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("PARLEY_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PARLEY_PORT") {
            config.port = port
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value: port.clone(), source })?;
        }
        if let Ok(origins) = std::env::var("PARLEY_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }
        if let Ok(dir) = std::env::var("PARLEY_STATIC_DIR") {
            config.static_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Whether the origin allow-list is the wildcard.
    pub fn wildcard_origins(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}
