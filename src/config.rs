//! Process configuration.
//!
//! Everything the server needs from its environment is collected into an
//! explicit [`Settings`] value at startup and passed down; the pipeline
//! itself takes all parameters as plain arguments and reads no ambient
//! state.

use serde::Deserialize;

/// Server settings, loaded from `QRBRAND_*` environment variables with
/// sensible defaults for local runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory where uploaded logo files are persisted.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> String {
    "static/uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Settings {
    /// Reads settings from the environment, e.g. `QRBRAND_PORT=9000`.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("QRBRAND")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.upload_dir, "static/uploads");
        assert_eq!(settings.max_upload_bytes, 16 * 1024 * 1024);
    }
}
