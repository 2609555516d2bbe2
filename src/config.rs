//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/wsbar/config.json`, or the path passed with
//! `--config <path>`.
//!
//! # Example
//!
//! ```json
//! {
//!   "shaping": { "cell_width": 8 },
//!   "ipc": {
//!     "socket_path": "/run/user/1000/wsbar.sock",
//!     "read_stdin": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Label measurement settings.
    #[serde(default)]
    pub shaping: ShapingConfig,

    /// Where payloads come from.
    #[serde(default)]
    pub ipc: IpcConfig,
}

/// Label measurement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingConfig {
    /// Width of one character cell of the bar font, in pixels.
    pub cell_width: u32,
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self { cell_width: 7 }
    }
}

/// Payload transport settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Socket to listen on.  `None` means `$XDG_RUNTIME_DIR/wsbar.sock`.
    pub socket_path: Option<PathBuf>,
    /// Also read payloads from standard input.
    pub read_stdin: bool,
}

impl IpcConfig {
    /// The socket path to bind, resolving the default.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| {
            let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(runtime).join("wsbar.sock")
        })
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "shaping": { "cell_width": 9 },
            "ipc": { "socket_path": "/tmp/custom.sock", "read_stdin": true }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.shaping.cell_width, 9);
        assert_eq!(cfg.ipc.socket_path(), PathBuf::from("/tmp/custom.sock"));
        assert!(cfg.ipc.read_stdin);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.shaping.cell_width, ShapingConfig::default().cell_width);
        assert!(cfg.ipc.socket_path.is_none());
        assert!(!cfg.ipc.read_stdin);
    }

    #[test]
    fn deserialize_partial_ipc() {
        let cfg: Config = serde_json::from_str(r#"{ "ipc": { "read_stdin": true } }"#).unwrap();
        assert!(cfg.ipc.read_stdin);
        assert!(cfg.ipc.socket_path.is_none());
        assert!(cfg.ipc.socket_path().ends_with("wsbar.sock"));
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "shaping": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("wsbar-no-such-config.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
