//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments
//! 2. Environment variables (handled by clap in the binary)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! Steps 1 and 2 arrive here as [`Overrides`]; this module owns steps 3 and 4.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "exo.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Cannot change while running; restart to pick up edits.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// HTTP listener host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP listener port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Flat directory holding the source images
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Writable directory for the selection log and its archives
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the current selection log inside `output_dir`
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Session behaviour (optional)
    #[serde(default)]
    pub session: SessionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Session configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Seed the seen-pair set from the current selection log at startup
    #[serde(default)]
    pub resume_from_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            images_dir: default_images_dir(),
            output_dir: default_output_dir(),
            log_file: default_log_file(),
            logging: LoggingConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_file() -> String {
    "selections.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub images_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub resume_from_log: bool,
}

impl TomlConfig {
    /// Parse a config file, failing if it is missing or malformed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with graceful degradation
    ///
    /// An explicit path must exist. Without one, the platform config
    /// directory and then the working directory are searched; if neither
    /// holds a file, compiled defaults are used. Returns the file that was
    /// read, if any, so the caller can log it once tracing is up.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let source = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => locate_config_file(),
        };

        match source {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Apply command-line/environment values on top of the file values
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(dir) = overrides.images_dir {
            self.images_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if overrides.resume_from_log {
            self.session.resume_from_log = true;
        }
        self.validate()?;
        Ok(self)
    }

    /// `host:port` string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.log_file.is_empty()
            || self.log_file.contains('/')
            || self.log_file.contains('\\')
            || self.log_file == "."
            || self.log_file == ".."
        {
            return Err(Error::Config(format!(
                "log_file must be a plain file name, got '{}'",
                self.log_file
            )));
        }
        Ok(())
    }
}

/// Find the first existing config file in the search order
pub fn locate_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("exo").join(CONFIG_FILE_NAME));
    let local_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);

    user_config
        .into_iter()
        .chain(std::iter::once(local_config))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.log_file, "selections.csv");
        assert_eq!(config.logging.level, "info");
        assert!(!config.session.resume_from_log);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("port = 9000\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.images_dir, PathBuf::from("images"));
    }

    #[test]
    fn test_overrides_take_priority() {
        let config = TomlConfig::default()
            .apply(Overrides {
                host: Some("0.0.0.0".to_string()),
                port: Some(5000),
                images_dir: Some(PathBuf::from("/data/tiffs")),
                output_dir: None,
                resume_from_log: true,
            })
            .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.images_dir, PathBuf::from("/data/tiffs"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.session.resume_from_log);
    }

    #[test]
    fn test_log_file_with_separator_rejected() {
        let config = TomlConfig {
            log_file: "../selections.csv".to_string(),
            ..TomlConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
