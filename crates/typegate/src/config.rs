//! Engine configuration
//!
//! Loaded in layers, each returning a new value:
//! 1. Built-in defaults (everything checked, failures logged at debug)
//! 2. An optional TOML file
//! 3. Environment variables: `TYPEGATE_*`
//!
//! Then validated. Only the call guard ([`Signatures::call`]) consults the
//! toggles; direct checks always run.
//!
//! [`Signatures::call`]: crate::registry::Signatures::call

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const ENV_ENABLED: &str = "TYPEGATE_ENABLED";
pub const ENV_CHECK_ARGUMENTS: &str = "TYPEGATE_CHECK_ARGUMENTS";
pub const ENV_CHECK_RETURN: &str = "TYPEGATE_CHECK_RETURN";
pub const ENV_FAILURE_LOG: &str = "TYPEGATE_FAILURE_LOG";

// ═══════════════════════════════════════════════════════════════════════════
// FAILURE LOGGING
// ═══════════════════════════════════════════════════════════════════════════

/// How rejected calls are reported through `tracing` before the error is
/// returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureLog {
    Off,
    #[default]
    Debug,
    Warn,
}

impl<'de> Deserialize<'de> for FailureLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for FailureLog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "debug" => Ok(Self::Debug),
            "warn" | "warning" => Ok(Self::Warn),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid failure log level: {s}. Must be one of: off, debug, warn"
            ))),
        }
    }
}

impl fmt::Display for FailureLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Debug => write!(f, "debug"),
            Self::Warn => write!(f, "warn"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Master switch for the call guard
    pub enabled: bool,
    pub check_arguments: bool,
    pub check_return: bool,
    pub failure_log: FailureLog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            check_arguments: true,
            check_return: true,
            failure_log: FailureLog::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for malformed TOML or unknown enum values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Whether the call guard validates arguments.
    pub const fn guards_arguments(&self) -> bool {
        self.enabled && self.check_arguments
    }

    /// Whether the call guard validates results.
    pub const fn guards_return(&self) -> bool {
        self.enabled && self.check_return
    }

    /// Apply `TYPEGATE_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a variable holds an unparseable value.
    pub fn apply_env_vars(mut self) -> Result<Self> {
        if let Some(value) = env_bool(ENV_ENABLED)? {
            self.enabled = value;
        }
        if let Some(value) = env_bool(ENV_CHECK_ARGUMENTS)? {
            self.check_arguments = value;
        }
        if let Some(value) = env_bool(ENV_CHECK_RETURN)? {
            self.check_return = value;
        }
        if let Ok(value) = std::env::var(ENV_FAILURE_LOG) {
            self.failure_log = value.parse()?;
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` when the guard is enabled but checks nothing.
    pub fn validate(&self) -> Result<()> {
        if self.enabled && !self.check_arguments && !self.check_return {
            return Err(Error::InvalidConfig(
                "enabled with both check_arguments and check_return off; set enabled = false instead"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    std::env::var(name).ok().map_or(Ok(None), |value| {
        value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("Invalid {name} value: {e}")))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration: defaults, then `path` if it exists, then environment.
///
/// # Errors
///
/// Returns error if:
/// - The file cannot be read or is malformed TOML
/// - An environment override is invalid
/// - The merged values fail validation
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) if path.exists() => load_toml_file(path)?,
        _ => Config::default(),
    };
    let config = config.apply_env_vars()?;
    config.validate()?;
    Ok(config)
}

/// Load a TOML file into a [`Config`].
///
/// # Errors
///
/// Returns `IoError` if the path is a directory or unreadable, `ParseError`
/// for malformed TOML.
pub fn load_toml_file(path: &Path) -> Result<Config> {
    if path.is_dir() {
        return Err(Error::IoError(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    Config::from_toml_str(&content).map_err(|e| match e {
        Error::ParseError(message) => {
            Error::ParseError(format!("{message} (in {})", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for name in [ENV_ENABLED, ENV_CHECK_ARGUMENTS, ENV_CHECK_RETURN, ENV_FAILURE_LOG] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_defaults_check_everything() {
        let config = Config::default();
        assert!(config.guards_arguments());
        assert!(config.guards_return());
        assert_eq!(config.failure_log, FailureLog::Debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_failure_log_parsing() -> Result<()> {
        assert_eq!("WARN".parse::<FailureLog>()?, FailureLog::Warn);
        assert_eq!("none".parse::<FailureLog>()?, FailureLog::Off);
        assert_eq!(FailureLog::Warn.to_string(), "warn");

        let err = "loud".parse::<FailureLog>().err();
        assert!(matches!(err, Some(Error::InvalidConfig(ref msg)) if msg.contains("loud")));
        Ok(())
    }

    #[test]
    fn test_partial_toml_keeps_defaults() -> Result<()> {
        let config = Config::from_toml_str("check_return = false\nfailure_log = \"warn\"\n")?;
        assert!(config.enabled);
        assert!(config.check_arguments);
        assert!(!config.check_return);
        assert!(!config.guards_return());
        assert_eq!(config.failure_log, FailureLog::Warn);
        Ok(())
    }

    #[test]
    fn test_unknown_failure_log_in_toml_is_parse_error() {
        let result = Config::from_toml_str("failure_log = \"loud\"");
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_disabled_guard_checks_nothing() {
        let config = Config {
            enabled: false,
            ..Config::default()
        };
        assert!(!config.guards_arguments());
        assert!(!config.guards_return());
    }

    #[test]
    fn test_validate_rejects_enabled_without_checks() {
        let config = Config {
            check_arguments: false,
            check_return: false,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let off = Config { enabled: false, ..config };
        assert!(off.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("typegate.toml");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(b"check_arguments = false\n")?;

        let config = load_config(Some(&path))?;
        assert!(!config.check_arguments);
        assert!(config.check_return);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_uses_defaults() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let config = load_config(Some(&dir.path().join("absent.toml")))?;
        assert_eq!(config, Config::default());
        assert_eq!(load_config(None)?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_toml_file_rejects_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let result = load_toml_file(dir.path());
        assert!(matches!(result, Err(Error::IoError(ref msg)) if msg.contains("directory")));
        Ok(())
    }

    #[test]
    fn test_malformed_toml_names_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "enabled = \n [[[")?;
        let result = load_toml_file(&path);
        assert!(matches!(result, Err(Error::ParseError(ref msg)) if msg.contains("bad.toml")));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_overrides() -> Result<()> {
        clear_env();
        std::env::set_var(ENV_CHECK_RETURN, "false");
        std::env::set_var(ENV_FAILURE_LOG, "warn");
        let config = load_config(None);
        clear_env();

        let config = config?;
        assert!(!config.check_return);
        assert_eq!(config.failure_log, FailureLog::Warn);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_env_bool() {
        clear_env();
        std::env::set_var(ENV_ENABLED, "maybe");
        let result = Config::default().apply_env_vars();
        clear_env();
        assert!(matches!(result, Err(Error::InvalidConfig(ref msg)) if msg.contains(ENV_ENABLED)));
    }
}
