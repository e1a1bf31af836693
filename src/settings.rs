//! # Settings Module
//!
//! ## Purpose
//! Run-time options of the atom economy calculation and of the command line tool, read from a
//! JSON file. A missing file is not an error: every option has a default.
//!
//! ## Configuration File
//! `atom_eco_config.json` in the working directory, or the file named by the
//! `ATOM_ECO_CONFIG` environment variable. All fields are optional:
//! ```json
//! {
//!   "product_policy": "terminal_only",
//!   "intermediate_matching": "identifier",
//!   "invalid_entities": "skip",
//!   "toolkit": "builtin",
//!   "toolkit_diagnostics": false,
//!   "log_level": "warn"
//! }
//! ```
//!
//! ## Usage
//! ```rust
//! use AtomEco::settings::Settings;
//!
//! let settings = Settings::load().unwrap_or_default();
//! println!("{:?}", settings.product_policy);
//! ```

use crate::AtomEconomy::calculator::InvalidEntityPolicy;
use crate::AtomEconomy::multistep::{IntermediateMatching, ProductPolicy};
use crate::Toolkit::molecule::{ToolkitConfig, ToolkitKind};
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "atom_eco_config.json";
pub const CONFIG_ENV_VAR: &str = "ATOM_ECO_CONFIG";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse settings file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level '{0}', expected one of off, error, warn, info, debug, trace")]
    LogLevel(String),
}

/// Options of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub product_policy: ProductPolicy,
    pub intermediate_matching: IntermediateMatching,
    pub invalid_entities: InvalidEntityPolicy,
    pub toolkit: ToolkitKind,
    /// log identifiers the structure toolkit rejects
    pub toolkit_diagnostics: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            product_policy: ProductPolicy::default(),
            intermediate_matching: IntermediateMatching::default(),
            invalid_entities: InvalidEntityPolicy::default(),
            toolkit: ToolkitKind::default(),
            toolkit_diagnostics: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Settings from the file named by `ATOM_ECO_CONFIG`, else from `atom_eco_config.json`
    pub fn load() -> Result<Self, SettingsError> {
        let path = config_path(std::env::var(CONFIG_ENV_VAR).ok());
        Self::with_config_file(&path)
    }

    /// Reads and checks a settings file. Defaults when the file does not exist.
    pub fn with_config_file(config_file: &Path) -> Result<Self, SettingsError> {
        let settings = Self::load_config(config_file)?;
        settings.level_filter()?;
        Ok(settings)
    }

    fn load_config(config_file: &Path) -> Result<Self, SettingsError> {
        let path = config_file.display().to_string();
        if config_file.exists() {
            let content = fs::read_to_string(config_file).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            let settings: Settings = serde_json::from_str(&content)
                .map_err(|source| SettingsError::Json { path: path.clone(), source })?;
            info!("settings loaded from {}", path);
            Ok(settings)
        } else {
            info!("no settings file at {}, using defaults", path);
            Ok(Settings::default())
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| SettingsError::LogLevel(self.log_level.clone()))
    }

    pub fn toolkit_config(&self) -> ToolkitConfig {
        ToolkitConfig {
            diagnostics: self.toolkit_diagnostics,
        }
    }
}

/// Path of the settings file given the value of `ATOM_ECO_CONFIG`
pub fn config_path(env_value: Option<String>) -> PathBuf {
    match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::with_config_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Warn);
        assert_eq!(settings.product_policy, ProductPolicy::TerminalOnly);
        assert_eq!(settings.intermediate_matching, IntermediateMatching::Identifier);
        assert_eq!(settings.invalid_entities, InvalidEntityPolicy::Skip);
        assert_eq!(settings.toolkit, ToolkitKind::Builtin);
    }

    #[test]
    fn test_full_file() {
        let file = settings_file(
            r#"{
                "product_policy": "accumulate_all",
                "intermediate_matching": "canonical",
                "invalid_entities": "abort",
                "toolkit": "rdkit",
                "toolkit_diagnostics": true,
                "log_level": "debug"
            }"#,
        );
        let settings = Settings::with_config_file(file.path()).unwrap();
        assert_eq!(settings.product_policy, ProductPolicy::AccumulateAll);
        assert_eq!(settings.intermediate_matching, IntermediateMatching::Canonical);
        assert_eq!(settings.invalid_entities, InvalidEntityPolicy::Abort);
        assert_eq!(settings.toolkit, ToolkitKind::Rdkit);
        assert!(settings.toolkit_config().diagnostics);
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = settings_file(r#"{ "invalid_entities": "abort" }"#);
        let settings = Settings::with_config_file(file.path()).unwrap();
        assert_eq!(settings.invalid_entities, InvalidEntityPolicy::Abort);
        assert_eq!(settings.product_policy, ProductPolicy::TerminalOnly);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_bad_files_are_errors() {
        let file = settings_file("{ not json");
        assert!(matches!(
            Settings::with_config_file(file.path()),
            Err(SettingsError::Json { .. })
        ));
        let file = settings_file(r#"{ "product_policy": "everything" }"#);
        assert!(matches!(
            Settings::with_config_file(file.path()),
            Err(SettingsError::Json { .. })
        ));
        let file = settings_file(r#"{ "log_level": "loud" }"#);
        assert!(matches!(
            Settings::with_config_file(file.path()),
            Err(SettingsError::LogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_config_path() {
        assert_eq!(config_path(None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(config_path(Some("  ".to_string())), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(
            config_path(Some("/tmp/eco.json".to_string())),
            PathBuf::from("/tmp/eco.json")
        );
    }
}
