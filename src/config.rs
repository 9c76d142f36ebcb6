//! Configuration system for verso-persona
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (VERSO_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::persona::{PersonaType, PriorityTable};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersoConfig {
    /// Persona resolution settings
    pub resolver: ResolverSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Data storage paths
    pub storage: StorageSettings,
}

/// Persona resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Persona type tags in fallback order, highest priority first
    pub priority: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// How often the log file rolls over: hourly, daily or never
    pub rotation: String,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding preferences.json
    pub data_dir: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            priority: PersonaType::all()
                .iter()
                .map(|pt| pt.slug().to_string())
                .collect(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            rotation: "daily".to_string(),
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.verso/persona".to_string(),
        }
    }
}

impl VersoConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading `VERSO_*` overrides through `lookup`
    pub fn load_with<F>(config_path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = Self::from_toml(&content)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_overrides_from(lookup);

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document without env overrides or validation
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            message: e.message().to_string(),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // An explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            PathBuf::from("verso-persona.toml"),
            dirs::config_dir()
                .map(|p| p.join("verso").join("persona.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".verso").join("persona.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/verso/persona.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply overrides from any `VERSO_*` lookup
    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("VERSO_PERSONA_PRIORITY") {
            self.resolver.priority = val.split(',').map(|tag| tag.trim().to_string()).collect();
        }

        if let Some(val) = lookup("VERSO_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("VERSO_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("VERSO_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        if let Some(val) = lookup("VERSO_DATA_DIR") {
            self.storage.data_dir = val;
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.priority_table()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        let valid_rotations = ["hourly", "daily", "never"];
        if !valid_rotations.contains(&self.logging.rotation.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.rotation",
                format!(
                    "Invalid log rotation '{}'. Must be one of: {}",
                    self.logging.rotation,
                    valid_rotations.join(", ")
                ),
            ));
        }

        if self.storage.data_dir.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "storage.data_dir",
                "Data directory cannot be empty",
            ));
        }

        Ok(())
    }

    /// The configured fallback order
    pub fn priority_table(&self) -> Result<PriorityTable> {
        PriorityTable::new(self.resolver.priority.iter().cloned())
    }

    /// Get the data directory as a PathBuf
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".verso")
                .join("persona.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::config_field_invalid(
            "path",
            format!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                config_path.display()
            ),
        ));
    }

    write_config_file(&config_path, &generate_default_config())?;
    Ok(config_path)
}

fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| Error::IoWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# verso-persona configuration

[resolver]
# Fallback order when neither the persona cookie nor the stored preference
# matches one of the user's personas. Highest priority first; types not
# listed rank after every listed type.
priority = [
    "ceo",
    "staff",
    "arranger",
    "partner",
    "commercial_partner",
    "introducer",
    "lawyer",
    "investor",
]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.verso/persona/logs/persona.log"

# How often the log file rolls over: hourly, daily or never
rotation = "daily"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[storage]
# Directory holding preferences.json
data_dir = "~/.verso/persona"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = VersoConfig::default();
        assert_eq!(config.resolver.priority[0], "ceo");
        assert_eq!(config.resolver.priority.len(), 8);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.priority_table().unwrap(), PriorityTable::default());
    }

    #[test]
    fn test_env_override() {
        let env: HashMap<&str, &str> = [
            ("VERSO_PERSONA_PRIORITY", "partner, ceo,investor"),
            ("VERSO_LOG_LEVEL", "debug"),
            ("VERSO_LOG_JSON", "1"),
            ("VERSO_DATA_DIR", "/tmp/verso"),
        ]
        .into_iter()
        .collect();

        let mut config = VersoConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.resolver.priority, vec!["partner", "ceo", "investor"]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.storage.data_dir, "/tmp/verso");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_priority_with_blank_entry_is_invalid() {
        let mut config = VersoConfig::default();
        config.apply_overrides_from(|key| {
            (key == "VERSO_PERSONA_PRIORITY").then(|| "ceo,,investor".to_string())
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = VersoConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_duplicate_priority() {
        let mut config = VersoConfig::default();
        config.resolver.priority = vec!["ceo".into(), "ceo".into()];
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::PriorityTableInvalid);
    }

    #[test]
    fn test_validation_invalid_rotation() {
        let mut config = VersoConfig::default();
        config.logging.rotation = "weekly".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log rotation 'weekly'"));

        config.logging.rotation = "Hourly".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_data_dir() {
        let mut config = VersoConfig::default();
        config.storage.data_dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = VersoConfig::default();
        config.storage.data_dir = "~/test/data".to_string();
        config.expand_paths();
        assert!(!config.storage.data_dir.contains('~'));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = VersoConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = VersoConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config.resolver.priority, parsed.resolver.priority);
        assert_eq!(config.storage.data_dir, parsed.storage.data_dir);
    }

    #[test]
    fn test_parse_config_file() {
        let config = VersoConfig::from_toml(
            r#"
[resolver]
priority = ["staff", "investor"]

[logging]
level = "warn"
"#,
        )
        .unwrap();

        assert_eq!(config.resolver.priority, vec!["staff", "investor"]);
        assert_eq!(config.logging.level, "warn");
        // unspecified sections keep their defaults
        assert_eq!(config.storage.data_dir, "~/.verso/persona");
    }

    #[test]
    fn test_parse_error() {
        let err = VersoConfig::from_toml("[resolver\npriority = 3").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config = VersoConfig::from_toml(&generate_default_config()).unwrap();
        assert_eq!(config.resolver.priority, ResolverSettings::default().priority);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_path() {
        let err = VersoConfig::find_config_file(Some("/nonexistent/verso.toml")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("persona.toml");
        let path_str = path.to_str().unwrap();

        assert_eq!(init_config(Some(path_str), false).unwrap(), path);
        assert!(init_config(Some(path_str), false).is_err());
        assert!(init_config(Some(path_str), true).is_ok());
    }
}
