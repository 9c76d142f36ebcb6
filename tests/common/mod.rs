//! Common test utilities and fixtures
//!
//! Shared by the CLI and configuration integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Roster with investor-1, partner-1 and ceo-1, in that order
pub fn personas_fixture() -> PathBuf {
    fixture_path("personas.json")
}

pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// A command for the verso-persona binary, isolated from the caller's env
pub fn persona_cmd() -> Command {
    let mut cmd = Command::cargo_bin("verso-persona").unwrap();
    for var in [
        "VERSO_CONFIG",
        "VERSO_DATA_DIR",
        "VERSO_LOG_LEVEL",
        "VERSO_LOG_FILE",
        "VERSO_LOG_JSON",
        "VERSO_PERSONA_PRIORITY",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Scratch directory with its own config file and data directory
pub struct TestEnvironment {
    pub root: TempDir,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_resolver_section("")
    }

    /// Environment whose config carries extra `[resolver]` lines
    pub fn with_resolver_section(resolver: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let data_dir = root.path().join("data");
        let config_path = root.path().join("persona.toml");

        let config = format!(
            "[resolver]\n{}\n\n[logging]\nlevel = \"warn\"\n\n[storage]\ndata_dir = \"{}\"\n",
            resolver,
            data_dir.display()
        );
        fs::write(&config_path, config).expect("Failed to write config");

        Self {
            root,
            config_path,
            data_dir,
        }
    }

    pub fn config(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    /// Write a roster file into the environment and return its path
    pub fn write_roster(&self, json: &str) -> PathBuf {
        let path = self.root.path().join("roster.json");
        fs::write(&path, json).expect("Failed to write roster");
        path
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }

    /// A command preconfigured with `<subcommand> --config <this env>`
    pub fn cmd(&self, subcommand: &str) -> Command {
        let mut cmd = persona_cmd();
        cmd.arg(subcommand).arg("--config").arg(self.config());
        cmd
    }
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_exist() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
        assert!(personas_fixture().exists());
        assert!(valid_config_fixture().exists());
        assert!(invalid_config_fixture().exists());
    }

    #[test]
    fn test_environment_writes_config() {
        let env = TestEnvironment::new();
        assert!(env.config_path.exists());
        assert!(!env.preferences_path().exists());
    }
}
