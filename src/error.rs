//! Error types for verso-persona
//!
//! The resolution core (`persona::resolver`, `cookie`, `persona::storage`)
//! is total and never returns these. They belong to the boundary layer:
//! configuration, roster files, the preference store and the CLI.
//!
//! Provides:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for boundary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Persona data errors (3xx)
    PersonaFileNotFound = 300,
    PersonaFileInvalid = 301,
    PersonaNotFound = 302,
    PreferenceCorrupted = 303,
    PriorityTableInvalid = 304,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Persona data errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Persona Data Errors
    // ─────────────────────────────────────────────────────────────

    /// Persona roster file missing
    #[error("Persona roster not found: {path}")]
    PersonaFileNotFound { path: PathBuf },

    /// Persona roster file could not be parsed or has a bad entry
    #[error("Invalid persona roster {path}: {reason}")]
    PersonaFileInvalid { path: PathBuf, reason: String },

    /// Requested persona id is not in the roster
    #[error("Persona not found: {entity_id}")]
    PersonaNotFound { entity_id: String },

    /// Preference store exists but is unreadable as JSON
    #[error("Preference store {path} is corrupted: {reason}")]
    PreferenceCorrupted { path: PathBuf, reason: String },

    /// Priority table rejected during validation
    #[error("Invalid priority table: {reason}")]
    PriorityTableInvalid { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// JSON serialization of output failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { source, .. } => io_code(source, ErrorCode::IoRead),
            Error::IoWrite { source, .. } => io_code(source, ErrorCode::IoWrite),
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::PersonaFileNotFound { .. } => ErrorCode::PersonaFileNotFound,
            Error::PersonaFileInvalid { .. } => ErrorCode::PersonaFileInvalid,
            Error::PersonaNotFound { .. } => ErrorCode::PersonaNotFound,
            Error::PreferenceCorrupted { .. } => ErrorCode::PreferenceCorrupted,
            Error::PriorityTableInvalid { .. } => ErrorCode::PriorityTableInvalid,

            Error::Json(_) | Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'verso-persona config init' to create a default configuration file.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'verso-persona config validate' to see details.",
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values.",
            ),
            Error::PersonaFileNotFound { .. } => Some(
                "Pass the path of a JSON array of personas with --personas.",
            ),
            Error::PersonaFileInvalid { .. } => Some(
                "Every roster entry needs non-empty 'persona_type' and 'entity_id' strings.",
            ),
            Error::PersonaNotFound { .. } => Some(
                "Run 'verso-persona priority --personas <file>' to list what the roster resolves to.",
            ),
            Error::PreferenceCorrupted { .. } => Some(
                "Delete preferences.json in the data directory; stored choices will be re-recorded.",
            ),
            Error::PriorityTableInvalid { .. } => Some(
                "Priority entries must be non-empty and unique, e.g. priority = [\"ceo\", \"partner\", \"investor\"].",
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code().as_str(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

/// Permission and missing-file failures get their own codes
fn io_code(source: &std::io::Error, fallback: ErrorCode) -> ErrorCode {
    match source.kind() {
        std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
        std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
        _ => fallback,
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a roster validation error
    pub fn persona_file_invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::PersonaFileInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a priority table error
    pub fn priority_table_invalid(reason: impl Into<String>) -> Self {
        Error::PriorityTableInvalid {
            reason: reason.into(),
        }
    }
}
