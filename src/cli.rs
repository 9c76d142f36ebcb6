//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for verso-persona.

use clap::{Parser, Subcommand};

/// verso-persona - resolve which persona a portal user is acting as
///
/// Reads a user's personas from a JSON roster, combines them with persona
/// cookies and the stored last choice, and prints the active persona.
#[derive(Parser, Debug)]
#[command(name = "verso-persona")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the active persona from cookies, stored preference and priority
    Resolve {
        /// JSON file listing the user's personas
        #[arg(short, long)]
        personas: String,

        /// Raw Cookie header to read the persona cookies from
        #[arg(long)]
        cookie_header: Option<String>,

        /// Persona type cookie value (overrides --cookie-header)
        #[arg(long, requires = "cookie_id")]
        cookie_type: Option<String>,

        /// Persona id cookie value (overrides --cookie-header)
        #[arg(long, requires = "cookie_type")]
        cookie_id: Option<String>,

        /// Stored persona id (overrides the preference stored for --user)
        #[arg(long)]
        stored_id: Option<String>,

        /// User whose stored preference should be used
        #[arg(short, long)]
        user: Option<String>,

        /// Also report which rule chose the persona
        #[arg(long)]
        explain: bool,

        /// Path to configuration file
        #[arg(short, long, env = "VERSO_CONFIG")]
        config: Option<String>,
    },

    /// Print the persona the priority order alone would choose
    Priority {
        /// JSON file listing the user's personas
        #[arg(short, long)]
        personas: String,

        /// Path to configuration file
        #[arg(short, long, env = "VERSO_CONFIG")]
        config: Option<String>,
    },

    /// Show the effective persona priority table
    Table {
        /// Path to configuration file
        #[arg(short, long, env = "VERSO_CONFIG")]
        config: Option<String>,
    },

    /// Print the storage key for a user's persona preference
    StorageKey {
        /// User id
        user_id: String,
    },

    /// Extract one value from a raw Cookie header
    Cookie {
        /// Raw Cookie header, e.g. "a=1; b=2"
        #[arg(long)]
        header: String,

        /// Cookie name to look up
        name: String,
    },

    /// Remember a persona as a user's last explicit choice
    Remember {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Entity id of the chosen persona
        #[arg(long)]
        persona_id: String,

        /// Type tag of the chosen persona
        #[arg(long)]
        persona_type: Option<String>,

        /// Roster to check the persona against
        #[arg(short, long)]
        personas: Option<String>,

        /// Path to configuration file
        #[arg(short, long, env = "VERSO_CONFIG")]
        config: Option<String>,
    },

    /// Forget a user's remembered persona
    Forget {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Path to configuration file
        #[arg(short, long, env = "VERSO_CONFIG")]
        config: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

impl Commands {
    /// Config file named on the command line, for commands that load one
    pub fn config_path(&self) -> Option<&str> {
        match self {
            Commands::Resolve { config, .. }
            | Commands::Priority { config, .. }
            | Commands::Table { config }
            | Commands::Remember { config, .. }
            | Commands::Forget { config, .. } => config.as_deref(),
            _ => None,
        }
    }
}
