//! Version report: build stamp plus the persona contract.
//!
//! Every service that reads or writes the active-persona selection has to
//! agree on the cookie names, the storage key layout and the fallback
//! order. `verso-persona version` prints them next to the build stamp so an
//! operator can compare two deployments at a glance.

use std::fmt;

use crate::cookie::{PERSONA_ID_COOKIE, PERSONA_TYPE_COOKIE};
use crate::persona::{PersonaType, PriorityTable, STORAGE_KEY_PREFIX};

/// Build stamp embedded by `build.rs`
#[derive(Debug, Clone, Copy)]
pub struct BuildStamp {
    pub version: &'static str,
    pub git_hash: &'static str,
    git_dirty: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
}

impl BuildStamp {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("VERSO_GIT_HASH"),
            git_dirty: env!("VERSO_GIT_DIRTY"),
            built_at: env!("VERSO_BUILD_TIMESTAMP"),
            target: env!("VERSO_TARGET"),
        }
    }

    pub fn git_dirty(&self) -> bool {
        self.git_dirty == "true"
    }

    /// e.g. `0.1.0-abc1234` or `0.1.0-abc1234-dirty`
    pub fn full_version(&self) -> String {
        let suffix = if self.git_dirty() { "-dirty" } else { "" };
        format!("{}-{}{}", self.version, self.git_hash, suffix)
    }
}

/// Names and defaults shared with other services
#[derive(Debug, Clone)]
pub struct PersonaContract {
    pub type_cookie: &'static str,
    pub id_cookie: &'static str,
    pub storage_key_prefix: &'static str,
    pub default_priority: PriorityTable,
}

impl PersonaContract {
    pub fn current() -> Self {
        Self {
            type_cookie: PERSONA_TYPE_COOKIE,
            id_cookie: PERSONA_ID_COOKIE,
            storage_key_prefix: STORAGE_KEY_PREFIX,
            default_priority: PriorityTable::default(),
        }
    }
}

/// What `verso-persona version` prints
#[derive(Debug, Clone)]
pub struct VersionReport {
    pub build: BuildStamp,
    pub contract: PersonaContract,
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let build = &self.build;
        let contract = &self.contract;

        writeln!(f, "{} {}", env!("CARGO_PKG_NAME"), build.full_version())?;
        writeln!(f, "  built {} for {}", build.built_at, build.target)?;
        writeln!(f)?;
        writeln!(f, "Persona contract:")?;
        writeln!(f, "  type cookie:  {}", contract.type_cookie)?;
        writeln!(f, "  id cookie:    {}", contract.id_cookie)?;
        writeln!(f, "  storage key:  {}:<user_id>", contract.storage_key_prefix)?;
        writeln!(f)?;
        writeln!(f, "Default priority:")?;
        for (rank, tag) in contract.default_priority.tags().iter().enumerate() {
            let label = tag
                .parse::<PersonaType>()
                .map(|pt| pt.display_name())
                .unwrap_or("(custom)");
            writeln!(f, "  {:>2}  {:<20} {}", rank, tag, label)?;
        }
        Ok(())
    }
}

pub fn report() -> VersionReport {
    VersionReport {
        build: BuildStamp::current(),
        contract: PersonaContract::current(),
    }
}
