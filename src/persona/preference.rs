//! Persisted per-user persona preference.
//!
//! The resolver never touches storage; this store is what a caller uses to
//! remember a user's last explicit switch and feed it back as the stored
//! hint. Entries live in `<data_dir>/preferences.json`, keyed by
//! [`per_user_persona_storage_key`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::storage::per_user_persona_storage_key;
use super::types::PersonaIdentity;

const PREFERENCES_FILE: &str = "preferences.json";

/// One user's remembered persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// Entity id fed back to the resolver as the stored hint.
    pub persona_id: String,

    /// Type tag at the time of the switch, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_type: Option<String>,

    /// When the choice was recorded.
    pub updated_at: DateTime<Utc>,
}

/// File-backed map from storage key to [`PreferenceRecord`].
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    entries: BTreeMap<String, PreferenceRecord>,
}

impl PreferenceStore {
    /// Open the store at `path`. A missing or blank file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries: BTreeMap<String, PreferenceRecord> = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| Error::PreferenceCorrupted {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No preference store yet");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(Error::IoRead {
                    path: path.clone(),
                    source: e,
                })
            }
        };

        Ok(Self { path, entries })
    }

    /// Open `preferences.json` inside a data directory.
    pub fn in_data_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&PreferenceRecord> {
        self.entries.get(&per_user_persona_storage_key(user_id))
    }

    /// The stored hint for `user_id`, if one was remembered.
    pub fn stored_persona_id(&self, user_id: &str) -> Option<&str> {
        self.get(user_id).map(|record| record.persona_id.as_str())
    }

    /// Record `persona_id` as `user_id`'s choice, replacing any previous one.
    pub fn remember(
        &mut self,
        user_id: &str,
        persona_id: impl Into<String>,
        persona_type: Option<String>,
    ) -> &PreferenceRecord {
        let key = per_user_persona_storage_key(user_id);
        let record = PreferenceRecord {
            persona_id: persona_id.into(),
            persona_type,
            updated_at: Utc::now(),
        };
        debug!(key = %key, persona_id = %record.persona_id, "Preference recorded");
        self.entries.insert(key.clone(), record);
        &self.entries[&key]
    }

    /// Record a persona from a roster, keeping its type tag.
    pub fn remember_persona<P: PersonaIdentity>(
        &mut self,
        user_id: &str,
        persona: &P,
    ) -> &PreferenceRecord {
        self.remember(
            user_id,
            persona.entity_id(),
            Some(persona.persona_type().to_string()),
        )
    }

    /// Drop `user_id`'s choice. Returns whether one existed.
    pub fn forget(&mut self, user_id: &str) -> bool {
        self.entries
            .remove(&per_user_persona_storage_key(user_id))
            .is_some()
    }

    /// Write the store back to disk as pretty JSON.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(|e| Error::IoWrite {
            path: self.path.clone(),
            source: e,
        })?;

        info!(path = %self.path.display(), entries = self.entries.len(), "Preferences saved");
        Ok(())
    }
}
