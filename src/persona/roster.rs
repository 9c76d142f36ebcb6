//! Persona roster files.
//!
//! A roster is a JSON array of persona objects, as the data-loading layer
//! would produce for one user:
//!
//! ```json
//! [
//!   { "persona_type": "investor", "entity_id": "investor-1", "display_name": "Acme Fund" },
//!   { "persona_type": "ceo", "entity_id": "ceo-1" }
//! ]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

use super::types::Persona;

/// Load and validate a roster file, keeping the file's order.
pub fn load_personas(path: &Path) -> Result<Vec<Persona>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::PersonaFileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let personas =
        parse_personas(&content).map_err(|reason| Error::persona_file_invalid(path, reason))?;

    debug!(path = %path.display(), count = personas.len(), "Persona roster loaded");
    Ok(personas)
}

/// Parse roster JSON, rejecting entries the resolver could never match.
pub fn parse_personas(content: &str) -> std::result::Result<Vec<Persona>, String> {
    let personas: Vec<Persona> =
        serde_json::from_str(content).map_err(|e| format!("Failed to parse JSON: {}", e))?;

    for (index, persona) in personas.iter().enumerate() {
        if persona.persona_type.is_empty() {
            return Err(format!("entry {} has an empty persona_type", index));
        }
        if persona.entity_id.is_empty() {
            return Err(format!("entry {} has an empty entity_id", index));
        }
    }

    Ok(personas)
}
