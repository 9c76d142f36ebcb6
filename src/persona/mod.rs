//! Persona system: which of a user's role personas is active.
//!
//! A portal user may hold several personas at once (investor, partner,
//! introducer, lawyer, arranger, commercial partner, staff, CEO), each tied
//! to a different business entity. `resolver` picks the active one from
//! caller-supplied hints; `priority` is the fallback order; `storage` names
//! the per-user preference key. `roster` and `preference` are the file-backed
//! boundary the CLI uses around those pure pieces.

pub mod preference;
pub mod priority;
pub mod resolver;
pub mod roster;
pub mod storage;
pub mod types;

pub use preference::{PreferenceRecord, PreferenceStore};
pub use priority::{select_persona_by_priority, PriorityTable};
pub use resolver::{
    resolve_active_persona, PersonaResolver, Resolution, ResolutionHints, ResolutionSource,
};
pub use roster::{load_personas, parse_personas};
pub use storage::{per_user_persona_storage_key, STORAGE_KEY_PREFIX};
pub use types::{Persona, PersonaIdentity, PersonaType};
