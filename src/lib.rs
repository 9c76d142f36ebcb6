//! verso-persona: active-persona resolution for the Verso portal.
//!
//! A user may hold several role personas at once. Given all of them and the
//! hints a request carries (persona cookies, a persisted last choice), the
//! resolver deterministically picks the active one:
//!
//! ```
//! use verso_persona::persona::{resolve_active_persona, Persona, ResolutionHints};
//!
//! let personas = vec![
//!     Persona::new("investor", "investor-1").with_field("display_name", "Harbour Capital LP"),
//!     Persona::new("partner", "partner-1"),
//!     Persona::new("ceo", "ceo-1"),
//! ];
//!
//! let header = "verso_active_persona_type=partner; verso_active_persona_id=partner-1";
//! let hints = ResolutionHints::from_cookie_header(header);
//! assert_eq!(resolve_active_persona(&personas, &hints).unwrap().entity_id, "partner-1");
//!
//! // no usable hint: fixed priority order applies
//! let active = resolve_active_persona(&personas, &ResolutionHints::new()).unwrap();
//! assert_eq!(active.entity_id, "ceo-1");
//! ```
//!
//! The `cookie` module and `persona::{resolver, priority, storage}` are
//! pure. Configuration, logging, roster files and the preference store are
//! for callers such as the bundled CLI.

pub mod config;
pub mod cookie;
pub mod error;
pub mod logging;
pub mod persona;
pub mod version;

pub use cookie::{read_cookie_value, PERSONA_ID_COOKIE, PERSONA_TYPE_COOKIE};
pub use error::{Error, ErrorCode, Result};
pub use persona::{
    per_user_persona_storage_key, resolve_active_persona, select_persona_by_priority, Persona,
    PersonaIdentity, PersonaResolver, PriorityTable, ResolutionHints,
};
