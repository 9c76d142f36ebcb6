//! Active-persona resolution.
//!
//! Given every persona a user holds and the hints gathered by the caller,
//! pick the one that governs the current view. Precedence, each step
//! short-circuiting on a match:
//!
//! 1. cookie: both the type and id cookies present, and a persona with that
//!    exact `(persona_type, entity_id)` pair exists
//! 2. stored: a persisted persona id matching some persona's `entity_id`
//! 3. priority: [`PriorityTable::select`]
//!
//! A hint that matches nothing falls through to the next step. The only
//! way to get `None` back is an empty persona slice.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::cookie::{read_cookie_value, PERSONA_ID_COOKIE, PERSONA_TYPE_COOKIE};

use super::priority::PriorityTable;
use super::types::PersonaIdentity;

// ─────────────────────────────────────────────────────────────────
// Hints
// ─────────────────────────────────────────────────────────────────

/// Signals suggesting which persona should be active.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionHints<'a> {
    /// Type tag from the persona-selector cookie.
    pub cookie_persona_type: Option<&'a str>,

    /// Entity id from the persona-selector cookie.
    pub cookie_persona_id: Option<&'a str>,

    /// Entity id the caller persisted as the user's last explicit choice.
    pub stored_persona_id: Option<&'a str>,
}

impl<'a> ResolutionHints<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both persona cookies out of a raw `Cookie:` header.
    pub fn from_cookie_header(raw_header: &'a str) -> Self {
        Self {
            cookie_persona_type: read_cookie_value(raw_header, PERSONA_TYPE_COOKIE),
            cookie_persona_id: read_cookie_value(raw_header, PERSONA_ID_COOKIE),
            stored_persona_id: None,
        }
    }

    pub fn with_cookie(mut self, persona_type: &'a str, entity_id: &'a str) -> Self {
        self.cookie_persona_type = Some(persona_type);
        self.cookie_persona_id = Some(entity_id);
        self
    }

    pub fn with_stored_persona_id(mut self, entity_id: Option<&'a str>) -> Self {
        self.stored_persona_id = entity_id;
        self
    }

    /// The cookie pair, only when both halves are usable.
    fn cookie(&self) -> Option<(&'a str, &'a str)> {
        match (non_empty(self.cookie_persona_type), non_empty(self.cookie_persona_id)) {
            (Some(persona_type), Some(entity_id)) => Some((persona_type, entity_id)),
            _ => None,
        }
    }

    fn stored(&self) -> Option<&'a str> {
        non_empty(self.stored_persona_id)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────
// Resolution Result
// ─────────────────────────────────────────────────────────────────

/// Which precedence step produced the active persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Cookie,
    Stored,
    Priority,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Cookie => "cookie",
            ResolutionSource::Stored => "stored",
            ResolutionSource::Priority => "priority",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active persona together with the step that chose it.
#[derive(Debug)]
pub struct Resolution<'a, P> {
    /// Reference into the caller's slice.
    pub persona: &'a P,
    pub source: ResolutionSource,
}

// ─────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────

/// Resolves the active persona against a fixed priority table.
#[derive(Debug, Clone, Default)]
pub struct PersonaResolver {
    table: PriorityTable,
}

impl PersonaResolver {
    pub fn new(table: PriorityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// Resolve the active persona and report which step matched.
    pub fn resolve_with_source<'a, P: PersonaIdentity>(
        &self,
        personas: &'a [P],
        hints: &ResolutionHints<'_>,
    ) -> Option<Resolution<'a, P>> {
        if let Some((persona_type, entity_id)) = hints.cookie() {
            match personas.iter().find(|p| p.is(persona_type, entity_id)) {
                Some(persona) => {
                    trace!(persona_type, entity_id, "Persona cookie matched");
                    return Some(Resolution {
                        persona,
                        source: ResolutionSource::Cookie,
                    });
                }
                None => {
                    debug!(
                        persona_type,
                        entity_id,
                        "Persona cookie matches no persona, ignoring"
                    );
                }
            }
        }

        // id-only: the stored hint carries no type
        if let Some(entity_id) = hints.stored() {
            match personas.iter().find(|p| p.entity_id() == entity_id) {
                Some(persona) => {
                    trace!(entity_id, "Stored persona matched");
                    return Some(Resolution {
                        persona,
                        source: ResolutionSource::Stored,
                    });
                }
                None => {
                    debug!(entity_id, "Stored persona id matches no persona, ignoring");
                }
            }
        }

        let persona = self.table.select(personas)?;
        trace!(
            persona_type = persona.persona_type(),
            entity_id = persona.entity_id(),
            "Persona chosen by priority"
        );
        Some(Resolution {
            persona,
            source: ResolutionSource::Priority,
        })
    }

    /// Resolve the active persona.
    pub fn resolve<'a, P: PersonaIdentity>(
        &self,
        personas: &'a [P],
        hints: &ResolutionHints<'_>,
    ) -> Option<&'a P> {
        self.resolve_with_source(personas, hints).map(|r| r.persona)
    }
}

/// Resolve the active persona using the default priority table.
pub fn resolve_active_persona<'a, P: PersonaIdentity>(
    personas: &'a [P],
    hints: &ResolutionHints<'_>,
) -> Option<&'a P> {
    PersonaResolver::default().resolve(personas, hints)
}
