//! Core types for the persona system.
//!
//! A persona is one role-scoped identity a portal user can act as. The
//! resolver only needs the `(persona_type, entity_id)` pair, so it works
//! against the [`PersonaIdentity`] trait and leaves every other field to
//! the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona Identity
// ─────────────────────────────────────────────────────────────────

/// The minimal view of a persona the resolver reads.
///
/// `entity_id` is only unique within one `persona_type`.
pub trait PersonaIdentity {
    /// Role tag, e.g. `"investor"` or `"ceo"`.
    fn persona_type(&self) -> &str;

    /// Id of the business entity this persona grants access to.
    fn entity_id(&self) -> &str;

    /// True when both the type tag and the entity id match.
    fn is(&self, persona_type: &str, entity_id: &str) -> bool {
        self.persona_type() == persona_type && self.entity_id() == entity_id
    }
}

impl<T: PersonaIdentity + ?Sized> PersonaIdentity for &T {
    fn persona_type(&self) -> &str {
        (**self).persona_type()
    }

    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }
}

impl PersonaIdentity for (String, String) {
    fn persona_type(&self) -> &str {
        &self.0
    }

    fn entity_id(&self) -> &str {
        &self.1
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A persona as loaded from a roster file.
///
/// Everything besides the type tag and entity id (display label, logo,
/// signing permissions, ...) is kept in `payload` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub persona_type: String,

    pub entity_id: String,

    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Persona {
    pub fn new(persona_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            persona_type: persona_type.into(),
            entity_id: entity_id.into(),
            payload: serde_json::Map::new(),
        }
    }

    /// Attach an opaque payload field.
    pub fn with_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// The known role for this persona's tag, if any.
    pub fn known_type(&self) -> Option<PersonaType> {
        self.persona_type.parse().ok()
    }
}

impl PersonaIdentity for Persona {
    fn persona_type(&self) -> &str {
        &self.persona_type
    }

    fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.persona_type, self.entity_id)
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Type
// ─────────────────────────────────────────────────────────────────

/// Roles the portal knows about.
///
/// The resolver treats type tags as opaque strings; this enum exists to
/// name the default priority order and to give operators readable labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaType {
    /// Chief executive; full staff access.
    Ceo,
    /// Internal staff member.
    Staff,
    /// Deal arranger.
    Arranger,
    /// Partner firm.
    Partner,
    /// Commercial partner with distribution agreements.
    CommercialPartner,
    /// Introducer earning fees on referred subscriptions.
    Introducer,
    /// Legal counsel with document-vault access.
    Lawyer,
    /// Investor holding subscriptions.
    Investor,
}

impl PersonaType {
    /// Tag used in cookies, roster files and config.
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaType::Ceo => "ceo",
            PersonaType::Staff => "staff",
            PersonaType::Arranger => "arranger",
            PersonaType::Partner => "partner",
            PersonaType::CommercialPartner => "commercial_partner",
            PersonaType::Introducer => "introducer",
            PersonaType::Lawyer => "lawyer",
            PersonaType::Investor => "investor",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaType::Ceo => "CEO",
            PersonaType::Staff => "Staff",
            PersonaType::Arranger => "Arranger",
            PersonaType::Partner => "Partner",
            PersonaType::CommercialPartner => "Commercial Partner",
            PersonaType::Introducer => "Introducer",
            PersonaType::Lawyer => "Lawyer",
            PersonaType::Investor => "Investor",
        }
    }

    /// All persona types, highest default priority first.
    pub fn all() -> &'static [PersonaType] {
        &[
            PersonaType::Ceo,
            PersonaType::Staff,
            PersonaType::Arranger,
            PersonaType::Partner,
            PersonaType::CommercialPartner,
            PersonaType::Introducer,
            PersonaType::Lawyer,
            PersonaType::Investor,
        ]
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PersonaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaType::all()
            .iter()
            .copied()
            .find(|pt| pt.slug() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = PersonaType::all().iter().map(|pt| pt.slug()).collect();
                format!("Unknown persona type '{}'. Valid: {}", s, valid.join(", "))
            })
    }
}
