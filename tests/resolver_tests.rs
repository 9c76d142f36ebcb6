//! Resolver integration tests
//!
//! Exercises the public resolution API the way a portal request handler
//! would: roster from disk, hints from a Cookie header and the preference
//! store.

mod common;

use std::ptr;

use tempfile::TempDir;

use verso_persona::persona::{load_personas, PreferenceStore, ResolutionSource};
use verso_persona::{
    per_user_persona_storage_key, read_cookie_value, resolve_active_persona,
    select_persona_by_priority, Persona, PersonaIdentity, PersonaResolver, PriorityTable,
    ResolutionHints, PERSONA_ID_COOKIE, PERSONA_TYPE_COOKIE,
};

fn roster() -> Vec<Persona> {
    load_personas(&common::personas_fixture()).unwrap()
}

fn cookie_header(persona_type: &str, entity_id: &str) -> String {
    format!(
        "session=abc; {}={}; {}={}",
        PERSONA_TYPE_COOKIE, persona_type, PERSONA_ID_COOKIE, entity_id
    )
}

// ─────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_cookie_beats_stored_and_priority() {
    let personas = roster();
    let header = cookie_header("partner", "partner-1");
    let hints =
        ResolutionHints::from_cookie_header(&header).with_stored_persona_id(Some("investor-1"));

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert_eq!(active.entity_id, "partner-1");
}

#[test]
fn test_stored_beats_priority() {
    let personas = roster();
    let hints = ResolutionHints::new().with_stored_persona_id(Some("investor-1"));

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert_eq!(active.entity_id, "investor-1");
}

#[test]
fn test_unmatched_hints_fall_through() {
    let personas = roster();
    let header = cookie_header("lawyer", "lawyer-3");
    let hints =
        ResolutionHints::from_cookie_header(&header).with_stored_persona_id(Some("gone-1"));

    let resolution = PersonaResolver::default()
        .resolve_with_source(&personas, &hints)
        .unwrap();
    assert_eq!(resolution.source, ResolutionSource::Priority);
    assert_eq!(resolution.persona.entity_id, "ceo-1");
}

#[test]
fn test_cookie_requires_both_halves() {
    let personas = roster();
    let header = format!("{}=partner-1", PERSONA_ID_COOKIE);
    let hints = ResolutionHints::from_cookie_header(&header);

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert_eq!(active.entity_id, "ceo-1");
}

#[test]
fn test_cookie_type_must_match() {
    let personas = vec![
        Persona::new("investor", "shared-1"),
        Persona::new("partner", "shared-1"),
    ];
    let header = cookie_header("partner", "shared-1");
    let hints = ResolutionHints::from_cookie_header(&header);

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert!(ptr::eq(active, &personas[1]));
}

#[test]
fn test_stored_id_matches_first_with_that_id() {
    let personas = vec![
        Persona::new("investor", "shared-1"),
        Persona::new("partner", "shared-1"),
    ];
    let hints = ResolutionHints::new().with_stored_persona_id(Some("shared-1"));

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert!(ptr::eq(active, &personas[0]));
}

// ─────────────────────────────────────────────────────────────────
// Totality and identity
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_roster_resolves_to_none() {
    let personas: Vec<Persona> = Vec::new();
    let header = cookie_header("ceo", "ceo-1");
    let hints =
        ResolutionHints::from_cookie_header(&header).with_stored_persona_id(Some("ceo-1"));

    assert!(resolve_active_persona(&personas, &hints).is_none());
    assert!(select_persona_by_priority(&personas).is_none());
}

#[test]
fn test_non_empty_roster_always_resolves() {
    let personas = vec![Persona::new("auditor", "a-1")];
    let active = resolve_active_persona(&personas, &ResolutionHints::new()).unwrap();
    assert!(ptr::eq(active, &personas[0]));
}

#[test]
fn test_returns_element_with_payload() {
    let personas = roster();
    let hints = ResolutionHints::new().with_stored_persona_id(Some("investor-1"));

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert!(ptr::eq(active, &personas[0]));
    assert_eq!(active.payload["can_sign"], true);
}

#[test]
fn test_deterministic() {
    let personas = roster();
    let header = cookie_header("investor", "investor-1");
    let hints = ResolutionHints::from_cookie_header(&header);

    let first = resolve_active_persona(&personas, &hints).unwrap();
    for _ in 0..10 {
        assert!(ptr::eq(resolve_active_persona(&personas, &hints).unwrap(), first));
    }
}

// ─────────────────────────────────────────────────────────────────
// Priority table
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_default_priority_order() {
    let personas = vec![
        Persona::new("investor", "i"),
        Persona::new("lawyer", "l"),
        Persona::new("introducer", "in"),
        Persona::new("commercial_partner", "cp"),
        Persona::new("partner", "p"),
        Persona::new("arranger", "a"),
        Persona::new("staff", "s"),
    ];

    assert_eq!(select_persona_by_priority(&personas).unwrap().entity_id, "s");
    assert_eq!(select_persona_by_priority(&personas[..5]).unwrap().entity_id, "p");
    assert_eq!(select_persona_by_priority(&personas[..2]).unwrap().entity_id, "l");
}

#[test]
fn test_unknown_types_rank_last_in_input_order() {
    let personas = vec![
        Persona::new("auditor", "x-1"),
        Persona::new("observer", "x-2"),
    ];
    let active = select_persona_by_priority(&personas).unwrap();
    assert!(ptr::eq(active, &personas[0]));

    let with_known = vec![Persona::new("auditor", "x-1"), Persona::new("investor", "i-1")];
    assert_eq!(select_persona_by_priority(&with_known).unwrap().entity_id, "i-1");
}

#[test]
fn test_ties_go_to_first_listed() {
    let personas = vec![
        Persona::new("partner", "p-1"),
        Persona::new("partner", "p-2"),
    ];
    let active = select_persona_by_priority(&personas).unwrap();
    assert!(ptr::eq(active, &personas[0]));
}

#[test]
fn test_custom_table() {
    let table = PriorityTable::new(["investor", "partner"]).unwrap();
    let resolver = PersonaResolver::new(table);

    let active = resolver
        .resolve(&roster(), &ResolutionHints::new())
        .map(|p| p.entity_id.clone());
    assert_eq!(active.as_deref(), Some("investor-1"));
}

// ─────────────────────────────────────────────────────────────────
// Caller types
// ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct PortalPersona {
    kind: String,
    id: String,
    label: &'static str,
}

impl PersonaIdentity for PortalPersona {
    fn persona_type(&self) -> &str {
        &self.kind
    }

    fn entity_id(&self) -> &str {
        &self.id
    }
}

#[test]
fn test_caller_defined_persona_type() {
    let personas = vec![
        PortalPersona {
            kind: "lawyer".into(),
            id: "law-1".into(),
            label: "Counsel",
        },
        PortalPersona {
            kind: "arranger".into(),
            id: "arr-1".into(),
            label: "Arranger Desk",
        },
    ];

    let active = resolve_active_persona(&personas, &ResolutionHints::new()).unwrap();
    assert_eq!(active.label, "Arranger Desk");

    let hints = ResolutionHints::new().with_cookie("lawyer", "law-1");
    assert_eq!(resolve_active_persona(&personas, &hints).unwrap().label, "Counsel");
}

// ─────────────────────────────────────────────────────────────────
// Request flow
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_request_flow_with_preference_store() {
    let temp_dir = TempDir::new().unwrap();
    let personas = roster();

    let mut store = PreferenceStore::in_data_dir(temp_dir.path()).unwrap();
    store.remember_persona("user-1", &personas[1]);
    store.save().unwrap();

    let store = PreferenceStore::in_data_dir(temp_dir.path()).unwrap();
    let header = "session=abc";
    let hints = ResolutionHints::from_cookie_header(header)
        .with_stored_persona_id(store.stored_persona_id("user-1"));

    let active = resolve_active_persona(&personas, &hints).unwrap();
    assert_eq!(active.entity_id, "partner-1");
    assert_eq!(per_user_persona_storage_key("user-1"), "verso_active_persona:user-1");
}

#[test]
fn test_cookie_helpers_agree_with_hints() {
    let header = cookie_header("partner", "partner-1");
    assert_eq!(read_cookie_value(&header, PERSONA_TYPE_COOKIE), Some("partner"));
    assert_eq!(read_cookie_value(&header, PERSONA_ID_COOKIE), Some("partner-1"));
    assert_eq!(read_cookie_value(&header, "verso_active_persona"), None);

    let hints = ResolutionHints::from_cookie_header(&header);
    assert_eq!(hints, ResolutionHints::new().with_cookie("partner", "partner-1"));
}
