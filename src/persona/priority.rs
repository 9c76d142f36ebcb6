//! Fallback ordering of persona types.
//!
//! When no hint picks a persona, the one whose type ranks highest in the
//! [`PriorityTable`] wins. The default table is
//!
//! | rank | tag                  |
//! |------|----------------------|
//! | 0    | `ceo`                |
//! | 1    | `staff`              |
//! | 2    | `arranger`           |
//! | 3    | `partner`            |
//! | 4    | `commercial_partner` |
//! | 5    | `introducer`         |
//! | 6    | `lawyer`             |
//! | 7    | `investor`           |
//!
//! Tags missing from the table all share the rank after the last entry.
//! Equal ranks are broken by position in the input slice, first wins.

use std::collections::HashSet;

use crate::error::{Error, Result};

use super::types::{PersonaIdentity, PersonaType};

/// An explicit, ordered list of persona type tags, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    tags: Vec<String>,
}

impl PriorityTable {
    /// Build a table from tags, highest priority first.
    ///
    /// Surrounding whitespace is trimmed from each tag. Rejects an empty
    /// table, empty tags and duplicates.
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags
            .into_iter()
            .map(Into::<String>::into)
            .map(|tag| tag.trim().to_string())
            .collect();

        if tags.is_empty() {
            return Err(Error::priority_table_invalid(
                "table must list at least one persona type",
            ));
        }

        let mut seen = HashSet::new();
        for (index, tag) in tags.iter().enumerate() {
            if tag.is_empty() {
                return Err(Error::priority_table_invalid(format!("entry {} is empty", index)));
            }
            if !seen.insert(tag.as_str()) {
                return Err(Error::priority_table_invalid(format!(
                    "duplicate persona type '{}'",
                    tag
                )));
            }
        }

        Ok(Self { tags })
    }

    /// Tags in rank order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Rank of a type tag; lower is higher priority.
    ///
    /// Unknown tags get `self.tags().len()`.
    pub fn rank(&self, persona_type: &str) -> usize {
        self.tags
            .iter()
            .position(|tag| tag == persona_type)
            .unwrap_or(self.tags.len())
    }

    /// Pick the highest-ranked persona, first one on ties.
    pub fn select<'a, P: PersonaIdentity>(&self, personas: &'a [P]) -> Option<&'a P> {
        // min_by_key keeps the first of several equal minimums
        personas.iter().min_by_key(|p| self.rank(p.persona_type()))
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            tags: PersonaType::all()
                .iter()
                .map(|pt| pt.slug().to_string())
                .collect(),
        }
    }
}

/// Pick the highest-priority persona using the default table.
pub fn select_persona_by_priority<P: PersonaIdentity>(personas: &[P]) -> Option<&P> {
    PriorityTable::default().select(personas)
}
