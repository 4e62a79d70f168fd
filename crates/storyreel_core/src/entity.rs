//! Recurring story entities tracked for visual consistency.

use serde::{Deserialize, Serialize};

/// Broad category of a tracked entity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    /// A named or described person
    Character,
    /// An animal or fantastical being
    Creature,
    /// A significant prop or phenomenon
    Object,
    /// A place or environment
    Setting,
}

/// An entity whose description is frozen at first mention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Entity {
    /// Name as first introduced
    canonical_name: String,
    /// Category
    kind: EntityKind,
    /// Full descriptive attributes, never altered after first sighting
    description_fingerprint: String,
    /// Beat of first sighting; `None` for entities seeded from configuration
    introduced_in: Option<usize>,
}

impl Entity {
    /// Create an entity record.
    pub fn new(
        canonical_name: impl Into<String>,
        kind: EntityKind,
        description_fingerprint: impl Into<String>,
        introduced_in: Option<usize>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            kind,
            description_fingerprint: description_fingerprint.into(),
            introduced_in,
        }
    }
}
