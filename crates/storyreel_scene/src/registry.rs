//! Run-scoped registry of canonical entity descriptions.

use std::collections::HashMap;
use storyreel_core::{Entity, EntityKind};
use tracing::{debug, instrument};

/// Canonical descriptions of recurring characters, creatures, objects and settings.
///
/// The first sighting of a name fixes its description for the rest of the
/// run; later sightings get the stored description back unchanged. Names
/// match case-insensitively and keep the spelling of their first sighting.
///
/// # Examples
///
/// ```
/// use storyreel_core::EntityKind;
/// use storyreel_scene::CharacterConsistencyRegistry;
///
/// let mut registry = CharacterConsistencyRegistry::new();
/// let first = registry.resolve("Raju", EntityKind::Character, "a boy in a blue shirt", Some(0));
/// assert_eq!(first, "a boy in a blue shirt");
/// let again = registry.resolve("RAJU", EntityKind::Character, "a tall man", Some(2));
/// assert_eq!(again, "a boy in a blue shirt");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CharacterConsistencyRegistry {
    entities: Vec<Entity>,
    by_key: HashMap<String, usize>,
}

impl CharacterConsistencyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register an entity before the run, e.g. from a character bible.
    ///
    /// Seeding a name that is already registered has no effect.
    pub fn seed(&mut self, name: &str, kind: EntityKind, description: &str) {
        self.insert(name, kind, description, None);
    }

    /// Return the fingerprint for `name`, storing `proposed` on first sighting.
    #[instrument(skip(self, proposed))]
    pub fn resolve(
        &mut self,
        name: &str,
        kind: EntityKind,
        proposed: &str,
        introduced_in: Option<usize>,
    ) -> &str {
        let index = self.insert(name, kind, proposed, introduced_in);
        self.entities[index].description_fingerprint()
    }

    fn insert(
        &mut self,
        name: &str,
        kind: EntityKind,
        description: &str,
        introduced_in: Option<usize>,
    ) -> usize {
        let key = name.trim().to_lowercase();
        if let Some(&index) = self.by_key.get(&key) {
            return index;
        }
        debug!(name, %kind, "Registering entity");
        let index = self.entities.len();
        self.entities
            .push(Entity::new(name.trim(), kind, description, introduced_in));
        self.by_key.insert(key, index);
        index
    }

    /// Stored entity for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.by_key
            .get(&name.trim().to_lowercase())
            .map(|&index| &self.entities[index])
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Read-only copy of the registry in introduction order.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entities: self.entities.clone(),
        }
    }
}

/// Immutable view of the registry, shared with concurrent request builders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    entities: Vec<Entity>,
}

impl RegistrySnapshot {
    /// Entities in introduction order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Fingerprint stored for `name`.
    pub fn fingerprint(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_lowercase();
        self.entities
            .iter()
            .find(|entity| entity.canonical_name().to_lowercase() == key)
            .map(|entity| entity.description_fingerprint().as_str())
    }

    /// `(name, fingerprint)` pairs in introduction order.
    pub fn cast_reference(&self) -> Vec<(String, String)> {
        self.entities
            .iter()
            .map(|entity| {
                (
                    entity.canonical_name().clone(),
                    entity.description_fingerprint().clone(),
                )
            })
            .collect()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_spelling_is_canonical() {
        let mut registry = CharacterConsistencyRegistry::new();
        registry.resolve("Fairy", EntityKind::Creature, "glowing fairy", Some(2));
        registry.resolve("fairy", EntityKind::Creature, "tiny fairy", Some(3));
        assert_eq!(registry.len(), 1);
        let entity = registry.get("FAIRY").unwrap();
        assert_eq!(entity.canonical_name(), "Fairy");
        assert_eq!(entity.introduced_in(), &Some(2));
    }

    #[test]
    fn seeded_entities_win_over_story_descriptions() {
        let mut registry = CharacterConsistencyRegistry::new();
        registry.seed("Raju", EntityKind::Character, "a ten-year-old boy in a faded blue shirt");
        let fingerprint = registry.resolve("Raju", EntityKind::Character, "Raju", Some(0));
        assert_eq!(fingerprint, "a ten-year-old boy in a faded blue shirt");
        assert_eq!(registry.get("raju").unwrap().introduced_in(), &None);
    }

    #[test]
    fn snapshot_keeps_introduction_order() {
        let mut registry = CharacterConsistencyRegistry::new();
        registry.resolve("Raju", EntityKind::Character, "boy", Some(0));
        registry.resolve("roof", EntityKind::Setting, "roof", Some(0));
        registry.resolve("light", EntityKind::Object, "bright light", Some(1));
        let snapshot = registry.snapshot();
        let names: Vec<&str> = snapshot
            .entities()
            .iter()
            .map(|e| e.canonical_name().as_str())
            .collect();
        assert_eq!(names, vec!["Raju", "roof", "light"]);
        assert_eq!(snapshot.fingerprint("LIGHT"), Some("bright light"));

        registry.resolve("fairy", EntityKind::Creature, "fairy", Some(2));
        assert_eq!(snapshot.len(), 3);
    }
}
