//! Compendium - the reference data set rules are evaluated against
//!
//! The derived-stat rules never query ambient state for abilities, skills or
//! classes. Callers load a `Compendium` once and pass it in.

use serde::{Deserialize, Serialize};

use crate::entities::{
    Ability, Background, CharacterClass, Item, Race, SkillDefinition, Spell, StatusEffect,
};
use crate::{
    AbilityId, BackgroundId, ClassId, DomainError, ItemId, RaceId, SkillId, SpellId,
    StatusEffectId,
};

/// All reference data known to the system.
///
/// Collections keep insertion order; abilities in particular are listed in
/// sheet order. Ids are unique within each collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compendium {
    abilities: Vec<Ability>,
    skills: Vec<SkillDefinition>,
    classes: Vec<CharacterClass>,
    races: Vec<Race>,
    backgrounds: Vec<Background>,
    items: Vec<Item>,
    spells: Vec<Spell>,
    status_effects: Vec<StatusEffect>,
}

macro_rules! collection {
    ($field:ident, $ty:ty, $id:ty, $get:ident, $add:ident) => {
        pub fn $field(&self) -> &[$ty] {
            &self.$field
        }

        pub fn $get(&self, id: $id) -> Option<&$ty> {
            self.$field.iter().find(|entry| entry.id == id)
        }

        /// Adds an entry, or replaces the existing entry with the same id.
        pub fn $add(&mut self, entry: $ty) -> &mut Self {
            match self.$field.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => self.$field.push(entry),
            }
            self
        }
    };
}

impl Compendium {
    pub fn new() -> Self {
        Self::default()
    }

    collection!(abilities, Ability, AbilityId, ability, add_ability);
    collection!(skills, SkillDefinition, SkillId, skill, add_skill);
    collection!(classes, CharacterClass, ClassId, class, add_class);
    collection!(races, Race, RaceId, race, add_race);
    collection!(backgrounds, Background, BackgroundId, background, add_background);
    collection!(items, Item, ItemId, item, add_item);
    collection!(spells, Spell, SpellId, spell, add_spell);
    collection!(
        status_effects,
        StatusEffect,
        StatusEffectId,
        status_effect,
        add_status_effect
    );

    /// Finds an ability by code or name prefix ("CON", "Constitution").
    pub fn ability_by_code(&self, code: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.matches(code))
    }

    /// Every skill definition, sorted by name.
    pub fn skills_by_name(&self) -> Vec<&SkillDefinition> {
        let mut skills: Vec<&SkillDefinition> = self.skills.iter().collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        skills
    }

    /// Looks up a class, failing with a not-found error.
    pub fn require_class(&self, id: ClassId) -> Result<&CharacterClass, DomainError> {
        self.class(id)
            .ok_or_else(|| DomainError::not_found("Class", id.to_string()))
    }

    /// Display name for an ability id, falling back to the id itself.
    pub fn ability_name(&self, id: AbilityId) -> String {
        self.ability(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
