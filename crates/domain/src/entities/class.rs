//! Character class entity - hit dice, saving throws and spellcasting

use serde::{Deserialize, Serialize};

use super::Dice;
use charsheet_domain::{AbilityId, ClassId};

/// A character class such as Fighter or Wizard.
///
/// # Simple Data Struct
///
/// All fields are public; any combination is valid reference data. A class
/// without hit dice can be stored, but hit point calculation rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClass {
    pub id: ClassId,
    pub name: String,
    pub hit_dice: Option<Dice>,
    /// Abilities whose saving throws this class is proficient in
    #[serde(default)]
    pub saving_throw_proficiencies: Vec<AbilityId>,
    /// Ability used to power spells. `None` for non-casters.
    pub spellcasting_ability: Option<AbilityId>,
}

impl CharacterClass {
    pub fn new(name: impl Into<String>, hit_dice: Dice) -> Self {
        Self {
            id: ClassId::new(),
            name: name.into(),
            hit_dice: Some(hit_dice),
            saving_throw_proficiencies: Vec::new(),
            spellcasting_ability: None,
        }
    }

    pub fn with_spellcasting_ability(mut self, ability: AbilityId) -> Self {
        self.spellcasting_ability = Some(ability);
        self
    }

    pub fn with_saving_throws(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.saving_throw_proficiencies = abilities.into_iter().collect();
        self
    }

    /// Hit points at first level before the Constitution modifier.
    pub fn start_hp(&self) -> Option<u32> {
        self.hit_dice.as_ref().map(|d| d.sides)
    }

    pub fn is_spellcaster(&self) -> bool {
        self.spellcasting_ability.is_some()
    }

    pub fn has_saving_throw(&self, ability: AbilityId) -> bool {
        self.saving_throw_proficiencies.contains(&ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_hp_is_die_size() {
        let fighter = CharacterClass::new("Fighter", Dice::d(10));
        assert_eq!(fighter.start_hp(), Some(10));
        assert!(!fighter.is_spellcaster());
    }

    #[test]
    fn spellcaster_flag_follows_ability() {
        let int = AbilityId::new();
        let wizard = CharacterClass::new("Wizard", Dice::d(6)).with_spellcasting_ability(int);
        assert!(wizard.is_spellcaster());
        assert_eq!(wizard.spellcasting_ability, Some(int));
    }
}
