//! Repository port traits.

use async_trait::async_trait;

use super::RepoError;
use charsheet_domain::{
    Ability, Background, CharacterClass, CharacterId, CharacterSheet, Compendium, Item, Race,
    SkillDefinition, Spell, StatusEffect, UserId,
};

// =============================================================================
// Character Sheets
// =============================================================================

/// Storage for character sheets and all rows owned by them.
///
/// `save` replaces the stored sheet as a whole, including its ability scores,
/// class levels, equipment, spells, spell slots and status effects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterSheetRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>, RepoError>;
    async fn save(&self, sheet: &CharacterSheet) -> Result<(), RepoError>;
    /// Fails with `NotFound` when no sheet has this id.
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<CharacterSheet>, RepoError>;
}

// =============================================================================
// Reference Data
// =============================================================================

/// Storage for the reference data characters point at.
///
/// Each `save_*` upserts by id. Nested reference data (a class's hit dice, a
/// race's size and languages, an item's type, a spell's type) is saved along
/// with its owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepo: Send + Sync {
    /// Load every reference entity into one compendium.
    async fn load_compendium(&self) -> Result<Compendium, RepoError>;

    async fn save_ability(&self, ability: &Ability) -> Result<(), RepoError>;
    async fn save_skill(&self, skill: &SkillDefinition) -> Result<(), RepoError>;
    async fn save_class(&self, class: &CharacterClass) -> Result<(), RepoError>;
    async fn save_race(&self, race: &Race) -> Result<(), RepoError>;
    async fn save_background(&self, background: &Background) -> Result<(), RepoError>;
    async fn save_item(&self, item: &Item) -> Result<(), RepoError>;
    async fn save_spell(&self, spell: &Spell) -> Result<(), RepoError>;
    async fn save_status_effect(&self, effect: &StatusEffect) -> Result<(), RepoError>;
}
