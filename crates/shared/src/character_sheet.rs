//! Character sheet DTOs
//!
//! The nested representation of a character: reference data is inlined
//! (race with its size and languages, equipment with its item and item type)
//! so a client can render the sheet without further lookups.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::derived::DerivedStatsDto;

/// Full character sheet as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<RaceDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundDto>,
    pub current_hp: i32,
    pub temp_hp: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_hp_reason: Option<String>,
    pub inspiration: bool,
    pub skill_proficiencies: Vec<Uuid>,
    pub skill_expertise: Vec<Uuid>,
    pub abilities: Vec<AbilityScoreDto>,
    pub classes: Vec<ClassLevelDto>,
    pub equipment: Vec<EquipmentItemDto>,
    pub spells: Vec<KnownSpellDto>,
    pub spell_slots: Vec<SpellSlotDto>,
    pub status_effects: Vec<StatusEffectDto>,
    pub derived: DerivedStatsDto,
}

/// Row in a character list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetListItem {
    pub id: Uuid,
    pub name: String,
    pub level: u32,
}

/// Any reference entity that is only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAbilityDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDto {
    pub id: Uuid,
    pub name: String,
    pub speed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NamedDto>,
    pub languages: Vec<NamedDto>,
    pub abilities: Vec<TextAbilityDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDto {
    pub id: Uuid,
    pub name: String,
    pub feature: String,
}

/// An assigned ability score with its modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScoreDto {
    pub ability_id: Uuid,
    pub name: String,
    /// Three-letter code ("STR")
    pub short: String,
    pub value: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceDto {
    pub id: Uuid,
    pub name: String,
    pub sides: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<DiceDto>,
    pub saving_throw_proficiencies: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spellcasting_ability: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevelDto {
    pub class: ClassDto,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeDto {
    pub id: Uuid,
    pub name: String,
    pub equipable_attack: bool,
    pub equipable_defense: bool,
    pub consumable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemTypeDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItemDto {
    pub item: ItemDto,
    pub quantity: u32,
    pub equipped: bool,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDto {
    pub id: Uuid,
    pub name: String,
    pub level: u8,
    pub casting_time_rounds: u32,
    /// Wall-clock duration, `HH:MM:SS`
    pub duration: String,
    /// Component letters, e.g. "V, S, M"
    pub components: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    pub range: u32,
    pub description: String,
    pub ritual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_type: Option<NamedDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpellDto {
    pub spell: SpellDto,
    pub prepared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlotDto {
    pub level: u8,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffectDto {
    pub effect: NamedDto,
    pub remaining_rounds: u32,
    /// Remaining time, `HH:MM:SS`
    pub remaining: String,
}
