//! Charsheet Shared - wire types for character sheets
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod character_sheet;
pub mod derived;

pub use character_sheet::{
    AbilityScoreDto, BackgroundDto, CharacterSheetListItem, CharacterSheetResponse, ClassDto,
    ClassLevelDto, DiceDto, EquipmentItemDto, ItemDto, ItemTypeDto, KnownSpellDto, NamedDto,
    RaceDto, SpellDto, SpellSlotDto, StatusEffectDto, TextAbilityDto,
};
pub use derived::{
    DerivedStatsDto, DerivedValue, HitDiceDto, SavingThrowDto, SkillDto, SpellStatsResponse,
};
