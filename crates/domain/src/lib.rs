//! Character sheet domain
//!
//! Value objects, reference data, the character aggregate and the rules that
//! derive statistics from them. No I/O lives here.

extern crate self as charsheet_domain;

pub mod aggregates;
pub mod compendium;
pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use aggregates::{
    AbilityAssignment, ActiveStatusEffect, CharacterSheet, CharacterSheetParts, ClassLevel,
    EquipmentItem, KnownSpell, SpellSlots,
};
pub use compendium::Compendium;
pub use entities::{
    standard_abilities, Ability, Background, CharacterClass, Dice, Item, ItemType, Language, Race,
    Size, SkillDefinition, Spell, SpellComponents, SpellType, StatusEffect, TextAbility,
};
pub use error::{CalculationError, DomainError};
pub use ids::{
    AbilityId, BackgroundId, CharacterId, ClassId, DiceId, ItemId, ItemTypeId, LanguageId,
    RaceId, SizeId, SkillId, SpellId, SpellTypeId, StatusEffectId, TextAbilityId, UserId,
};
pub use rules::{
    proficiency_bonus, skill_value, AbilityModifier, DerivedStats, DerivedSummary, HitDiceEntry,
    SavingThrow, Skill,
};
pub use value_objects::{
    ability_modifier, AbilityScore, CharacterName, ClockTime, Duration, InvalidDurationError,
    SECONDS_PER_ROUND,
};
