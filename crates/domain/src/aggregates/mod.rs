//! Aggregates - entities with invariants enforced behind private fields

mod character_sheet;

pub use character_sheet::{
    AbilityAssignment, ActiveStatusEffect, CharacterSheet, CharacterSheetParts, ClassLevel,
    EquipmentItem, KnownSpell, SpellSlots,
};
