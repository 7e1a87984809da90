//! Character rules - everything computed rather than stored

mod derived;
mod skill;

pub use derived::{
    proficiency_bonus, AbilityModifier, DerivedStats, DerivedSummary, HitDiceEntry, SavingThrow,
    CONSTITUTION, SPELL_SAVE_DC_BASE,
};
pub use skill::{skill_value, Skill, SKILL_TRAINING_BONUS};
