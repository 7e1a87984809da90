//! Domain entities - reference data with identity

mod ability;
mod background;
mod class;
mod dice;
mod item;
mod race;
mod skill;
mod spell;
mod status_effect;

pub use ability::{standard_abilities, Ability};
pub use background::Background;
pub use class::CharacterClass;
pub use dice::Dice;
pub use item::{Item, ItemType};
pub use race::{Language, Race, Size, TextAbility};
pub use skill::SkillDefinition;
pub use spell::{Spell, SpellComponents, SpellType};
pub use status_effect::StatusEffect;
