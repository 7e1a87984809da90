//! Skill calculator
//!
//! A skill's value is the governing ability's raw score, raised by two for
//! proficiency and by two more for expertise. The modifier is read from that
//! effective value the same way an ability modifier is.

use serde::{Deserialize, Serialize};

use crate::error::CalculationError;
use crate::value_objects::{ability_modifier, AbilityScore};
use charsheet_domain::{AbilityId, SkillId};

/// Bonus added to the effective value by proficiency, and again by expertise.
pub const SKILL_TRAINING_BONUS: i32 = 2;

/// Effective value for a raw governing score and the two training flags.
///
/// Saturates at `i32::MAX` so every score the sheet accepts has a value.
pub fn skill_value(raw: i32, proficient: bool, expertise: bool) -> i32 {
    let mut value = raw;
    if proficient {
        value = value.saturating_add(SKILL_TRAINING_BONUS);
    }
    if expertise {
        value = value.saturating_add(SKILL_TRAINING_BONUS);
    }
    value
}

/// One skill as it applies to one character.
///
/// `base` is the character's score in the governing ability, or `None` when
/// the character has no assignment for it (or the skill has no governing
/// ability at all). A missing base is reported as an error, never as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub ability: Option<AbilityId>,
    /// Display name of the governing ability, used in error messages
    pub ability_name: Option<String>,
    pub base: Option<AbilityScore>,
    pub proficient: bool,
    pub expertise: bool,
}

impl Skill {
    /// Raw score plus the training bonuses.
    pub fn effective_value(&self) -> Result<i32, CalculationError> {
        let base = self.base.ok_or_else(|| self.missing_base())?;
        Ok(skill_value(base.raw(), self.proficient, self.expertise))
    }

    /// Modifier derived from [`Self::effective_value`].
    pub fn modifier(&self) -> Result<i32, CalculationError> {
        self.effective_value().map(ability_modifier)
    }

    fn missing_base(&self) -> CalculationError {
        match &self.ability_name {
            Some(ability) => CalculationError::missing_ability(ability.clone()),
            None => CalculationError::missing_ability(format!("base ability of {}", self.name)),
        }
    }
}
