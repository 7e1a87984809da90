//! Derived statistics DTOs
//!
//! Derived values are computed on read. A value that cannot be computed for a
//! character is sent as `unavailable` with a reason instead of a number.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A computed value, or the reason it could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DerivedValue<T> {
    Available { value: T },
    Unavailable { reason: String },
}

impl<T> DerivedValue<T> {
    pub fn available(value: T) -> Self {
        Self::Available { value }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The value, if it was computed
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for DerivedValue<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::available(value),
            Err(err) => Self::unavailable(err.to_string()),
        }
    }
}

/// The `derived` block attached to a character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStatsDto {
    pub level: u32,
    pub proficiency_bonus: i32,
    pub max_hp: DerivedValue<i32>,
    pub hit_dice: DerivedValue<Vec<HitDiceDto>>,
    pub skills: Vec<SkillDto>,
    pub saving_throws: Vec<SavingThrowDto>,
    pub spell_attack_modifier: DerivedValue<i32>,
    pub spell_save_dc: DerivedValue<i32>,
}

/// One row of the hit dice pool, e.g. `3d8`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDiceDto {
    pub class_id: Uuid,
    pub dice: String,
    pub sides: u32,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDto {
    pub id: Uuid,
    pub name: String,
    /// Short code of the governing ability ("DEX")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    pub proficient: bool,
    pub expertise: bool,
    pub value: DerivedValue<i32>,
    pub modifier: DerivedValue<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrowDto {
    pub ability_id: Uuid,
    pub ability: String,
    pub proficient: bool,
    pub value: DerivedValue<i32>,
}

/// Spell statistics for one explicitly chosen class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellStatsResponse {
    pub class_id: Uuid,
    pub attack_modifier: i32,
    pub save_dc: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_value_serializes_with_status_tag() {
        let value = DerivedValue::available(13);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"status": "available", "value": 13}));
    }

    #[test]
    fn error_becomes_unavailable_reason() {
        let value: DerivedValue<i32> = Err::<i32, _>("No spellcaster").into();
        assert_eq!(value.value(), None);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "unavailable", "reason": "No spellcaster"})
        );
    }
}
