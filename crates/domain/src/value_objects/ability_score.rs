//! Ability score value object - a raw score and the modifier derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Modifier for a raw ability score: `floor((score - 10) / 2)`.
///
/// Rust's `/` rounds toward zero, so 9 would give 0 instead of -1.
/// `div_euclid` with a positive divisor is floor division. Computed in i64 so
/// every `i32` score has a modifier; the halved result always fits in i32.
pub fn ability_modifier(score: i32) -> i32 {
    ((i64::from(score) - 10).div_euclid(2)) as i32
}

/// A raw ability score such as Strength 14.
///
/// Any integer is accepted; plausible ranges (1-30) are checked by callers
/// that accept user input. Stored as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScore(i32);

impl AbilityScore {
    /// Lowest score the rules allow for user-entered values.
    pub const MIN: i32 = 1;
    /// Highest score the rules allow for user-entered values.
    pub const MAX: i32 = 30;

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw score.
    pub const fn raw(&self) -> i32 {
        self.0
    }

    /// The derived modifier.
    pub fn modifier(&self) -> i32 {
        ability_modifier(self.0)
    }

    /// Whether the raw score lies within [`Self::MIN`, `Self::MAX`].
    pub fn is_within_rules(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl From<i32> for AbilityScore {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<AbilityScore> for i32 {
    fn from(score: AbilityScore) -> Self {
        score.0
    }
}

impl fmt::Display for AbilityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+})", self.0, self.modifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_spot_values() {
        assert_eq!(AbilityScore::new(10).modifier(), 0);
        assert_eq!(AbilityScore::new(11).modifier(), 0);
        assert_eq!(AbilityScore::new(12).modifier(), 1);
        assert_eq!(AbilityScore::new(9).modifier(), -1);
        assert_eq!(AbilityScore::new(8).modifier(), -1);
        assert_eq!(AbilityScore::new(1).modifier(), -5);
        assert_eq!(AbilityScore::new(30).modifier(), 10);
    }

    #[test]
    fn modifier_floors_below_zero() {
        assert_eq!(ability_modifier(0), -5);
        assert_eq!(ability_modifier(-1), -6);
    }

    #[test]
    fn modifier_defined_for_extreme_scores() {
        assert_eq!(ability_modifier(i32::MIN), -1_073_741_829);
        assert_eq!(ability_modifier(i32::MAX), 1_073_741_818);
        assert_eq!(AbilityScore::new(i32::MIN + 1).modifier(), -1_073_741_829);
    }

    #[test]
    fn rules_range() {
        assert!(AbilityScore::new(1).is_within_rules());
        assert!(AbilityScore::new(30).is_within_rules());
        assert!(!AbilityScore::new(0).is_within_rules());
        assert!(!AbilityScore::new(31).is_within_rules());
    }

    #[test]
    fn displays_signed_modifier() {
        assert_eq!(AbilityScore::new(14).to_string(), "14 (+2)");
        assert_eq!(AbilityScore::new(7).to_string(), "7 (-2)");
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&AbilityScore::new(15)).unwrap();
        assert_eq!(json, "15");
        let back: AbilityScore = serde_json::from_str("8").unwrap();
        assert_eq!(back, AbilityScore::new(8));
    }
}
