//! Dice entity - hit dice used for hit point calculation

use serde::{Deserialize, Serialize};

use charsheet_domain::DiceId;

/// A die type such as "d8".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dice {
    pub id: DiceId,
    pub name: String,
    pub sides: u32,
}

impl Dice {
    pub fn new(name: impl Into<String>, sides: u32) -> Self {
        Self {
            id: DiceId::new(),
            name: name.into(),
            sides,
        }
    }

    /// A die named after its side count ("d6", "d10", ...).
    pub fn d(sides: u32) -> Self {
        Self::new(format!("d{}", sides), sides)
    }

    /// Average roll, `(1 + sides) / 2`. A d8 averages 4.5.
    pub fn avg_roll(&self) -> f64 {
        (1.0 + f64::from(self.sides)) / 2.0
    }

    /// Average roll in half points, `1 + sides`, for exact integer arithmetic.
    pub fn avg_roll_halves(&self) -> i64 {
        1 + i64::from(self.sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rolls() {
        assert_eq!(Dice::d(8).avg_roll(), 4.5);
        assert_eq!(Dice::d(6).avg_roll(), 3.5);
        assert_eq!(Dice::d(12).avg_roll_halves(), 13);
    }

    #[test]
    fn named_after_sides() {
        assert_eq!(Dice::d(10).name, "d10");
    }
}
