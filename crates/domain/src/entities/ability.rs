//! Ability entity - the named ability scores of the ruleset (Strength, Dexterity, ...)

use serde::{Deserialize, Serialize};

use charsheet_domain::AbilityId;

/// A basic ability such as Strength or Charisma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
}

impl Ability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AbilityId::new(),
            name: name.into(),
        }
    }

    /// Three-letter uppercase code, e.g. "STR" for Strength.
    pub fn short(&self) -> String {
        self.name.chars().take(3).collect::<String>().to_uppercase()
    }

    /// Whether this ability is the one named by `code`.
    ///
    /// Matches case-insensitively on the name prefix, so "CON", "con" and
    /// "Constitution" all select Constitution.
    pub fn matches(&self, code: &str) -> bool {
        !code.is_empty() && self.name.to_lowercase().starts_with(&code.to_lowercase())
    }
}

/// The six standard abilities, in sheet order.
pub fn standard_abilities() -> Vec<Ability> {
    [
        "Strength",
        "Dexterity",
        "Constitution",
        "Intelligence",
        "Wisdom",
        "Charisma",
    ]
    .into_iter()
    .map(Ability::new)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_code() {
        assert_eq!(Ability::new("Constitution").short(), "CON");
        assert_eq!(Ability::new("Wisdom").short(), "WIS");
    }

    #[test]
    fn matches_by_prefix() {
        let con = Ability::new("Constitution");
        assert!(con.matches("CON"));
        assert!(con.matches("con"));
        assert!(con.matches("Constitution"));
        assert!(!con.matches("CHA"));
        assert!(!con.matches(""));
    }

    #[test]
    fn standard_set_has_unique_codes() {
        let codes: Vec<String> = standard_abilities().iter().map(Ability::short).collect();
        assert_eq!(codes, ["STR", "DEX", "CON", "INT", "WIS", "CHA"]);
    }
}
