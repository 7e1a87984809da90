//! Spell entity.
//!
//! Casting time and duration are round-based `Duration`s. Persistence stores
//! casting time as a round count and duration as `HH:MM:SS` text.

use serde::{Deserialize, Serialize};

use crate::value_objects::Duration;
use charsheet_domain::{SpellId, SpellTypeId};

/// School or category of magic (e.g., "Evocation").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellType {
    pub id: SpellTypeId,
    pub name: String,
}

impl SpellType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SpellTypeId::new(),
            name: name.into(),
        }
    }
}

/// Verbal, somatic and material components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellComponents {
    pub verbal: bool,
    pub somatic: bool,
    /// Description of the material component, if one is required
    pub material: Option<String>,
}

impl SpellComponents {
    /// Component letters as printed on a sheet, e.g. "V, S, M".
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.verbal {
            parts.push("V");
        }
        if self.somatic {
            parts.push("S");
        }
        if self.material.is_some() {
            parts.push("M");
        }
        parts.join(", ")
    }
}

/// A spell in the compendium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    /// Spell level, 0 for cantrips
    pub level: u8,
    pub casting_time: Duration,
    pub duration: Duration,
    pub components: SpellComponents,
    /// Range in feet
    pub range: u32,
    pub description: String,
    pub ritual: bool,
    pub spell_type: Option<SpellType>,
}

impl Spell {
    /// A one-round, instantaneous spell with no components set.
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            id: SpellId::new(),
            name: name.into(),
            level,
            casting_time: Duration::from_rounds(1),
            duration: Duration::default(),
            components: SpellComponents::default(),
            range: 0,
            description: String::new(),
            ritual: false,
            spell_type: None,
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_casting_time(mut self, casting_time: Duration) -> Self {
        self.casting_time = casting_time;
        self
    }

    pub fn with_components(mut self, components: SpellComponents) -> Self {
        self.components = components;
        self
    }

    pub fn with_type(mut self, spell_type: SpellType) -> Self {
        self.spell_type = Some(spell_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_summary() {
        let components = SpellComponents {
            verbal: true,
            somatic: false,
            material: Some("a pinch of sulfur".into()),
        };
        assert_eq!(components.summary(), "V, M");
        assert_eq!(SpellComponents::default().summary(), "");
    }

    #[test]
    fn cantrip_is_level_zero() {
        assert!(Spell::new("Fire Bolt", 0).is_cantrip());
        assert!(!Spell::new("Shield", 1).is_cantrip());
    }
}
