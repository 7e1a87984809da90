//! Race entity and the reference data it is assembled from

use serde::{Deserialize, Serialize};

use charsheet_domain::{LanguageId, RaceId, SizeId, TextAbilityId};

/// A spoken or written language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LanguageId::new(),
            name: name.into(),
        }
    }
}

/// A creature size category (Small, Medium, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: SizeId,
    pub name: String,
}

impl Size {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SizeId::new(),
            name: name.into(),
        }
    }
}

/// A descriptive trait or feature with rules text, e.g. "Darkvision".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAbility {
    pub id: TextAbilityId,
    pub name: String,
    pub description: String,
}

impl TextAbility {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: TextAbilityId::new(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A playable race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    /// Walking speed in feet
    pub speed: u32,
    #[serde(default)]
    pub abilities: Vec<TextAbility>,
    #[serde(default)]
    pub languages: Vec<Language>,
    pub size: Option<Size>,
}

impl Race {
    pub fn new(name: impl Into<String>, speed: u32) -> Self {
        Self {
            id: RaceId::new(),
            name: name.into(),
            speed,
            abilities: Vec::new(),
            languages: Vec::new(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.languages.push(language);
        self
    }

    pub fn with_ability(mut self, ability: TextAbility) -> Self {
        self.abilities.push(ability);
        self
    }
}
