//! Skill definitions - the skills a character can be proficient in
//!
//! Definitions are reference data. Skill values are never stored; they are
//! derived per character from the governing ability (see `rules::skill`).

use serde::{Deserialize, Serialize};

use charsheet_domain::{AbilityId, SkillId};

/// A skill such as Athletics, governed by one ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    /// The ability this skill derives from. `None` when the ability was removed.
    pub base_ability: Option<AbilityId>,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, base_ability: AbilityId) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            base_ability: Some(base_ability),
        }
    }

    /// A skill whose governing ability is unknown.
    pub fn ungoverned(name: impl Into<String>) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            base_ability: None,
        }
    }
}
