//! Status effect entity (Poisoned, Blinded, ...)

use serde::{Deserialize, Serialize};

use charsheet_domain::StatusEffectId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub id: StatusEffectId,
    pub name: String,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StatusEffectId::new(),
            name: name.into(),
        }
    }
}
