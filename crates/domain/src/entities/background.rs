//! Background entity

use serde::{Deserialize, Serialize};

use charsheet_domain::BackgroundId;

/// A character background such as Acolyte, with its feature text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub id: BackgroundId,
    pub name: String,
    pub feature: String,
}

impl Background {
    pub fn new(name: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            id: BackgroundId::new(),
            name: name.into(),
            feature: feature.into(),
        }
    }
}
