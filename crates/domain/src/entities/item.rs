//! Item entity - equipment that characters can carry
//!
//! Possession is not part of the item. A character's equipment list holds
//! `EquipmentItem` rows (quantity, equipped flag) that point at items here.

use serde::{Deserialize, Serialize};

use charsheet_domain::{ItemId, ItemTypeId};

/// Category of item, controlling where it can be equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: String,
    /// Can be wielded for attacks (weapons)
    pub equipable_attack: bool,
    /// Can be worn for defense (armor, shields)
    pub equipable_defense: bool,
    /// Used up on use (potions, ammunition)
    pub consumable: bool,
}

impl ItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemTypeId::new(),
            name: name.into(),
            equipable_attack: false,
            equipable_defense: false,
            consumable: false,
        }
    }

    pub fn weapon(name: impl Into<String>) -> Self {
        Self {
            equipable_attack: true,
            ..Self::new(name)
        }
    }

    pub fn armor(name: impl Into<String>) -> Self {
        Self {
            equipable_defense: true,
            ..Self::new(name)
        }
    }

    pub fn consumable(name: impl Into<String>) -> Self {
        Self {
            consumable: true,
            ..Self::new(name)
        }
    }

    /// Whether items of this type can be marked as equipped.
    pub fn is_equipable(&self) -> bool {
        self.equipable_attack || self.equipable_defense
    }
}

/// An item in the compendium.
///
/// # Simple Data Struct
///
/// No invariants to protect; all fields are public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub item_type: Option<ItemType>,
    /// Price in copper pieces
    pub price: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            item_type: None,
            price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn is_equipable(&self) -> bool {
        self.item_type.as_ref().is_some_and(ItemType::is_equipable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipability_follows_type() {
        assert!(Item::new("Longsword", 1500)
            .with_type(ItemType::weapon("Martial weapon"))
            .is_equipable());
        assert!(Item::new("Chain mail", 7500)
            .with_type(ItemType::armor("Heavy armor"))
            .is_equipable());
        assert!(!Item::new("Potion of healing", 5000)
            .with_type(ItemType::consumable("Potion"))
            .is_equipable());
        assert!(!Item::new("Rope", 100).is_equipable());
    }
}
