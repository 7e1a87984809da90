//! JSON exporter for character sheets
//!
//! Exports a sheet with its reference data resolved and its derived
//! statistics attached, in the same shape the presentation layer serves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use charsheet_domain::CharacterId;
use charsheet_shared::CharacterSheetResponse;

use crate::infrastructure::ports::ClockPort;
use crate::presentation::present_sheet;
use crate::use_cases::CharacterSheetUseCases;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// A single exported character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub metadata: SnapshotMetadata,
    pub character: CharacterSheetResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: String,
    pub exported_at: String,
    pub engine_version: String,
}

/// JSON exporter for character snapshots
pub struct JsonExporter {
    use_cases: Arc<CharacterSheetUseCases>,
    clock: Arc<dyn ClockPort>,
}

impl JsonExporter {
    pub fn new(use_cases: Arc<CharacterSheetUseCases>, clock: Arc<dyn ClockPort>) -> Self {
        Self { use_cases, clock }
    }

    /// Build the snapshot for one character.
    pub async fn export_character(&self, character_id: CharacterId) -> Result<CharacterSnapshot> {
        let view = self
            .use_cases
            .get_sheet(character_id)
            .await
            .with_context(|| format!("Failed to load character {}", character_id))?;

        Ok(CharacterSnapshot {
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION.to_string(),
                exported_at: self.clock.now().to_rfc3339(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            character: present_sheet(&view),
        })
    }

    /// Export a character to pretty-printed JSON.
    pub async fn export_to_json(&self, character_id: CharacterId) -> Result<String> {
        let snapshot = self.export_character(character_id).await?;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Export a character to minified JSON.
    pub async fn export_to_json_compressed(&self, character_id: CharacterId) -> Result<String> {
        let snapshot = self.export_character(character_id).await?;
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Write `<dir>/<character id>.json`, creating `dir` if needed.
    pub async fn export_to_dir(&self, character_id: CharacterId, dir: &Path) -> Result<PathBuf> {
        let json = self.export_to_json(character_id).await?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

        let path = dir.join(format!("{}.json", character_id));
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(
            character_id = %character_id,
            path = %path.display(),
            "Exported character sheet"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterSheetRepo, MockClockPort, MockReferenceRepo};
    use chrono::{TimeZone, Utc};
    use charsheet_domain::{
        standard_abilities, CharacterClass, CharacterName, CharacterSheet, Compendium, Dice,
        UserId,
    };

    fn exporter(sheet: Option<CharacterSheet>, compendium: Compendium) -> JsonExporter {
        let mut sheets = MockCharacterSheetRepo::new();
        sheets
            .expect_get()
            .returning(move |_| Ok(sheet.clone()));
        let mut reference = MockReferenceRepo::new();
        reference
            .expect_load_compendium()
            .returning(move || Ok(compendium.clone()));
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let use_cases = CharacterSheetUseCases::new(Arc::new(sheets), Arc::new(reference));
        JsonExporter::new(Arc::new(use_cases), Arc::new(clock))
    }

    fn fighter() -> (CharacterSheet, Compendium) {
        let mut compendium = Compendium::new();
        for ability in standard_abilities() {
            compendium.add_ability(ability);
        }
        let con = compendium.ability_by_code("CON").unwrap().id;
        let fighter = CharacterClass::new("Fighter", Dice::d(10));

        let mut sheet = CharacterSheet::new(UserId::new(), CharacterName::new("Tordek").unwrap());
        sheet.set_ability_score(con, 14);
        sheet.add_class_level(fighter.id, 5).unwrap();
        compendium.add_class(fighter);
        (sheet, compendium)
    }

    #[tokio::test]
    async fn snapshot_carries_metadata_and_derived_block() {
        let (sheet, compendium) = fighter();
        let id = sheet.id();
        let json = exporter(Some(sheet), compendium)
            .export_to_json(id)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["version"], "1.0");
        assert_eq!(value["metadata"]["exported_at"], "2024-03-01T12:00:00+00:00");
        assert_eq!(value["character"]["name"], "Tordek");
        assert_eq!(
            value["character"]["derived"]["maxHp"],
            serde_json::json!({"status": "available", "value": 42})
        );
        assert_eq!(value["character"]["derived"]["proficiencyBonus"], 3);
    }

    #[tokio::test]
    async fn missing_character_is_an_error() {
        let (_, compendium) = fighter();
        let err = exporter(None, compendium)
            .export_to_json_compressed(CharacterId::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load character"));
    }

    #[tokio::test]
    async fn writes_file_named_after_character() {
        let (sheet, compendium) = fighter();
        let id = sheet.id();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");

        let path = exporter(Some(sheet), compendium)
            .export_to_dir(id, &out)
            .await
            .unwrap();

        assert_eq!(path, out.join(format!("{}.json", id)));
        let written = std::fs::read_to_string(path).unwrap();
        let snapshot: CharacterSnapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(snapshot.character.id, id.to_uuid());
    }
}
