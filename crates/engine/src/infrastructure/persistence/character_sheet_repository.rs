//! SQLite character sheet repository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::codec::{column, i32_column, id_column, optional_id_column, u32_column, u8_column};
use crate::infrastructure::ports::{CharacterSheetRepo, ClockPort, RepoError};
use charsheet_domain::{
    AbilityAssignment, ActiveStatusEffect, CharacterId, CharacterName, CharacterSheet,
    CharacterSheetParts, ClassLevel, Duration, EquipmentItem, KnownSpell, SpellSlots, UserId,
};

const PROFICIENCY: &str = "proficiency";
const EXPERTISE: &str = "expertise";

/// Tables holding rows owned by a character, cleared and rewritten on save.
const CHILD_TABLES: &[&str] = &[
    "character_skills",
    "character_abilities",
    "character_classes",
    "character_equipment",
    "character_spells",
    "character_spell_slots",
    "character_status_effects",
];

/// Repository for character sheets.
pub struct SqliteCharacterSheetRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteCharacterSheetRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }

    async fn load(&self, row: &SqliteRow) -> Result<CharacterSheet, RepoError> {
        let id: CharacterId = id_column(row, "id")?;
        let key = id.to_string();
        let name: String = column(row, "name")?;

        let mut skill_proficiencies = Vec::new();
        let mut skill_expertise = Vec::new();
        for skill in self.child_rows("character_skills", &key, "skill_id").await? {
            let kind: String = column(&skill, "kind")?;
            let skill_id = id_column(&skill, "skill_id")?;
            match kind.as_str() {
                PROFICIENCY => skill_proficiencies.push(skill_id),
                EXPERTISE => skill_expertise.push(skill_id),
                other => {
                    return Err(RepoError::serialization(format!(
                        "Unknown skill kind '{}' for character {}",
                        other, id
                    )))
                }
            }
        }

        let abilities = self
            .child_rows("character_abilities", &key, "position")
            .await?
            .iter()
            .map(|r| {
                Ok(AbilityAssignment::new(
                    id_column(r, "ability_id")?,
                    i32_column(r, "value")?,
                ))
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let class_levels = self
            .child_rows("character_classes", &key, "position")
            .await?
            .iter()
            .map(|r| {
                ClassLevel::new(id_column(r, "class_id")?, u32_column(r, "level")?)
                    .map_err(RepoError::serialization)
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let equipment = self
            .child_rows("character_equipment", &key, "position")
            .await?
            .iter()
            .map(|r| {
                Ok(EquipmentItem {
                    item: id_column(r, "item_id")?,
                    quantity: u32_column(r, "quantity")?,
                    equipped: column(r, "equipped")?,
                    additional_info: column(r, "additional_info")?,
                })
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let spells = self
            .child_rows("character_spells", &key, "position")
            .await?
            .iter()
            .map(|r| {
                Ok(KnownSpell {
                    spell: id_column(r, "spell_id")?,
                    prepared: column(r, "prepared")?,
                })
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let spell_slots = self
            .child_rows("character_spell_slots", &key, "level")
            .await?
            .iter()
            .map(|r| {
                Ok(SpellSlots {
                    level: u8_column(r, "level")?,
                    quantity: u32_column(r, "quantity")?,
                })
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let status_effects = self
            .child_rows("character_status_effects", &key, "position")
            .await?
            .iter()
            .map(|r| {
                Ok(ActiveStatusEffect {
                    effect: id_column(r, "status_effect_id")?,
                    remaining: Duration::from_rounds(u32_column(r, "remaining_rounds")?),
                })
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        let parts = CharacterSheetParts {
            id,
            owner: id_column(row, "owner_id")?,
            name: CharacterName::new(name).map_err(RepoError::serialization)?,
            race: optional_id_column(row, "race_id")?,
            background: optional_id_column(row, "background_id")?,
            current_hp: i32_column(row, "current_hp")?,
            temp_hp: i32_column(row, "temp_hp")?,
            temp_hp_reason: column(row, "temp_hp_reason")?,
            inspiration: column(row, "inspiration")?,
            skill_proficiencies,
            skill_expertise,
            abilities,
            class_levels,
            equipment,
            spells,
            spell_slots,
            status_effects,
        };

        CharacterSheet::from_parts(parts).map_err(RepoError::serialization)
    }

    async fn child_rows(
        &self,
        table: &'static str,
        character_id: &str,
        order_by: &'static str,
    ) -> Result<Vec<SqliteRow>, RepoError> {
        // table and order_by are compile-time constants, never user input
        let sql = format!(
            "SELECT * FROM {} WHERE character_id = ? ORDER BY {}",
            table, order_by
        );
        sqlx::query(&sql)
            .bind(character_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_character_sheet", e))
    }

    async fn write_children(
        tx: &mut Transaction<'_, Sqlite>,
        sheet: &CharacterSheet,
    ) -> Result<(), RepoError> {
        let key = sheet.id().to_string();
        let db = |e: sqlx::Error| RepoError::database("save_character_sheet", e);

        for table in CHILD_TABLES {
            sqlx::query(&format!("DELETE FROM {} WHERE character_id = ?", table))
                .bind(&key)
                .execute(&mut **tx)
                .await
                .map_err(db)?;
        }

        let skills = sheet
            .skill_proficiencies()
            .iter()
            .map(|s| (s, PROFICIENCY))
            .chain(sheet.skill_expertise().iter().map(|s| (s, EXPERTISE)));
        for (skill, kind) in skills {
            sqlx::query(
                "INSERT INTO character_skills (character_id, skill_id, kind) VALUES (?, ?, ?)",
            )
            .bind(&key)
            .bind(skill.to_string())
            .bind(kind)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for (position, assignment) in sheet.abilities().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO character_abilities (character_id, ability_id, value, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(assignment.ability.to_string())
            .bind(i64::from(assignment.score.raw()))
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for (position, entry) in sheet.class_levels().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO character_classes (character_id, class_id, level, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(entry.class().to_string())
            .bind(i64::from(entry.level()))
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for (position, entry) in sheet.equipment().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO character_equipment
                    (character_id, item_id, quantity, equipped, additional_info, position)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(entry.item.to_string())
            .bind(i64::from(entry.quantity))
            .bind(entry.equipped)
            .bind(&entry.additional_info)
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for (position, known) in sheet.spells().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO character_spells (character_id, spell_id, prepared, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(known.spell.to_string())
            .bind(known.prepared)
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for slots in sheet.spell_slots() {
            sqlx::query(
                "INSERT INTO character_spell_slots (character_id, level, quantity) VALUES (?, ?, ?)",
            )
            .bind(&key)
            .bind(i64::from(slots.level))
            .bind(i64::from(slots.quantity))
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        for (position, active) in sheet.status_effects().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO character_status_effects
                    (character_id, status_effect_id, remaining_rounds, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(active.effect.to_string())
            .bind(i64::from(active.remaining.rounds()))
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(db)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CharacterSheetRepo for SqliteCharacterSheetRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>, RepoError> {
        let row = sqlx::query("SELECT * FROM character_sheets WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_character_sheet", e))?;

        match row {
            Some(row) => Ok(Some(self.load(&row).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, sheet: &CharacterSheet) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();
        let db = |e: sqlx::Error| RepoError::database("save_character_sheet", e);

        let mut tx = self.pool.begin().await.map_err(db)?;

        sqlx::query(
            r#"
            INSERT INTO character_sheets (
                id, owner_id, name, race_id, background_id,
                current_hp, temp_hp, temp_hp_reason, inspiration, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                name = excluded.name,
                race_id = excluded.race_id,
                background_id = excluded.background_id,
                current_hp = excluded.current_hp,
                temp_hp = excluded.temp_hp,
                temp_hp_reason = excluded.temp_hp_reason,
                inspiration = excluded.inspiration,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(sheet.id().to_string())
        .bind(sheet.owner().to_string())
        .bind(sheet.name().as_str())
        .bind(sheet.race().map(|id| id.to_string()))
        .bind(sheet.background().map(|id| id.to_string()))
        .bind(i64::from(sheet.current_hp()))
        .bind(i64::from(sheet.temp_hp()))
        .bind(sheet.temp_hp_reason())
        .bind(sheet.inspiration())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        Self::write_children(&mut tx, sheet).await?;
        tx.commit().await.map_err(db)?;

        tracing::debug!(character_id = %sheet.id(), "Saved character sheet");
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM character_sheets WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_character_sheet", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("CharacterSheet", id));
        }
        Ok(())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<CharacterSheet>, RepoError> {
        let rows = sqlx::query("SELECT * FROM character_sheets WHERE owner_id = ? ORDER BY name")
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_character_sheets", e))?;

        let mut sheets = Vec::with_capacity(rows.len());
        for row in &rows {
            sheets.push(self.load(row).await?);
        }
        Ok(sheets)
    }
}
