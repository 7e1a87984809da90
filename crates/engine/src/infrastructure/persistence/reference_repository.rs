//! SQLite reference data repository
//!
//! Reference data is small and read as a whole: `load_compendium` reads every
//! table once and assembles the nested entities in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::codec::{
    column, duration_from_text, duration_to_text, id_column, optional_id_column, u32_column,
    u8_column,
};
use crate::infrastructure::ports::{ReferenceRepo, RepoError};
use charsheet_domain::{
    Ability, AbilityId, Background, CharacterClass, ClassId, Compendium, Dice, DiceId, Item,
    ItemType, ItemTypeId, Language, LanguageId, Race, RaceId, Size, SizeId, SkillDefinition,
    Spell, SpellComponents, SpellType, SpellTypeId, StatusEffect, TextAbility, TextAbilityId,
};

/// Repository for abilities, skills, classes and the rest of the compendium.
pub struct SqliteReferenceRepo {
    pool: SqlitePool,
}

impl SqliteReferenceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str) -> Result<Vec<SqliteRow>, RepoError> {
        sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_compendium", e))
    }

    async fn begin(&self, operation: &'static str) -> Result<Transaction<'static, Sqlite>, RepoError> {
        self.pool
            .begin()
            .await
            .map_err(|e| RepoError::database(operation, e))
    }

    /// Rows of a table that only has `id` and `name`, keyed by id.
    async fn named<K>(&self, table: &'static str) -> Result<HashMap<K, String>, RepoError>
    where
        K: std::str::FromStr + std::hash::Hash + Eq,
        K::Err: std::fmt::Display,
    {
        self.fetch(&format!("SELECT id, name FROM {}", table))
            .await?
            .iter()
            .map(|r| Ok((id_column(r, "id")?, column(r, "name")?)))
            .collect()
    }
}

/// Upsert into a table that only has `id` and `name`.
async fn upsert_named(
    conn: &mut SqliteConnection,
    table: &'static str,
    id: String,
    name: &str,
    operation: &'static str,
) -> Result<(), RepoError> {
    sqlx::query(&format!(
        "INSERT INTO {} (id, name) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        table
    ))
    .bind(id)
    .bind(name)
    .execute(conn)
    .await
    .map_err(|e| RepoError::database(operation, e))?;
    Ok(())
}

fn missing(owner: &str, entity_type: &str, id: impl std::fmt::Display) -> RepoError {
    RepoError::serialization(format!(
        "{} references missing {} {}",
        owner, entity_type, id
    ))
}

#[async_trait]
impl ReferenceRepo for SqliteReferenceRepo {
    async fn load_compendium(&self) -> Result<Compendium, RepoError> {
        let mut compendium = Compendium::new();

        for r in self.fetch("SELECT * FROM abilities ORDER BY position").await? {
            compendium.add_ability(Ability {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
            });
        }

        for r in self.fetch("SELECT * FROM skills ORDER BY name").await? {
            compendium.add_skill(SkillDefinition {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
                base_ability: optional_id_column(&r, "base_ability_id")?,
            });
        }

        // --- classes --------------------------------------------------------
        let mut dice: HashMap<DiceId, Dice> = HashMap::new();
        for r in self.fetch("SELECT * FROM dice").await? {
            let die = Dice {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
                sides: u32_column(&r, "sides")?,
            };
            dice.insert(die.id, die);
        }

        let mut saving_throws: HashMap<ClassId, Vec<AbilityId>> = HashMap::new();
        for r in self
            .fetch("SELECT * FROM class_saving_throws ORDER BY ability_id")
            .await?
        {
            saving_throws
                .entry(id_column(&r, "class_id")?)
                .or_default()
                .push(id_column(&r, "ability_id")?);
        }

        for r in self.fetch("SELECT * FROM classes ORDER BY name").await? {
            let id: ClassId = id_column(&r, "id")?;
            let name: String = column(&r, "name")?;
            let hit_dice = match optional_id_column::<DiceId>(&r, "hit_dice_id")? {
                Some(dice_id) => Some(
                    dice.get(&dice_id)
                        .cloned()
                        .ok_or_else(|| missing(&name, "dice", dice_id))?,
                ),
                None => None,
            };
            compendium.add_class(CharacterClass {
                id,
                name,
                hit_dice,
                saving_throw_proficiencies: saving_throws.remove(&id).unwrap_or_default(),
                spellcasting_ability: optional_id_column(&r, "spellcasting_ability_id")?,
            });
        }

        // --- races ----------------------------------------------------------
        let languages: HashMap<LanguageId, String> = self.named("languages").await?;
        let sizes: HashMap<SizeId, String> = self.named("sizes").await?;
        let mut text_abilities: HashMap<TextAbilityId, TextAbility> = HashMap::new();
        for r in self.fetch("SELECT * FROM text_abilities").await? {
            let ability = TextAbility {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
                description: column(&r, "description")?,
            };
            text_abilities.insert(ability.id, ability);
        }

        let mut race_languages: HashMap<RaceId, Vec<Language>> = HashMap::new();
        for r in self
            .fetch("SELECT * FROM race_languages ORDER BY position")
            .await?
        {
            let race_id: RaceId = id_column(&r, "race_id")?;
            let language_id: LanguageId = id_column(&r, "language_id")?;
            let name = languages
                .get(&language_id)
                .cloned()
                .ok_or_else(|| missing(&format!("Race {}", race_id), "language", language_id))?;
            race_languages.entry(race_id).or_default().push(Language {
                id: language_id,
                name,
            });
        }

        let mut race_abilities: HashMap<RaceId, Vec<TextAbility>> = HashMap::new();
        for r in self
            .fetch("SELECT * FROM race_text_abilities ORDER BY position")
            .await?
        {
            let race_id: RaceId = id_column(&r, "race_id")?;
            let ability_id: TextAbilityId = id_column(&r, "text_ability_id")?;
            let ability = text_abilities.get(&ability_id).cloned().ok_or_else(|| {
                missing(&format!("Race {}", race_id), "text ability", ability_id)
            })?;
            race_abilities.entry(race_id).or_default().push(ability);
        }

        for r in self.fetch("SELECT * FROM races ORDER BY name").await? {
            let id: RaceId = id_column(&r, "id")?;
            let name: String = column(&r, "name")?;
            let size = match optional_id_column::<SizeId>(&r, "size_id")? {
                Some(size_id) => Some(Size {
                    id: size_id,
                    name: sizes
                        .get(&size_id)
                        .cloned()
                        .ok_or_else(|| missing(&name, "size", size_id))?,
                }),
                None => None,
            };
            compendium.add_race(Race {
                id,
                name,
                speed: u32_column(&r, "speed")?,
                abilities: race_abilities.remove(&id).unwrap_or_default(),
                languages: race_languages.remove(&id).unwrap_or_default(),
                size,
            });
        }

        for r in self.fetch("SELECT * FROM backgrounds ORDER BY name").await? {
            compendium.add_background(Background {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
                feature: column(&r, "feature")?,
            });
        }

        // --- items ----------------------------------------------------------
        let mut item_types: HashMap<ItemTypeId, ItemType> = HashMap::new();
        for r in self.fetch("SELECT * FROM item_types").await? {
            let item_type = ItemType {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
                equipable_attack: column(&r, "equipable_attack")?,
                equipable_defense: column(&r, "equipable_defense")?,
                consumable: column(&r, "consumable")?,
            };
            item_types.insert(item_type.id, item_type);
        }

        for r in self.fetch("SELECT * FROM items ORDER BY name").await? {
            let name: String = column(&r, "name")?;
            let item_type = match optional_id_column::<ItemTypeId>(&r, "item_type_id")? {
                Some(type_id) => Some(
                    item_types
                        .get(&type_id)
                        .cloned()
                        .ok_or_else(|| missing(&name, "item type", type_id))?,
                ),
                None => None,
            };
            compendium.add_item(Item {
                id: id_column(&r, "id")?,
                name,
                description: column(&r, "description")?,
                item_type,
                price: column(&r, "price")?,
            });
        }

        // --- spells ---------------------------------------------------------
        let spell_types: HashMap<SpellTypeId, String> = self.named("spell_types").await?;
        for r in self.fetch("SELECT * FROM spells ORDER BY level, name").await? {
            let name: String = column(&r, "name")?;
            let spell_type = match optional_id_column::<SpellTypeId>(&r, "spell_type_id")? {
                Some(type_id) => Some(SpellType {
                    id: type_id,
                    name: spell_types
                        .get(&type_id)
                        .cloned()
                        .ok_or_else(|| missing(&name, "spell type", type_id))?,
                }),
                None => None,
            };
            let duration: String = column(&r, "duration")?;
            compendium.add_spell(Spell {
                id: id_column(&r, "id")?,
                name,
                level: u8_column(&r, "level")?,
                casting_time: charsheet_domain::Duration::from_rounds(u32_column(
                    &r,
                    "casting_time_rounds",
                )?),
                duration: duration_from_text(&duration)?,
                components: SpellComponents {
                    verbal: column(&r, "verbal")?,
                    somatic: column(&r, "somatic")?,
                    material: column(&r, "material")?,
                },
                range: u32_column(&r, "range_feet")?,
                description: column(&r, "description")?,
                ritual: column(&r, "ritual")?,
                spell_type,
            });
        }

        for r in self.fetch("SELECT * FROM status_effects ORDER BY name").await? {
            compendium.add_status_effect(StatusEffect {
                id: id_column(&r, "id")?,
                name: column(&r, "name")?,
            });
        }

        tracing::debug!(
            abilities = compendium.abilities().len(),
            skills = compendium.skills().len(),
            classes = compendium.classes().len(),
            spells = compendium.spells().len(),
            "Loaded compendium"
        );
        Ok(compendium)
    }

    async fn save_ability(&self, ability: &Ability) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO abilities (id, name, position)
            VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM abilities))
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            "#,
        )
        .bind(ability.id.to_string())
        .bind(&ability.name)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_ability", e))?;
        Ok(())
    }

    async fn save_skill(&self, skill: &SkillDefinition) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO skills (id, name, base_ability_id)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                base_ability_id = excluded.base_ability_id
            "#,
        )
        .bind(skill.id.to_string())
        .bind(&skill.name)
        .bind(skill.base_ability.map(|id| id.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_skill", e))?;
        Ok(())
    }

    async fn save_class(&self, class: &CharacterClass) -> Result<(), RepoError> {
        let db = |e: sqlx::Error| RepoError::database("save_class", e);
        let mut tx = self.begin("save_class").await?;

        if let Some(dice) = &class.hit_dice {
            sqlx::query(
                r#"
                INSERT INTO dice (id, name, sides) VALUES (?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET name = excluded.name, sides = excluded.sides
                "#,
            )
            .bind(dice.id.to_string())
            .bind(&dice.name)
            .bind(i64::from(dice.sides))
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }

        sqlx::query(
            r#"
            INSERT INTO classes (id, name, hit_dice_id, spellcasting_ability_id)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                hit_dice_id = excluded.hit_dice_id,
                spellcasting_ability_id = excluded.spellcasting_ability_id
            "#,
        )
        .bind(class.id.to_string())
        .bind(&class.name)
        .bind(class.hit_dice.as_ref().map(|d| d.id.to_string()))
        .bind(class.spellcasting_ability.map(|id| id.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        sqlx::query("DELETE FROM class_saving_throws WHERE class_id = ?")
            .bind(class.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        for ability in &class.saving_throw_proficiencies {
            sqlx::query(
                "INSERT OR IGNORE INTO class_saving_throws (class_id, ability_id) VALUES (?, ?)",
            )
            .bind(class.id.to_string())
            .bind(ability.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }

        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn save_race(&self, race: &Race) -> Result<(), RepoError> {
        let db = |e: sqlx::Error| RepoError::database("save_race", e);
        let mut tx = self.begin("save_race").await?;
        let race_id = race.id.to_string();

        if let Some(size) = &race.size {
            upsert_named(&mut tx, "sizes", size.id.to_string(), &size.name, "save_race").await?;
        }

        sqlx::query(
            r#"
            INSERT INTO races (id, name, speed, size_id) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                speed = excluded.speed,
                size_id = excluded.size_id
            "#,
        )
        .bind(&race_id)
        .bind(&race.name)
        .bind(i64::from(race.speed))
        .bind(race.size.as_ref().map(|s| s.id.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        for table in ["race_languages", "race_text_abilities"] {
            sqlx::query(&format!("DELETE FROM {} WHERE race_id = ?", table))
                .bind(&race_id)
                .execute(&mut *tx)
                .await
                .map_err(db)?;
        }

        for (position, language) in race.languages.iter().enumerate() {
            upsert_named(
                &mut tx,
                "languages",
                language.id.to_string(),
                &language.name,
                "save_race",
            )
            .await?;
            sqlx::query(
                "INSERT OR IGNORE INTO race_languages (race_id, language_id, position) VALUES (?, ?, ?)",
            )
            .bind(&race_id)
            .bind(language.id.to_string())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }

        for (position, ability) in race.abilities.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO text_abilities (id, name, description) VALUES (?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description
                "#,
            )
            .bind(ability.id.to_string())
            .bind(&ability.name)
            .bind(&ability.description)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO race_text_abilities (race_id, text_ability_id, position)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&race_id)
            .bind(ability.id.to_string())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }

        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn save_background(&self, background: &Background) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO backgrounds (id, name, feature) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, feature = excluded.feature
            "#,
        )
        .bind(background.id.to_string())
        .bind(&background.name)
        .bind(&background.feature)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_background", e))?;
        Ok(())
    }

    async fn save_item(&self, item: &Item) -> Result<(), RepoError> {
        let db = |e: sqlx::Error| RepoError::database("save_item", e);
        let mut tx = self.begin("save_item").await?;

        if let Some(item_type) = &item.item_type {
            sqlx::query(
                r#"
                INSERT INTO item_types (id, name, equipable_attack, equipable_defense, consumable)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    equipable_attack = excluded.equipable_attack,
                    equipable_defense = excluded.equipable_defense,
                    consumable = excluded.consumable
                "#,
            )
            .bind(item_type.id.to_string())
            .bind(&item_type.name)
            .bind(item_type.equipable_attack)
            .bind(item_type.equipable_defense)
            .bind(item_type.consumable)
            .execute(&mut *tx)
            .await
            .map_err(db)?;
        }

        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, item_type_id, price)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                item_type_id = excluded.item_type_id,
                price = excluded.price
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.item_type.as_ref().map(|t| t.id.to_string()))
        .bind(item.price)
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn save_spell(&self, spell: &Spell) -> Result<(), RepoError> {
        let db = |e: sqlx::Error| RepoError::database("save_spell", e);
        let mut tx = self.begin("save_spell").await?;

        if let Some(spell_type) = &spell.spell_type {
            upsert_named(
                &mut tx,
                "spell_types",
                spell_type.id.to_string(),
                &spell_type.name,
                "save_spell",
            )
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO spells (
                id, name, level, casting_time_rounds, duration, verbal, somatic,
                material, range_feet, description, ritual, spell_type_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                level = excluded.level,
                casting_time_rounds = excluded.casting_time_rounds,
                duration = excluded.duration,
                verbal = excluded.verbal,
                somatic = excluded.somatic,
                material = excluded.material,
                range_feet = excluded.range_feet,
                description = excluded.description,
                ritual = excluded.ritual,
                spell_type_id = excluded.spell_type_id
            "#,
        )
        .bind(spell.id.to_string())
        .bind(&spell.name)
        .bind(i64::from(spell.level))
        .bind(i64::from(spell.casting_time.rounds()))
        .bind(duration_to_text(spell.duration))
        .bind(spell.components.verbal)
        .bind(spell.components.somatic)
        .bind(spell.components.material.as_deref())
        .bind(i64::from(spell.range))
        .bind(&spell.description)
        .bind(spell.ritual)
        .bind(spell.spell_type.as_ref().map(|t| t.id.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn save_status_effect(&self, effect: &StatusEffect) -> Result<(), RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("save_status_effect", e))?;
        upsert_named(
            &mut conn,
            "status_effects",
            effect.id.to_string(),
            &effect.name,
            "save_status_effect",
        )
        .await
    }
}
