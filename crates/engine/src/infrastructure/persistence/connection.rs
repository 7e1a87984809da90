//! SQLite connection and schema management

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// Tables are created idempotently on every connect.
///
/// Ability scores, levels and round counts are INTEGER columns; spell
/// durations are `HH:MM:SS` TEXT. Ids are UUID strings.
const SCHEMA: &[&str] = &[
    // --- reference data -----------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS abilities (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        position INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS skills (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        base_ability_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dice (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        sides INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS classes (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        hit_dice_id TEXT,
        spellcasting_ability_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS class_saving_throws (
        class_id TEXT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
        ability_id TEXT NOT NULL,
        PRIMARY KEY (class_id, ability_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS languages (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sizes (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS text_abilities (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS races (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        speed INTEGER NOT NULL,
        size_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS race_languages (
        race_id TEXT NOT NULL REFERENCES races(id) ON DELETE CASCADE,
        language_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (race_id, language_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS race_text_abilities (
        race_id TEXT NOT NULL REFERENCES races(id) ON DELETE CASCADE,
        text_ability_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (race_id, text_ability_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS backgrounds (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        feature TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item_types (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        equipable_attack INTEGER NOT NULL,
        equipable_defense INTEGER NOT NULL,
        consumable INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        item_type_id TEXT,
        price INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS spell_types (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS spells (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        level INTEGER NOT NULL,
        casting_time_rounds INTEGER NOT NULL,
        duration TEXT NOT NULL,
        verbal INTEGER NOT NULL,
        somatic INTEGER NOT NULL,
        material TEXT,
        range_feet INTEGER NOT NULL,
        description TEXT NOT NULL,
        ritual INTEGER NOT NULL,
        spell_type_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS status_effects (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    // --- characters ---------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS character_sheets (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        race_id TEXT,
        background_id TEXT,
        current_hp INTEGER NOT NULL,
        temp_hp INTEGER NOT NULL,
        temp_hp_reason TEXT,
        inspiration INTEGER NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_character_sheets_owner ON character_sheets(owner_id)",
    r#"
    CREATE TABLE IF NOT EXISTS character_skills (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        skill_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('proficiency', 'expertise')),
        PRIMARY KEY (character_id, skill_id, kind)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_abilities (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        ability_id TEXT NOT NULL,
        value INTEGER NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (character_id, ability_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_classes (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        class_id TEXT NOT NULL,
        level INTEGER NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (character_id, class_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_equipment (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        item_id TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        equipped INTEGER NOT NULL,
        additional_info TEXT NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (character_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_spells (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        spell_id TEXT NOT NULL,
        prepared INTEGER NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (character_id, spell_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_spell_slots (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        level INTEGER NOT NULL,
        quantity INTEGER NOT NULL,
        PRIMARY KEY (character_id, level)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_status_effects (
        character_id TEXT NOT NULL REFERENCES character_sheets(id) ON DELETE CASCADE,
        status_effect_id TEXT NOT NULL,
        remaining_rounds INTEGER NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (character_id, position)
    )
    "#,
];

/// Open (creating if needed) the SQLite database at `db_path` and ensure the schema.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
        .map_err(|e| RepoError::database("connect", e))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    ensure_schema(&pool).await?;
    tracing::info!(db_path = %db_path, "SQLite store ready");
    Ok(pool)
}

/// Create every table and index that does not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}
