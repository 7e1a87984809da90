//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    export::JsonExporter,
    persistence::{connect, SqliteCharacterSheetRepo, SqliteReferenceRepo},
    ports::{CharacterSheetRepo, ClockPort, ReferenceRepo, RepoError},
};
use crate::use_cases::CharacterSheetUseCases;

/// Main application state.
///
/// Holds the repositories, use cases and exporter built from one SQLite store.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub exporter: Arc<JsonExporter>,
}

/// Container for the repository ports.
pub struct Repositories {
    pub character_sheet: Arc<dyn CharacterSheetRepo>,
    pub reference: Arc<dyn ReferenceRepo>,
}

/// Container for use cases.
pub struct UseCases {
    pub character_sheet: Arc<CharacterSheetUseCases>,
}

impl App {
    /// Open the configured database and wire everything to it.
    pub async fn new(config: &EngineConfig) -> Result<Self, RepoError> {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let pool = connect(&config.database_path).await?;

        let repositories = Repositories {
            character_sheet: Arc::new(SqliteCharacterSheetRepo::new(pool.clone(), clock.clone())),
            reference: Arc::new(SqliteReferenceRepo::new(pool)),
        };
        let character_sheet = Arc::new(CharacterSheetUseCases::new(
            repositories.character_sheet.clone(),
            repositories.reference.clone(),
        ));
        let exporter = Arc::new(JsonExporter::new(character_sheet.clone(), clock));

        Ok(Self {
            repositories,
            use_cases: UseCases { character_sheet },
            exporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_domain::{standard_abilities, UserId};

    #[tokio::test]
    async fn wires_store_use_cases_and_exporter() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            database_path: dir.path().join("app.db").display().to_string(),
            export_dir: None,
        };
        let app = App::new(&config).await.unwrap();

        for ability in standard_abilities() {
            app.repositories.reference.save_ability(&ability).await.unwrap();
        }
        let sheet = app
            .use_cases
            .character_sheet
            .create(UserId::new(), "Mialee")
            .await
            .unwrap();
        app.use_cases
            .character_sheet
            .set_ability_score(sheet.id(), "INT", 17)
            .await
            .unwrap();

        let json = app.exporter.export_to_json(sheet.id()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["character"]["name"], "Mialee");
        assert_eq!(value["character"]["abilities"][0]["short"], "INT");
        assert_eq!(value["character"]["abilities"][0]["modifier"], 3);
    }
}
