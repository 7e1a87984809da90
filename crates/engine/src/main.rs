//! Charsheet Engine - Main entry point.

use std::path::Path;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charsheet_domain::CharacterId;
use charsheet_engine::infrastructure::config::{load_dotenv_from_repo_root, EngineConfig};
use charsheet_engine::App;

const USAGE: &str = "usage: charsheet-engine export <character-id>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charsheet_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ids = match args.split_first() {
        Some((command, ids)) if command == "export" && !ids.is_empty() => ids
            .iter()
            .map(|raw| {
                raw.parse::<CharacterId>()
                    .with_context(|| format!("Invalid character id '{}'", raw))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        _ => bail!(USAGE),
    };

    let config = EngineConfig::from_env();
    tracing::info!(
        database = %config.database_path,
        export_dir = ?config.export_dir,
        "Starting Charsheet Engine"
    );

    let app = App::new(&config).await?;

    for id in ids {
        match config.export_dir.as_deref() {
            Some(dir) => export_to_dir(&app, id, dir).await?,
            None => println!("{}", app.exporter.export_to_json(id).await?),
        }
    }

    Ok(())
}

async fn export_to_dir(app: &App, id: CharacterId, dir: &Path) -> anyhow::Result<()> {
    let path = app.exporter.export_to_dir(id, dir).await?;
    tracing::debug!(path = %path.display(), "Wrote export");
    Ok(())
}
