//! Engine configuration from the environment.

use std::path::{Path, PathBuf};

/// Default SQLite file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "charsheet.db";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite database file (`CHARSHEET_DB`)
    pub database_path: String,
    /// Directory exports are written to (`EXPORT_DIR`). Stdout when unset.
    pub export_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            export_dir: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            database_path: var("CHARSHEET_DB").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into()),
            export_dir: var("EXPORT_DIR").map(PathBuf::from),
        }
    }
}

/// Load `.env.local` and `.env` from the repository root, if present.
///
/// Variables already set in the process environment win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn reads_database_and_export_dir() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("CHARSHEET_DB", "/var/lib/charsheet/sheets.db"),
            ("EXPORT_DIR", "exports"),
        ]));
        assert_eq!(config.database_path, "/var/lib/charsheet/sheets.db");
        assert_eq!(config.export_dir, Some(PathBuf::from("exports")));
    }

    #[test]
    fn blank_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[("CHARSHEET_DB", "  "), ("EXPORT_DIR", "")]));
        assert_eq!(config, EngineConfig::default());
    }
}
