//! Character sheet export.

mod json_exporter;

pub use json_exporter::{CharacterSnapshot, JsonExporter, SnapshotMetadata, SNAPSHOT_VERSION};
