//! SQLite persistence adapters
//!
//! One database file holds both reference data and character sheets. The
//! schema is created on connect.

mod character_sheet_repository;
mod codec;
mod connection;
mod reference_repository;

pub use character_sheet_repository::SqliteCharacterSheetRepo;
pub use connection::{connect, ensure_schema};
pub use reference_repository::SqliteReferenceRepo;
