//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate repositories through port traits.

pub mod character_sheet;

pub use character_sheet::{
    CharacterSheetError, CharacterSheetUseCases, CharacterSheetView, SpellStats,
};
