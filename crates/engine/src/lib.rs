//! Charsheet Engine library.
//!
//! Server-side code for character sheets.
//!
//! ## Structure
//!
//! - `use_cases/` - Loading, editing and deriving character sheets
//! - `infrastructure/` - Ports and their SQLite, clock, config and export adapters
//! - `presentation/` - Conversion to the wire DTOs in `charsheet-shared`
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod presentation;
pub mod use_cases;

pub use app::App;
