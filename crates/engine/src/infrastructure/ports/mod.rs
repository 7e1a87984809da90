//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (character sheets, reference data)
//! - Clock (for testing)

mod error;
mod external;
mod repos;

pub use error::RepoError;
pub use external::ClockPort;
pub use repos::{CharacterSheetRepo, ReferenceRepo};

#[cfg(test)]
pub use external::MockClockPort;
#[cfg(test)]
pub use repos::{MockCharacterSheetRepo, MockReferenceRepo};
