//! Value objects - Immutable objects defined by their attributes

mod ability_score;
mod duration;
mod names;

pub use ability_score::{ability_modifier, AbilityScore};
pub use duration::{ClockTime, Duration, InvalidDurationError, SECONDS_PER_ROUND};
pub use names::CharacterName;
