//! Domain to wire-format conversions.

mod character_sheet;

pub use character_sheet::{present_derived, present_list_item, present_sheet, present_spell_stats};
