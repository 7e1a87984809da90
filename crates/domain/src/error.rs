//! Unified error types for the domain layer
//!
//! `DomainError` covers construction and mutation of domain objects.
//! `CalculationError` covers the derived-stat rules, where a missing piece of
//! character data must never be confused with a legitimate zero.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when a value is outside its allowed range:
    /// - Required fields are empty
    /// - Class levels below 1
    /// - Negative quantities
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Errors raised by the derived-stat rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// A calculation needed an ability score the character has not assigned.
    #[error("Missing ability data: character has no score for {ability}")]
    MissingAbilityData { ability: String },

    /// A spell calculation was requested for a class without a spellcasting ability.
    #[error("Not a spellcaster: class {class} has no spellcasting ability")]
    NotASpellcaster { class: String },

    /// A class-specific calculation was requested for a class the character lacks.
    #[error("Class not assigned: character has no levels in {class}")]
    ClassNotAssigned { class: String },

    /// No explicit class was given and several classes could cast spells.
    #[error("Ambiguous spellcaster: pick one of {}", classes.join(", "))]
    AmbiguousSpellcaster { classes: Vec<String> },

    /// No explicit class was given and no class can cast spells.
    #[error("No spellcaster: character has no class with a spellcasting ability")]
    NoSpellcaster,

    /// A class contributing to hit points has no hit dice configured.
    #[error("Missing hit dice for class {class}")]
    MissingHitDice { class: String },

    /// The character references reference data absent from the compendium.
    #[error("Unknown {entity_type} referenced by character: {id}")]
    UnknownReference {
        entity_type: &'static str,
        id: String,
    },
}

impl CalculationError {
    pub fn missing_ability(ability: impl Into<String>) -> Self {
        Self::MissingAbilityData {
            ability: ability.into(),
        }
    }

    pub fn unknown_reference(entity_type: &'static str, id: impl ToString) -> Self {
        Self::UnknownReference {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Whether the error means the value is simply not defined for this character,
    /// as opposed to inconsistent data.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NotASpellcaster { .. }
                | Self::ClassNotAssigned { .. }
                | Self::AmbiguousSpellcaster { .. }
                | Self::NoSpellcaster
        )
    }
}
