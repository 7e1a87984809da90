//! CharacterSheet aggregate - a character's persisted state
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: uniqueness rules (one score per ability, one entry per
//!   class/item/spell/slot level) are enforced by the mutators
//! - **Newtypes**: `CharacterName`, `AbilityScore`, `Duration`
//! - **References by id**: classes, skills, items and spells live in the
//!   `Compendium`; the sheet only points at them
//!
//! Derived statistics are not stored here; see `rules::DerivedStats`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::{AbilityScore, CharacterName, Duration};
use crate::DomainError;
use charsheet_domain::{
    AbilityId, BackgroundId, CharacterId, ClassId, ItemId, RaceId, SkillId, SpellId,
    StatusEffectId, UserId,
};

// =============================================================================
// Sheet rows
// =============================================================================

/// The character's score in one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityAssignment {
    pub ability: AbilityId,
    pub score: AbilityScore,
}

impl AbilityAssignment {
    pub fn new(ability: AbilityId, score: impl Into<AbilityScore>) -> Self {
        Self {
            ability,
            score: score.into(),
        }
    }
}

/// Levels taken in one class.
///
/// # Invariants
///
/// - `level >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevel {
    class: ClassId,
    level: u32,
}

impl ClassLevel {
    pub fn new(class: ClassId, level: u32) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation("Class level must be at least 1"));
        }
        Ok(Self { class, level })
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

/// An item carried by the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub item: ItemId,
    pub quantity: u32,
    pub equipped: bool,
    #[serde(default)]
    pub additional_info: String,
}

impl EquipmentItem {
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            equipped: false,
            additional_info: String::new(),
        }
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }
}

/// A spell the character knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpell {
    pub spell: SpellId,
    pub prepared: bool,
}

/// Available spell slots of one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlots {
    pub level: u8,
    pub quantity: u32,
}

/// A status effect currently on the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStatusEffect {
    pub effect: StatusEffectId,
    pub remaining: Duration,
}

/// Everything a character sheet is rebuilt from.
///
/// Used by persistence adapters; `CharacterSheet::from_parts` re-checks every
/// invariant so corrupted rows are rejected instead of silently merged.
#[derive(Debug, Clone)]
pub struct CharacterSheetParts {
    pub id: CharacterId,
    pub owner: UserId,
    pub name: CharacterName,
    pub race: Option<RaceId>,
    pub background: Option<BackgroundId>,
    pub current_hp: i32,
    pub temp_hp: i32,
    pub temp_hp_reason: Option<String>,
    pub inspiration: bool,
    pub skill_proficiencies: Vec<SkillId>,
    pub skill_expertise: Vec<SkillId>,
    pub abilities: Vec<AbilityAssignment>,
    pub class_levels: Vec<ClassLevel>,
    pub equipment: Vec<EquipmentItem>,
    pub spells: Vec<KnownSpell>,
    pub spell_slots: Vec<SpellSlots>,
    pub status_effects: Vec<ActiveStatusEffect>,
}

// =============================================================================
// Aggregate
// =============================================================================

/// A player's character sheet.
///
/// # Invariants
///
/// - At most one ability assignment per ability
/// - At most one class level entry per class, each with level >= 1
/// - At most one equipment entry per item and one known-spell entry per spell
/// - At most one spell slot row per spell level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    id: CharacterId,
    owner: UserId,
    name: CharacterName,
    race: Option<RaceId>,
    background: Option<BackgroundId>,
    current_hp: i32,
    temp_hp: i32,
    temp_hp_reason: Option<String>,
    inspiration: bool,
    skill_proficiencies: BTreeSet<SkillId>,
    skill_expertise: BTreeSet<SkillId>,
    abilities: Vec<AbilityAssignment>,
    class_levels: Vec<ClassLevel>,
    equipment: Vec<EquipmentItem>,
    spells: Vec<KnownSpell>,
    spell_slots: Vec<SpellSlots>,
    status_effects: Vec<ActiveStatusEffect>,
}

impl CharacterSheet {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an empty sheet owned by `owner`.
    pub fn new(owner: UserId, name: CharacterName) -> Self {
        Self {
            id: CharacterId::new(),
            owner,
            name,
            race: None,
            background: None,
            current_hp: 0,
            temp_hp: 0,
            temp_hp_reason: None,
            inspiration: false,
            skill_proficiencies: BTreeSet::new(),
            skill_expertise: BTreeSet::new(),
            abilities: Vec::new(),
            class_levels: Vec::new(),
            equipment: Vec::new(),
            spells: Vec::new(),
            spell_slots: Vec::new(),
            status_effects: Vec::new(),
        }
    }

    /// Rebuild a sheet from stored parts, enforcing every invariant.
    pub fn from_parts(parts: CharacterSheetParts) -> Result<Self, DomainError> {
        let mut sheet = Self::new(parts.owner, parts.name);
        sheet.id = parts.id;
        sheet.race = parts.race;
        sheet.background = parts.background;
        sheet.set_hit_points(parts.current_hp, parts.temp_hp, parts.temp_hp_reason);
        sheet.inspiration = parts.inspiration;
        sheet.skill_proficiencies = parts.skill_proficiencies.into_iter().collect();
        sheet.skill_expertise = parts.skill_expertise.into_iter().collect();

        for assignment in parts.abilities {
            if sheet.ability_score(assignment.ability).is_some() {
                return Err(DomainError::constraint(format!(
                    "Ability {} assigned more than once",
                    assignment.ability
                )));
            }
            sheet.abilities.push(assignment);
        }
        for entry in parts.class_levels {
            sheet.add_class_level(entry.class, entry.level)?;
        }
        for item in parts.equipment {
            sheet.add_equipment(item)?;
        }
        for spell in parts.spells {
            sheet.learn_spell(spell.spell, spell.prepared)?;
        }
        for slots in parts.spell_slots {
            if sheet.spell_slots.iter().any(|s| s.level == slots.level) {
                return Err(DomainError::constraint(format!(
                    "Spell slots for level {} listed more than once",
                    slots.level
                )));
            }
            sheet.spell_slots.push(slots);
        }
        sheet.status_effects = parts.status_effects;
        Ok(sheet)
    }

    /// Builder: set the race.
    pub fn with_race(mut self, race: RaceId) -> Self {
        self.race = Some(race);
        self
    }

    /// Builder: set the background.
    pub fn with_background(mut self, background: BackgroundId) -> Self {
        self.background = Some(background);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn race(&self) -> Option<RaceId> {
        self.race
    }

    pub fn background(&self) -> Option<BackgroundId> {
        self.background
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn temp_hp(&self) -> i32 {
        self.temp_hp
    }

    pub fn temp_hp_reason(&self) -> Option<&str> {
        self.temp_hp_reason.as_deref()
    }

    pub fn inspiration(&self) -> bool {
        self.inspiration
    }

    pub fn skill_proficiencies(&self) -> &BTreeSet<SkillId> {
        &self.skill_proficiencies
    }

    pub fn skill_expertise(&self) -> &BTreeSet<SkillId> {
        &self.skill_expertise
    }

    pub fn is_proficient(&self, skill: SkillId) -> bool {
        self.skill_proficiencies.contains(&skill)
    }

    pub fn has_expertise(&self, skill: SkillId) -> bool {
        self.skill_expertise.contains(&skill)
    }

    pub fn abilities(&self) -> &[AbilityAssignment] {
        &self.abilities
    }

    /// The character's assignment for `ability`, if any.
    pub fn ability_assignment(&self, ability: AbilityId) -> Option<&AbilityAssignment> {
        self.abilities.iter().find(|a| a.ability == ability)
    }

    pub fn ability_score(&self, ability: AbilityId) -> Option<AbilityScore> {
        self.ability_assignment(ability).map(|a| a.score)
    }

    pub fn class_levels(&self) -> &[ClassLevel] {
        &self.class_levels
    }

    pub fn class_level(&self, class: ClassId) -> Option<&ClassLevel> {
        self.class_levels.iter().find(|c| c.class == class)
    }

    /// Sum of all class levels, saturating at `u32::MAX`.
    pub fn total_level(&self) -> u32 {
        self.class_levels
            .iter()
            .fold(0u32, |total, c| total.saturating_add(c.level))
    }

    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }

    pub fn spells(&self) -> &[KnownSpell] {
        &self.spells
    }

    pub fn spell_slots(&self) -> &[SpellSlots] {
        &self.spell_slots
    }

    pub fn status_effects(&self) -> &[ActiveStatusEffect] {
        &self.status_effects
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn rename(&mut self, name: CharacterName) {
        self.name = name;
    }

    pub fn set_race(&mut self, race: Option<RaceId>) {
        self.race = race;
    }

    pub fn set_background(&mut self, background: Option<BackgroundId>) {
        self.background = background;
    }

    pub fn set_hit_points(&mut self, current: i32, temp: i32, temp_reason: Option<String>) {
        self.current_hp = current;
        self.temp_hp = temp;
        self.temp_hp_reason = temp_reason;
    }

    pub fn set_inspiration(&mut self, inspiration: bool) {
        self.inspiration = inspiration;
    }

    /// Assign or replace the score for an ability.
    pub fn set_ability_score(&mut self, ability: AbilityId, score: impl Into<AbilityScore>) {
        let score = score.into();
        match self.abilities.iter_mut().find(|a| a.ability == ability) {
            Some(existing) => existing.score = score,
            None => self.abilities.push(AbilityAssignment { ability, score }),
        }
    }

    /// Take the first levels in a new class.
    ///
    /// # Errors
    ///
    /// - `Validation` if `level` is 0
    /// - `Constraint` if the character already has levels in `class`
    pub fn add_class_level(&mut self, class: ClassId, level: u32) -> Result<(), DomainError> {
        let entry = ClassLevel::new(class, level)?;
        if self.class_level(class).is_some() {
            return Err(DomainError::constraint(format!(
                "Class {} is already assigned to this character",
                class
            )));
        }
        self.class_levels.push(entry);
        Ok(())
    }

    /// Set the level in a class, adding the class if needed.
    pub fn set_class_level(&mut self, class: ClassId, level: u32) -> Result<(), DomainError> {
        let entry = ClassLevel::new(class, level)?;
        match self.class_levels.iter_mut().find(|c| c.class == class) {
            Some(existing) => *existing = entry,
            None => self.class_levels.push(entry),
        }
        Ok(())
    }

    /// Drop a class entirely. Returns whether it was present.
    pub fn remove_class(&mut self, class: ClassId) -> bool {
        let before = self.class_levels.len();
        self.class_levels.retain(|c| c.class != class);
        self.class_levels.len() != before
    }

    pub fn add_skill_proficiency(&mut self, skill: SkillId) {
        self.skill_proficiencies.insert(skill);
    }

    pub fn add_skill_expertise(&mut self, skill: SkillId) {
        self.skill_expertise.insert(skill);
    }

    pub fn remove_skill_proficiency(&mut self, skill: SkillId) -> bool {
        self.skill_proficiencies.remove(&skill)
    }

    pub fn remove_skill_expertise(&mut self, skill: SkillId) -> bool {
        self.skill_expertise.remove(&skill)
    }

    /// Add an item to the equipment list.
    ///
    /// # Errors
    ///
    /// `Constraint` if the item is already listed; change the quantity instead.
    pub fn add_equipment(&mut self, entry: EquipmentItem) -> Result<(), DomainError> {
        if self.equipment.iter().any(|e| e.item == entry.item) {
            return Err(DomainError::constraint(format!(
                "Item {} is already in this character's equipment",
                entry.item
            )));
        }
        self.equipment.push(entry);
        Ok(())
    }

    pub fn remove_equipment(&mut self, item: ItemId) -> Option<EquipmentItem> {
        let index = self.equipment.iter().position(|e| e.item == item)?;
        Some(self.equipment.remove(index))
    }

    /// Add a spell to the known list.
    pub fn learn_spell(&mut self, spell: SpellId, prepared: bool) -> Result<(), DomainError> {
        if self.spells.iter().any(|s| s.spell == spell) {
            return Err(DomainError::constraint(format!(
                "Spell {} is already known",
                spell
            )));
        }
        self.spells.push(KnownSpell { spell, prepared });
        Ok(())
    }

    pub fn set_spell_prepared(&mut self, spell: SpellId, prepared: bool) -> Result<(), DomainError> {
        let known = self
            .spells
            .iter_mut()
            .find(|s| s.spell == spell)
            .ok_or_else(|| DomainError::not_found("KnownSpell", spell.to_string()))?;
        known.prepared = prepared;
        Ok(())
    }

    /// Set the slot count for a spell level, replacing any existing row.
    pub fn set_spell_slots(&mut self, level: u8, quantity: u32) {
        match self.spell_slots.iter_mut().find(|s| s.level == level) {
            Some(existing) => existing.quantity = quantity,
            None => {
                self.spell_slots.push(SpellSlots { level, quantity });
                self.spell_slots.sort_by_key(|s| s.level);
            }
        }
    }

    pub fn apply_status_effect(&mut self, effect: StatusEffectId, duration: Duration) {
        self.status_effects.push(ActiveStatusEffect {
            effect,
            remaining: duration,
        });
    }

    /// Advance time by `rounds`, dropping effects that run out.
    ///
    /// Returns the effects that expired.
    pub fn advance_rounds(&mut self, rounds: u32) -> Vec<StatusEffectId> {
        let mut expired = Vec::new();
        self.status_effects.retain_mut(|active| {
            let left = active.remaining.rounds().saturating_sub(rounds);
            if left == 0 {
                expired.push(active.effect);
                false
            } else {
                active.remaining = Duration::from_rounds(left);
                true
            }
        });
        expired
    }
}
