//! Derived statistics for a character sheet
//!
//! Nothing here is stored. Every value is recomputed from the sheet and the
//! compendium it references, so the two must be loaded together.
//!
//! Values that do not exist for a character (spell stats of a non-caster) and
//! values that cannot be computed from incomplete data (hit points without a
//! Constitution score) are reported as `CalculationError`s, never as zero.

use crate::aggregates::CharacterSheet;
use crate::compendium::Compendium;
use crate::entities::{CharacterClass, Dice};
use crate::error::CalculationError;
use crate::rules::skill::Skill;
use crate::value_objects::AbilityScore;
use charsheet_domain::{AbilityId, ClassId};

/// Code of the ability hit points are derived from.
pub const CONSTITUTION: &str = "CON";

/// Base of the spell save DC.
pub const SPELL_SAVE_DC_BASE: i32 = 8;

const MAX_PROFICIENCY_BONUS: i32 = 6;

/// Proficiency bonus for a total character level.
///
/// `floor((level - 1) / 4) + 2`, capped at 6. A character without levels is
/// treated as level 1.
pub fn proficiency_bonus(level: u32) -> i32 {
    let steps = (level.max(1) - 1) / 4;
    // capped before the cast so huge levels cannot overflow
    (steps.min(4) as i32 + 2).min(MAX_PROFICIENCY_BONUS)
}

/// Hit dice and levels for one class, as shown in the hit dice pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitDiceEntry {
    pub class: ClassId,
    pub dice: Dice,
    pub level: u32,
}

/// An assigned ability score with its modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityModifier {
    pub ability: AbilityId,
    pub short: String,
    pub score: AbilityScore,
    pub modifier: i32,
}

/// A saving throw for one ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingThrow {
    pub ability: AbilityId,
    pub short: String,
    pub proficient: bool,
    pub value: Result<i32, CalculationError>,
}

/// Every derived value at once, for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSummary {
    pub level: u32,
    pub proficiency_bonus: i32,
    pub max_hp: Result<i32, CalculationError>,
    pub hit_dice: Result<Vec<HitDiceEntry>, CalculationError>,
    pub ability_modifiers: Vec<AbilityModifier>,
    pub skills: Vec<Skill>,
    pub saving_throws: Vec<SavingThrow>,
    pub spell_attack_modifier: Result<i32, CalculationError>,
    pub spell_save_dc: Result<i32, CalculationError>,
}

/// Derived-stats engine over one sheet and its reference data.
#[derive(Debug, Clone, Copy)]
pub struct DerivedStats<'a> {
    sheet: &'a CharacterSheet,
    compendium: &'a Compendium,
}

impl<'a> DerivedStats<'a> {
    pub fn new(sheet: &'a CharacterSheet, compendium: &'a Compendium) -> Self {
        Self { sheet, compendium }
    }

    /// Sum of all class levels. Zero for a character without classes.
    pub fn total_level(&self) -> u32 {
        self.sheet.total_level()
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.total_level())
    }

    /// The character's score in the ability named by `code` ("CON", "Wisdom").
    pub fn ability_score_by_code(&self, code: &str) -> Option<AbilityScore> {
        let ability = self.compendium.ability_by_code(code)?;
        self.sheet.ability_score(ability.id)
    }

    /// Maximum hit points.
    ///
    /// Each class contributes its full die plus the Constitution modifier for
    /// its first level and the average roll plus the modifier for every level
    /// after that. Averages are kept in half points and the total is floored
    /// once at the end.
    pub fn max_hp(&self) -> Result<i32, CalculationError> {
        // i128 so any level and modifier the sheet accepts sums without overflow
        let con = i128::from(self.required_score(CONSTITUTION)?.modifier());

        let mut halves: i128 = 0;
        for entry in self.sheet.class_levels() {
            let class = self.class(entry.class())?;
            let dice = class
                .hit_dice
                .as_ref()
                .ok_or_else(|| CalculationError::MissingHitDice {
                    class: class.name.clone(),
                })?;
            let first_level = 2 * (i128::from(dice.sides) + con);
            let later_levels = (i128::from(entry.level()) - 1)
                * (i128::from(dice.avg_roll_halves()) + 2 * con);
            halves += first_level + later_levels;
        }

        let hp = halves.div_euclid(2);
        Ok(i32::try_from(hp).unwrap_or(if hp < 0 { i32::MIN } else { i32::MAX }))
    }

    /// Hit dice per class, smallest die first.
    pub fn hit_dice_breakdown(&self) -> Result<Vec<HitDiceEntry>, CalculationError> {
        let mut entries = self
            .sheet
            .class_levels()
            .iter()
            .map(|entry| {
                let class = self.class(entry.class())?;
                let dice = class
                    .hit_dice
                    .clone()
                    .ok_or_else(|| CalculationError::MissingHitDice {
                        class: class.name.clone(),
                    })?;
                Ok(HitDiceEntry {
                    class: class.id,
                    dice,
                    level: entry.level(),
                })
            })
            .collect::<Result<Vec<_>, CalculationError>>()?;
        entries.sort_by_key(|e| e.dice.sides);
        Ok(entries)
    }

    /// Every skill in the compendium, sorted by name.
    pub fn skills(&self) -> Vec<Skill> {
        self.compendium
            .skills_by_name()
            .into_iter()
            .map(|definition| {
                let ability = definition.base_ability;
                Skill {
                    id: definition.id,
                    name: definition.name.clone(),
                    ability,
                    ability_name: ability.map(|id| self.compendium.ability_name(id)),
                    base: ability.and_then(|id| self.sheet.ability_score(id)),
                    proficient: self.sheet.is_proficient(definition.id),
                    expertise: self.sheet.has_expertise(definition.id),
                }
            })
            .collect()
    }

    /// Modifiers for every assigned ability, in compendium order.
    pub fn ability_modifiers(&self) -> Vec<AbilityModifier> {
        self.compendium
            .abilities()
            .iter()
            .filter_map(|ability| {
                let score = self.sheet.ability_score(ability.id)?;
                Some(AbilityModifier {
                    ability: ability.id,
                    short: ability.short(),
                    score,
                    modifier: score.modifier(),
                })
            })
            .collect()
    }

    /// Whether any of the character's classes grants proficiency in saves
    /// for `ability`. Classes missing from the compendium grant nothing.
    pub fn has_saving_throw_proficiency(&self, ability: AbilityId) -> bool {
        self.sheet.class_levels().iter().any(|entry| {
            self.compendium
                .class(entry.class())
                .is_some_and(|class| class.has_saving_throw(ability))
        })
    }

    /// Saving throw modifier for one ability.
    pub fn saving_throw(&self, ability: AbilityId) -> Result<i32, CalculationError> {
        let score = self
            .sheet
            .ability_score(ability)
            .ok_or_else(|| CalculationError::missing_ability(self.compendium.ability_name(ability)))?;
        let bonus = if self.has_saving_throw_proficiency(ability) {
            self.proficiency_bonus()
        } else {
            0
        };
        Ok(score.modifier() + bonus)
    }

    /// Saving throws for every ability in the compendium.
    pub fn saving_throws(&self) -> Vec<SavingThrow> {
        self.compendium
            .abilities()
            .iter()
            .map(|ability| SavingThrow {
                ability: ability.id,
                short: ability.short(),
                proficient: self.has_saving_throw_proficiency(ability.id),
                value: self.saving_throw(ability.id),
            })
            .collect()
    }

    /// Spell attack modifier.
    ///
    /// With an explicit class the character must have levels in it and the
    /// class must cast spells. Without one, the character's only
    /// spellcasting class is used.
    pub fn spell_attack_modifier(&self, class: Option<ClassId>) -> Result<i32, CalculationError> {
        let caster = match class {
            Some(id) => self.assigned_caster(id)?,
            None => self.sole_caster()?,
        };
        let ability = caster
            .spellcasting_ability
            .ok_or_else(|| CalculationError::NotASpellcaster {
                class: caster.name.clone(),
            })?;
        let score = self
            .sheet
            .ability_score(ability)
            .ok_or_else(|| CalculationError::missing_ability(self.compendium.ability_name(ability)))?;
        Ok(self.proficiency_bonus() + score.modifier())
    }

    /// Spell save DC, `8 + spell attack modifier`.
    pub fn spell_save_dc(&self, class: Option<ClassId>) -> Result<i32, CalculationError> {
        self.spell_attack_modifier(class)
            .map(|modifier| SPELL_SAVE_DC_BASE + modifier)
    }

    /// Every derived value, with the spell stats for the sole caster class.
    pub fn summary(&self) -> DerivedSummary {
        DerivedSummary {
            level: self.total_level(),
            proficiency_bonus: self.proficiency_bonus(),
            max_hp: self.max_hp(),
            hit_dice: self.hit_dice_breakdown(),
            ability_modifiers: self.ability_modifiers(),
            skills: self.skills(),
            saving_throws: self.saving_throws(),
            spell_attack_modifier: self.spell_attack_modifier(None),
            spell_save_dc: self.spell_save_dc(None),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    fn class(&self, id: ClassId) -> Result<&'a CharacterClass, CalculationError> {
        self.compendium
            .class(id)
            .ok_or_else(|| CalculationError::unknown_reference("Class", id))
    }

    fn required_score(&self, code: &str) -> Result<AbilityScore, CalculationError> {
        let ability = self
            .compendium
            .ability_by_code(code)
            .ok_or_else(|| CalculationError::unknown_reference("Ability", code))?;
        self.sheet
            .ability_score(ability.id)
            .ok_or_else(|| CalculationError::missing_ability(ability.name.clone()))
    }

    fn assigned_caster(&self, id: ClassId) -> Result<&'a CharacterClass, CalculationError> {
        if self.sheet.class_level(id).is_none() {
            let class = self
                .compendium
                .class(id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string());
            return Err(CalculationError::ClassNotAssigned { class });
        }
        self.class(id)
    }

    fn sole_caster(&self) -> Result<&'a CharacterClass, CalculationError> {
        let mut casters = Vec::new();
        for entry in self.sheet.class_levels() {
            let class = self.class(entry.class())?;
            if class.is_spellcaster() {
                casters.push(class);
            }
        }
        match casters.as_slice() {
            [] => Err(CalculationError::NoSpellcaster),
            [only] => Ok(*only),
            many => Err(CalculationError::AmbiguousSpellcaster {
                classes: many.iter().map(|c| c.name.clone()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{standard_abilities, SkillDefinition};
    use crate::value_objects::CharacterName;
    use charsheet_domain::UserId;

    struct Fixture {
        compendium: Compendium,
        sheet: CharacterSheet,
    }

    impl Fixture {
        fn new() -> Self {
            let mut compendium = Compendium::new();
            for ability in standard_abilities() {
                compendium.add_ability(ability);
            }
            let sheet = CharacterSheet::new(UserId::new(), CharacterName::new("Tordek").unwrap());
            Self { compendium, sheet }
        }

        fn ability(&self, code: &str) -> AbilityId {
            self.compendium.ability_by_code(code).unwrap().id
        }

        fn score(&mut self, code: &str, raw: i32) -> &mut Self {
            let id = self.ability(code);
            self.sheet.set_ability_score(id, raw);
            self
        }

        fn class(&mut self, class: CharacterClass, level: u32) -> ClassId {
            let id = class.id;
            self.compendium.add_class(class);
            self.sheet.add_class_level(id, level).unwrap();
            id
        }

        fn stats(&self) -> DerivedStats<'_> {
            DerivedStats::new(&self.sheet, &self.compendium)
        }
    }

    mod level {
        use super::*;

        #[test]
        fn proficiency_bonus_progression() {
            assert_eq!(proficiency_bonus(1), 2);
            assert_eq!(proficiency_bonus(4), 2);
            assert_eq!(proficiency_bonus(5), 3);
            assert_eq!(proficiency_bonus(9), 4);
            assert_eq!(proficiency_bonus(17), 6);
            assert_eq!(proficiency_bonus(20), 6);
            assert_eq!(proficiency_bonus(100), 6);
            assert_eq!(proficiency_bonus(u32::MAX), 6);
        }

        #[test]
        fn level_zero_counts_as_one() {
            let fx = Fixture::new();
            assert_eq!(fx.stats().total_level(), 0);
            assert_eq!(fx.stats().proficiency_bonus(), 2);
        }

        #[test]
        fn total_level_saturates_instead_of_overflowing() {
            let mut fx = Fixture::new();
            fx.class(CharacterClass::new("Fighter", Dice::d(10)), u32::MAX);
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 1);
            assert_eq!(fx.stats().total_level(), u32::MAX);
            assert_eq!(fx.stats().proficiency_bonus(), 6);
            assert_eq!(fx.stats().summary().level, u32::MAX);
        }

        #[test]
        fn total_level_sums_classes() {
            let mut fx = Fixture::new();
            fx.class(CharacterClass::new("Fighter", Dice::d(10)), 3);
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 2);
            assert_eq!(fx.stats().total_level(), 5);
            assert_eq!(fx.stats().proficiency_bonus(), 3);
        }
    }

    mod hit_points {
        use super::*;

        #[test]
        fn single_class_d8_level_3() {
            let mut fx = Fixture::new();
            fx.score("CON", 14);
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 3);
            assert_eq!(fx.stats().max_hp(), Ok(23));
        }

        #[test]
        fn huge_levels_clamp_to_i32() {
            let mut fx = Fixture::new();
            fx.score("CON", i32::MAX);
            fx.class(CharacterClass::new("Fighter", Dice::d(10)), u32::MAX);
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), u32::MAX);
            assert_eq!(fx.stats().max_hp(), Ok(i32::MAX));
        }

        #[test]
        fn multiclass_floors_once() {
            let mut fx = Fixture::new();
            fx.score("CON", 10);
            // d8 level 2: 8 + 4.5 = 12.5; d6 level 2: 6 + 3.5 = 9.5
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 2);
            fx.class(CharacterClass::new("Wizard", Dice::d(6)), 2);
            assert_eq!(fx.stats().max_hp(), Ok(22));
        }

        #[test]
        fn negative_constitution_lowers_every_level() {
            let mut fx = Fixture::new();
            fx.score("CON", 8);
            fx.class(CharacterClass::new("Wizard", Dice::d(6)), 3);
            // 6 - 1 + 2 * (3.5 - 1) = 10
            assert_eq!(fx.stats().max_hp(), Ok(10));
        }

        #[test]
        fn missing_constitution_is_an_error() {
            let mut fx = Fixture::new();
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 3);
            assert_eq!(
                fx.stats().max_hp(),
                Err(CalculationError::missing_ability("Constitution"))
            );
        }

        #[test]
        fn class_without_hit_dice_is_an_error() {
            let mut fx = Fixture::new();
            fx.score("CON", 12);
            let mut odd = CharacterClass::new("Commoner", Dice::d(4));
            odd.hit_dice = None;
            fx.class(odd, 1);
            assert!(matches!(
                fx.stats().max_hp(),
                Err(CalculationError::MissingHitDice { .. })
            ));
        }

        #[test]
        fn breakdown_sorted_by_die_size() {
            let mut fx = Fixture::new();
            fx.class(CharacterClass::new("Barbarian", Dice::d(12)), 1);
            fx.class(CharacterClass::new("Wizard", Dice::d(6)), 4);
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 2);

            let sides: Vec<(u32, u32)> = fx
                .stats()
                .hit_dice_breakdown()
                .unwrap()
                .iter()
                .map(|e| (e.dice.sides, e.level))
                .collect();
            assert_eq!(sides, [(6, 4), (8, 2), (12, 1)]);
        }
    }

    mod skills {
        use super::*;

        #[test]
        fn skills_follow_sheet_flags() {
            let mut fx = Fixture::new();
            let str_id = fx.ability("STR");
            let dex_id = fx.ability("DEX");
            let athletics = SkillDefinition::new("Athletics", str_id);
            let stealth = SkillDefinition::new("Stealth", dex_id);
            fx.sheet.add_skill_proficiency(athletics.id);
            fx.compendium.add_skill(stealth).add_skill(athletics);
            fx.score("STR", 14);

            let skills = fx.stats().skills();
            assert_eq!(skills[0].name, "Athletics");
            assert_eq!(skills[0].effective_value(), Ok(16));
            assert_eq!(skills[0].modifier(), Ok(3));
            assert_eq!(skills[1].name, "Stealth");
            assert_eq!(
                skills[1].modifier(),
                Err(CalculationError::missing_ability("Dexterity"))
            );
        }
    }

    mod saving_throws {
        use super::*;

        #[test]
        fn any_class_grants_proficiency() {
            let mut fx = Fixture::new();
            let con = fx.ability("CON");
            let wis = fx.ability("WIS");
            fx.score("CON", 14).score("WIS", 12);
            fx.class(
                CharacterClass::new("Fighter", Dice::d(10)).with_saving_throws([con]),
                1,
            );
            fx.class(CharacterClass::new("Rogue", Dice::d(8)), 1);

            let stats = fx.stats();
            assert_eq!(stats.saving_throw(con), Ok(4));
            assert_eq!(stats.saving_throw(wis), Ok(1));

            let throws = stats.saving_throws();
            assert_eq!(throws.len(), 6);
            assert!(throws.iter().any(|t| t.short == "CON" && t.proficient));
            assert!(throws
                .iter()
                .any(|t| t.short == "STR" && t.value.is_err()));
        }
    }

    mod spellcasting {
        use super::*;

        #[test]
        fn single_caster_is_chosen_implicitly() {
            let mut fx = Fixture::new();
            let int = fx.ability("INT");
            fx.score("INT", 16);
            fx.class(
                CharacterClass::new("Wizard", Dice::d(6)).with_spellcasting_ability(int),
                1,
            );
            fx.class(CharacterClass::new("Fighter", Dice::d(10)), 1);

            assert_eq!(fx.stats().spell_attack_modifier(None), Ok(5));
            assert_eq!(fx.stats().spell_save_dc(None), Ok(13));
        }

        #[test]
        fn two_casters_need_an_explicit_class() {
            let mut fx = Fixture::new();
            let int = fx.ability("INT");
            let wis = fx.ability("WIS");
            fx.score("INT", 16).score("WIS", 14);
            fx.class(
                CharacterClass::new("Wizard", Dice::d(6)).with_spellcasting_ability(int),
                1,
            );
            let cleric = fx.class(
                CharacterClass::new("Cleric", Dice::d(8)).with_spellcasting_ability(wis),
                1,
            );

            assert!(matches!(
                fx.stats().spell_attack_modifier(None),
                Err(CalculationError::AmbiguousSpellcaster { .. })
            ));
            assert_eq!(fx.stats().spell_attack_modifier(Some(cleric)), Ok(4));
            assert_eq!(fx.stats().spell_save_dc(Some(cleric)), Ok(12));
        }

        #[test]
        fn no_caster_classes() {
            let mut fx = Fixture::new();
            let fighter = fx.class(CharacterClass::new("Fighter", Dice::d(10)), 1);
            assert_eq!(
                fx.stats().spell_save_dc(None),
                Err(CalculationError::NoSpellcaster)
            );
            assert_eq!(
                fx.stats().spell_attack_modifier(Some(fighter)),
                Err(CalculationError::NotASpellcaster {
                    class: "Fighter".into()
                })
            );
        }

        #[test]
        fn explicit_class_must_be_assigned() {
            let mut fx = Fixture::new();
            let int = fx.ability("INT");
            let wizard = CharacterClass::new("Wizard", Dice::d(6)).with_spellcasting_ability(int);
            let wizard_id = wizard.id;
            fx.compendium.add_class(wizard);

            assert_eq!(
                fx.stats().spell_attack_modifier(Some(wizard_id)),
                Err(CalculationError::ClassNotAssigned {
                    class: "Wizard".into()
                })
            );
        }

        #[test]
        fn missing_casting_score_is_an_error() {
            let mut fx = Fixture::new();
            let cha = fx.ability("CHA");
            fx.class(
                CharacterClass::new("Sorcerer", Dice::d(6)).with_spellcasting_ability(cha),
                1,
            );
            assert_eq!(
                fx.stats().spell_attack_modifier(None),
                Err(CalculationError::missing_ability("Charisma"))
            );
        }
    }

    #[test]
    fn summary_collects_everything() {
        let mut fx = Fixture::new();
        fx.score("CON", 14).score("STR", 16);
        fx.class(CharacterClass::new("Fighter", Dice::d(10)), 5);

        let summary = fx.stats().summary();
        assert_eq!(summary.level, 5);
        assert_eq!(summary.proficiency_bonus, 3);
        assert_eq!(summary.max_hp, Ok(12 + 30));
        assert_eq!(summary.ability_modifiers.len(), 2);
        assert_eq!(summary.ability_modifiers[0].short, "STR");
        assert_eq!(summary.spell_save_dc, Err(CalculationError::NoSpellcaster));
        assert_eq!(fx.stats().ability_score_by_code("str"), Some(AbilityScore::new(16)));
    }
}
