//! Character sheet presentation
//!
//! Builds the nested `CharacterSheetResponse`: every id on the sheet is
//! replaced by the reference entity it points at, and the derived block is
//! attached. Rows whose reference is missing from the compendium are skipped
//! with a warning.

use charsheet_domain::{
    Ability, CharacterClass, CharacterSheet, Compendium, DerivedSummary, Item, Race, Spell,
};
use charsheet_shared::{
    AbilityScoreDto, BackgroundDto, CharacterSheetListItem, CharacterSheetResponse, ClassDto,
    ClassLevelDto, DerivedStatsDto, DiceDto, EquipmentItemDto, HitDiceDto,
    ItemDto, ItemTypeDto, KnownSpellDto, NamedDto, RaceDto, SavingThrowDto, SkillDto, SpellDto,
    SpellSlotDto, SpellStatsResponse, StatusEffectDto, TextAbilityDto,
};

use crate::use_cases::{CharacterSheetView, SpellStats};

/// Full nested representation of a loaded sheet.
pub fn present_sheet(view: &CharacterSheetView) -> CharacterSheetResponse {
    let sheet = &view.sheet;
    let compendium = &view.compendium;

    CharacterSheetResponse {
        id: sheet.id().to_uuid(),
        owner_id: sheet.owner().to_uuid(),
        name: sheet.name().as_str().to_string(),
        race: sheet
            .race()
            .and_then(|id| resolved(sheet, "race", id, compendium.race(id)))
            .map(present_race),
        background: sheet
            .background()
            .and_then(|id| resolved(sheet, "background", id, compendium.background(id)))
            .map(|b| BackgroundDto {
                id: b.id.to_uuid(),
                name: b.name.clone(),
                feature: b.feature.clone(),
            }),
        current_hp: sheet.current_hp(),
        temp_hp: sheet.temp_hp(),
        temp_hp_reason: sheet.temp_hp_reason().map(str::to_string),
        inspiration: sheet.inspiration(),
        skill_proficiencies: sheet.skill_proficiencies().iter().map(|s| s.to_uuid()).collect(),
        skill_expertise: sheet.skill_expertise().iter().map(|s| s.to_uuid()).collect(),
        abilities: sheet
            .abilities()
            .iter()
            .filter_map(|a| {
                let ability = resolved(sheet, "ability", a.ability, compendium.ability(a.ability))?;
                Some(present_ability_score(ability, a.score.raw()))
            })
            .collect(),
        classes: sheet
            .class_levels()
            .iter()
            .filter_map(|entry| {
                let class = resolved(sheet, "class", entry.class(), compendium.class(entry.class()))?;
                Some(ClassLevelDto {
                    class: present_class(class),
                    level: entry.level(),
                })
            })
            .collect(),
        equipment: sheet
            .equipment()
            .iter()
            .filter_map(|entry| {
                let item = resolved(sheet, "item", entry.item, compendium.item(entry.item))?;
                Some(EquipmentItemDto {
                    item: present_item(item),
                    quantity: entry.quantity,
                    equipped: entry.equipped,
                    additional_info: entry.additional_info.clone(),
                })
            })
            .collect(),
        spells: sheet
            .spells()
            .iter()
            .filter_map(|known| {
                let spell = resolved(sheet, "spell", known.spell, compendium.spell(known.spell))?;
                Some(KnownSpellDto {
                    spell: present_spell(spell),
                    prepared: known.prepared,
                })
            })
            .collect(),
        spell_slots: sheet
            .spell_slots()
            .iter()
            .map(|s| SpellSlotDto {
                level: s.level,
                quantity: s.quantity,
            })
            .collect(),
        status_effects: sheet
            .status_effects()
            .iter()
            .filter_map(|active| {
                let effect = resolved(
                    sheet,
                    "status effect",
                    active.effect,
                    compendium.status_effect(active.effect),
                )?;
                Some(StatusEffectDto {
                    effect: NamedDto {
                        id: effect.id.to_uuid(),
                        name: effect.name.clone(),
                    },
                    remaining_rounds: active.remaining.rounds(),
                    remaining: active.remaining.to_clock_time().to_string(),
                })
            })
            .collect(),
        derived: present_derived(view.derived().summary(), compendium),
    }
}

/// The `derived` block. Calculation errors become `unavailable` values.
pub fn present_derived(summary: DerivedSummary, compendium: &Compendium) -> DerivedStatsDto {
    DerivedStatsDto {
        level: summary.level,
        proficiency_bonus: summary.proficiency_bonus,
        max_hp: summary.max_hp.into(),
        hit_dice: summary
            .hit_dice
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|e| HitDiceDto {
                        class_id: e.class.to_uuid(),
                        dice: e.dice.name,
                        sides: e.dice.sides,
                        level: e.level,
                    })
                    .collect()
            })
            .into(),
        skills: summary
            .skills
            .iter()
            .map(|skill| SkillDto {
                id: skill.id.to_uuid(),
                name: skill.name.clone(),
                ability: skill
                    .ability
                    .and_then(|id| compendium.ability(id))
                    .map(Ability::short),
                proficient: skill.proficient,
                expertise: skill.expertise,
                value: skill.effective_value().into(),
                modifier: skill.modifier().into(),
            })
            .collect(),
        saving_throws: summary
            .saving_throws
            .into_iter()
            .map(|save| SavingThrowDto {
                ability_id: save.ability.to_uuid(),
                ability: save.short,
                proficient: save.proficient,
                value: save.value.into(),
            })
            .collect(),
        spell_attack_modifier: summary.spell_attack_modifier.into(),
        spell_save_dc: summary.spell_save_dc.into(),
    }
}

/// Row for character lists.
pub fn present_list_item(sheet: &CharacterSheet) -> CharacterSheetListItem {
    CharacterSheetListItem {
        id: sheet.id().to_uuid(),
        name: sheet.name().as_str().to_string(),
        level: sheet.total_level(),
    }
}

pub fn present_spell_stats(stats: &SpellStats) -> SpellStatsResponse {
    SpellStatsResponse {
        class_id: stats.class.to_uuid(),
        attack_modifier: stats.attack_modifier,
        save_dc: stats.save_dc,
    }
}

// =============================================================================
// Reference data
// =============================================================================

fn resolved<'a, T>(
    sheet: &CharacterSheet,
    kind: &'static str,
    id: impl std::fmt::Display,
    found: Option<&'a T>,
) -> Option<&'a T> {
    if found.is_none() {
        tracing::warn!(
            character_id = %sheet.id(),
            reference = kind,
            id = %id,
            "Character references data missing from the compendium"
        );
    }
    found
}

fn present_ability_score(ability: &Ability, value: i32) -> AbilityScoreDto {
    AbilityScoreDto {
        ability_id: ability.id.to_uuid(),
        name: ability.name.clone(),
        short: ability.short(),
        value,
        modifier: charsheet_domain::ability_modifier(value),
    }
}

fn present_race(race: &Race) -> RaceDto {
    RaceDto {
        id: race.id.to_uuid(),
        name: race.name.clone(),
        speed: race.speed,
        size: race.size.as_ref().map(|s| NamedDto {
            id: s.id.to_uuid(),
            name: s.name.clone(),
        }),
        languages: race
            .languages
            .iter()
            .map(|l| NamedDto {
                id: l.id.to_uuid(),
                name: l.name.clone(),
            })
            .collect(),
        abilities: race
            .abilities
            .iter()
            .map(|a| TextAbilityDto {
                id: a.id.to_uuid(),
                name: a.name.clone(),
                description: a.description.clone(),
            })
            .collect(),
    }
}

fn present_class(class: &CharacterClass) -> ClassDto {
    ClassDto {
        id: class.id.to_uuid(),
        name: class.name.clone(),
        hit_dice: class.hit_dice.as_ref().map(|d| DiceDto {
            id: d.id.to_uuid(),
            name: d.name.clone(),
            sides: d.sides,
        }),
        saving_throw_proficiencies: class
            .saving_throw_proficiencies
            .iter()
            .map(|a| a.to_uuid())
            .collect(),
        spellcasting_ability: class.spellcasting_ability.map(|a| a.to_uuid()),
    }
}

fn present_item(item: &Item) -> ItemDto {
    ItemDto {
        id: item.id.to_uuid(),
        name: item.name.clone(),
        description: item.description.clone(),
        price: item.price,
        item_type: item.item_type.as_ref().map(|t| ItemTypeDto {
            id: t.id.to_uuid(),
            name: t.name.clone(),
            equipable_attack: t.equipable_attack,
            equipable_defense: t.equipable_defense,
            consumable: t.consumable,
        }),
    }
}

fn present_spell(spell: &Spell) -> SpellDto {
    SpellDto {
        id: spell.id.to_uuid(),
        name: spell.name.clone(),
        level: spell.level,
        casting_time_rounds: spell.casting_time.rounds(),
        duration: spell.duration.to_clock_time().to_string(),
        components: spell.components.summary(),
        material: spell.components.material.clone(),
        range: spell.range,
        description: spell.description.clone(),
        ritual: spell.ritual,
        spell_type: spell.spell_type.as_ref().map(|t| NamedDto {
            id: t.id.to_uuid(),
            name: t.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_domain::{
        standard_abilities, CharacterName, ClassId, Dice, SkillDefinition, UserId,
    };
    use charsheet_shared::DerivedValue;

    fn view() -> CharacterSheetView {
        let mut compendium = Compendium::new();
        for ability in standard_abilities() {
            compendium.add_ability(ability);
        }
        let con = compendium.ability_by_code("CON").unwrap().id;
        let dex = compendium.ability_by_code("DEX").unwrap().id;
        let rogue = CharacterClass::new("Rogue", Dice::d(8));
        let stealth = SkillDefinition::new("Stealth", dex);

        let mut sheet = CharacterSheet::new(UserId::new(), CharacterName::new("Lidda").unwrap());
        sheet.set_ability_score(con, 14);
        sheet.set_ability_score(dex, 17);
        sheet.add_class_level(rogue.id, 3).unwrap();
        sheet.add_class_level(ClassId::new(), 1).unwrap();
        sheet.add_skill_proficiency(stealth.id);
        sheet.add_skill_expertise(stealth.id);

        compendium.add_class(rogue).add_skill(stealth);
        CharacterSheetView { sheet, compendium }
    }

    #[test]
    fn nested_sheet_skips_unknown_references() {
        let response = present_sheet(&view());
        assert_eq!(response.name, "Lidda");
        assert_eq!(response.classes.len(), 1);
        assert_eq!(response.classes[0].class.name, "Rogue");
        let shorts: Vec<&str> = response.abilities.iter().map(|a| a.short.as_str()).collect();
        assert_eq!(shorts, ["CON", "DEX"]);
        assert_eq!(response.abilities[1].modifier, 3);
    }

    #[test]
    fn derived_block_reports_errors_as_unavailable() {
        let response = present_sheet(&view());
        let derived = &response.derived;
        assert_eq!(derived.level, 4);
        assert_eq!(derived.proficiency_bonus, 2);
        // the second class is missing from the compendium
        assert!(!derived.max_hp.is_available());
        assert!(!derived.spell_save_dc.is_available());
        assert_eq!(derived.skills[0].value, DerivedValue::available(21));
        assert_eq!(derived.skills[0].modifier, DerivedValue::available(5));
        assert_eq!(derived.skills[0].ability.as_deref(), Some("DEX"));
    }

    #[test]
    fn list_item_sums_levels() {
        let item = present_list_item(&view().sheet);
        assert_eq!(item.level, 4);
    }

    #[test]
    fn list_item_level_saturates() {
        let mut sheet = view().sheet;
        sheet.set_class_level(ClassId::new(), u32::MAX).unwrap();
        assert_eq!(present_list_item(&sheet).level, u32::MAX);
    }

    #[test]
    fn spell_stats_keep_class_id() {
        let class = ClassId::new();
        let response = present_spell_stats(&SpellStats {
            class,
            attack_modifier: 5,
            save_dc: 13,
        });
        assert_eq!(response.class_id, class.to_uuid());
        assert_eq!(response.attack_modifier, 5);
        assert_eq!(response.save_dc, 13);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["attackModifier"], 5);
        assert_eq!(json["saveDc"], 13);
    }
}
