//! Character sheet use cases.
//!
//! Loads sheets together with the compendium they reference, applies edits
//! through the aggregate's mutators, and computes derived statistics.

mod error;

pub use error::CharacterSheetError;

use std::sync::Arc;

use charsheet_domain::{
    AbilityScore, CharacterId, CharacterName, CharacterSheet, ClassId, Compendium, DerivedStats,
    DomainError, StatusEffectId, UserId,
};

use crate::infrastructure::ports::{CharacterSheetRepo, ReferenceRepo};

// =============================================================================
// Result Types
// =============================================================================

/// A sheet loaded with the reference data needed to derive its statistics.
#[derive(Debug, Clone)]
pub struct CharacterSheetView {
    pub sheet: CharacterSheet,
    pub compendium: Compendium,
}

impl CharacterSheetView {
    pub fn derived(&self) -> DerivedStats<'_> {
        DerivedStats::new(&self.sheet, &self.compendium)
    }
}

/// Spell statistics for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellStats {
    pub class: ClassId,
    pub attack_modifier: i32,
    pub save_dc: i32,
}

// =============================================================================
// Use Cases
// =============================================================================

/// Container for character sheet use cases.
pub struct CharacterSheetUseCases {
    sheets: Arc<dyn CharacterSheetRepo>,
    reference: Arc<dyn ReferenceRepo>,
}

impl CharacterSheetUseCases {
    pub fn new(sheets: Arc<dyn CharacterSheetRepo>, reference: Arc<dyn ReferenceRepo>) -> Self {
        Self { sheets, reference }
    }

    /// Load a sheet with its compendium.
    pub async fn get_sheet(
        &self,
        character_id: CharacterId,
    ) -> Result<CharacterSheetView, CharacterSheetError> {
        let sheet = self.load(character_id).await?;
        let compendium = self.reference.load_compendium().await?;
        Ok(CharacterSheetView { sheet, compendium })
    }

    /// All sheets owned by `owner`, sorted by name.
    pub async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<CharacterSheet>, CharacterSheetError> {
        Ok(self.sheets.list_for_owner(owner).await?)
    }

    /// Create and store an empty sheet.
    pub async fn create(
        &self,
        owner: UserId,
        name: impl Into<String>,
    ) -> Result<CharacterSheet, CharacterSheetError> {
        let sheet = CharacterSheet::new(owner, CharacterName::new(name)?);
        self.sheets.save(&sheet).await?;

        tracing::info!(
            character_id = %sheet.id(),
            owner_id = %owner,
            "Created character sheet"
        );
        Ok(sheet)
    }

    /// Store a sheet after checking every reference resolves.
    pub async fn save(&self, sheet: &CharacterSheet) -> Result<(), CharacterSheetError> {
        let compendium = self.reference.load_compendium().await?;
        check_references(sheet, &compendium)?;
        self.sheets.save(sheet).await?;

        tracing::debug!(character_id = %sheet.id(), "Saved character sheet");
        Ok(())
    }

    pub async fn delete(&self, character_id: CharacterId) -> Result<(), CharacterSheetError> {
        self.sheets.delete(character_id).await.map_err(|e| {
            if e.is_not_found() {
                CharacterSheetError::CharacterNotFound(character_id)
            } else {
                e.into()
            }
        })?;

        tracing::info!(character_id = %character_id, "Deleted character sheet");
        Ok(())
    }

    /// Set the score for the ability named by `code` ("STR", "Wisdom").
    pub async fn set_ability_score(
        &self,
        character_id: CharacterId,
        code: &str,
        value: i32,
    ) -> Result<AbilityScore, CharacterSheetError> {
        let score = AbilityScore::new(value);
        if !score.is_within_rules() {
            return Err(DomainError::validation(format!(
                "Ability score must be between {} and {}, got {}",
                AbilityScore::MIN,
                AbilityScore::MAX,
                value
            ))
            .into());
        }

        let compendium = self.reference.load_compendium().await?;
        let ability = compendium
            .ability_by_code(code)
            .ok_or_else(|| CharacterSheetError::UnknownAbility(code.to_string()))?;

        let mut sheet = self.load(character_id).await?;
        sheet.set_ability_score(ability.id, score);
        self.sheets.save(&sheet).await?;

        tracing::info!(
            character_id = %character_id,
            ability = %ability.short(),
            score = value,
            "Set ability score"
        );
        Ok(score)
    }

    /// Set the character's level in a class, adding the class if needed.
    pub async fn set_class_level(
        &self,
        character_id: CharacterId,
        class: ClassId,
        level: u32,
    ) -> Result<CharacterSheetView, CharacterSheetError> {
        let compendium = self.reference.load_compendium().await?;
        if compendium.class(class).is_none() {
            return Err(CharacterSheetError::UnknownReference {
                entity_type: "Class",
                id: class.to_string(),
            });
        }

        let mut sheet = self.load(character_id).await?;
        sheet.set_class_level(class, level)?;
        self.sheets.save(&sheet).await?;

        tracing::info!(
            character_id = %character_id,
            class_id = %class,
            level,
            "Set class level"
        );
        Ok(CharacterSheetView { sheet, compendium })
    }

    /// Spell attack modifier and save DC for an explicit class.
    pub async fn spell_stats(
        &self,
        character_id: CharacterId,
        class: ClassId,
    ) -> Result<SpellStats, CharacterSheetError> {
        let view = self.get_sheet(character_id).await?;
        let derived = view.derived();
        Ok(SpellStats {
            class,
            attack_modifier: derived.spell_attack_modifier(Some(class))?,
            save_dc: derived.spell_save_dc(Some(class))?,
        })
    }

    /// Advance in-game time, expiring status effects that run out.
    pub async fn advance_rounds(
        &self,
        character_id: CharacterId,
        rounds: u32,
    ) -> Result<Vec<StatusEffectId>, CharacterSheetError> {
        let mut sheet = self.load(character_id).await?;
        let expired = sheet.advance_rounds(rounds);
        self.sheets.save(&sheet).await?;

        tracing::debug!(
            character_id = %character_id,
            rounds,
            expired = expired.len(),
            "Advanced rounds"
        );
        Ok(expired)
    }

    async fn load(&self, character_id: CharacterId) -> Result<CharacterSheet, CharacterSheetError> {
        self.sheets
            .get(character_id)
            .await?
            .ok_or(CharacterSheetError::CharacterNotFound(character_id))
    }
}

/// Fail on the first sheet reference the compendium cannot resolve.
fn check_references(
    sheet: &CharacterSheet,
    compendium: &Compendium,
) -> Result<(), CharacterSheetError> {
    fn unknown(entity_type: &'static str, id: impl ToString) -> CharacterSheetError {
        CharacterSheetError::UnknownReference {
            entity_type,
            id: id.to_string(),
        }
    }

    if let Some(race) = sheet.race().filter(|id| compendium.race(*id).is_none()) {
        return Err(unknown("Race", race));
    }
    if let Some(background) = sheet
        .background()
        .filter(|id| compendium.background(*id).is_none())
    {
        return Err(unknown("Background", background));
    }
    if let Some(a) = sheet
        .abilities()
        .iter()
        .find(|a| compendium.ability(a.ability).is_none())
    {
        return Err(unknown("Ability", a.ability));
    }
    if let Some(c) = sheet
        .class_levels()
        .iter()
        .find(|c| compendium.class(c.class()).is_none())
    {
        return Err(unknown("Class", c.class()));
    }
    if let Some(skill) = sheet
        .skill_proficiencies()
        .iter()
        .chain(sheet.skill_expertise())
        .find(|s| compendium.skill(**s).is_none())
    {
        return Err(unknown("Skill", skill));
    }
    if let Some(e) = sheet
        .equipment()
        .iter()
        .find(|e| compendium.item(e.item).is_none())
    {
        return Err(unknown("Item", e.item));
    }
    if let Some(s) = sheet
        .spells()
        .iter()
        .find(|s| compendium.spell(s.spell).is_none())
    {
        return Err(unknown("Spell", s.spell));
    }
    if let Some(e) = sheet
        .status_effects()
        .iter()
        .find(|e| compendium.status_effect(e.effect).is_none())
    {
        return Err(unknown("StatusEffect", e.effect));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterSheetRepo, MockReferenceRepo, RepoError};
    use charsheet_domain::{
        standard_abilities, CalculationError, CharacterClass, Dice, ItemId,
    };
    use mockall::predicate::*;

    struct Fixture {
        compendium: Compendium,
        sheet: CharacterSheet,
    }

    fn fixture() -> Fixture {
        let mut compendium = Compendium::new();
        for ability in standard_abilities() {
            compendium.add_ability(ability);
        }
        let int = compendium.ability_by_code("INT").unwrap().id;
        let wis = compendium.ability_by_code("WIS").unwrap().id;
        let wizard = CharacterClass::new("Wizard", Dice::d(6)).with_spellcasting_ability(int);
        let cleric = CharacterClass::new("Cleric", Dice::d(8)).with_spellcasting_ability(wis);
        let fighter = CharacterClass::new("Fighter", Dice::d(10));

        let mut sheet =
            CharacterSheet::new(UserId::new(), CharacterName::new("Eberk").unwrap());
        sheet.set_ability_score(int, 16);
        sheet.set_ability_score(wis, 14);
        sheet.add_class_level(wizard.id, 1).unwrap();
        sheet.add_class_level(cleric.id, 1).unwrap();

        compendium.add_class(wizard).add_class(cleric).add_class(fighter);
        Fixture { compendium, sheet }
    }

    fn reference_returning(compendium: &Compendium) -> MockReferenceRepo {
        let mut reference = MockReferenceRepo::new();
        let compendium = compendium.clone();
        reference
            .expect_load_compendium()
            .returning(move || Ok(compendium.clone()));
        reference
    }

    fn sheets_returning(sheet: &CharacterSheet) -> MockCharacterSheetRepo {
        let mut sheets = MockCharacterSheetRepo::new();
        let stored = sheet.clone();
        sheets
            .expect_get()
            .with(eq(sheet.id()))
            .returning(move |_| Ok(Some(stored.clone())));
        sheets
    }

    fn class_named(compendium: &Compendium, name: &str) -> ClassId {
        compendium
            .classes()
            .iter()
            .find(|c| c.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn get_sheet_missing_character() {
        let mut sheets = MockCharacterSheetRepo::new();
        sheets.expect_get().returning(|_| Ok(None));
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets),
            Arc::new(MockReferenceRepo::new()),
        );

        let id = CharacterId::new();
        let err = use_cases.get_sheet(id).await.unwrap_err();
        assert!(matches!(err, CharacterSheetError::CharacterNotFound(found) if found == id));
    }

    #[tokio::test]
    async fn get_sheet_derives_from_loaded_compendium() {
        let fx = fixture();
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets_returning(&fx.sheet)),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let view = use_cases.get_sheet(fx.sheet.id()).await.unwrap();
        assert_eq!(view.derived().total_level(), 2);
        assert!(matches!(
            view.derived().spell_save_dc(None),
            Err(CalculationError::AmbiguousSpellcaster { .. })
        ));
    }

    #[tokio::test]
    async fn spell_stats_for_explicit_class() {
        let fx = fixture();
        let wizard = class_named(&fx.compendium, "Wizard");
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets_returning(&fx.sheet)),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let stats = use_cases.spell_stats(fx.sheet.id(), wizard).await.unwrap();
        assert_eq!(
            stats,
            SpellStats {
                class: wizard,
                attack_modifier: 5,
                save_dc: 13
            }
        );
    }

    #[tokio::test]
    async fn spell_stats_for_unassigned_class_is_a_calculation_error() {
        let fx = fixture();
        let fighter = class_named(&fx.compendium, "Fighter");
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets_returning(&fx.sheet)),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let err = use_cases.spell_stats(fx.sheet.id(), fighter).await.unwrap_err();
        assert!(matches!(
            err,
            CharacterSheetError::Calculation(CalculationError::ClassNotAssigned { .. })
        ));
    }

    #[tokio::test]
    async fn set_ability_score_saves_updated_sheet() {
        let fx = fixture();
        let str_id = fx.compendium.ability_by_code("STR").unwrap().id;
        let mut sheets = sheets_returning(&fx.sheet);
        sheets
            .expect_save()
            .withf(move |sheet| sheet.ability_score(str_id) == Some(AbilityScore::new(18)))
            .times(1)
            .returning(|_| Ok(()));
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let score = use_cases
            .set_ability_score(fx.sheet.id(), "str", 18)
            .await
            .unwrap();
        assert_eq!(score.modifier(), 4);
    }

    #[tokio::test]
    async fn set_ability_score_rejects_out_of_range_values() {
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(MockCharacterSheetRepo::new()),
            Arc::new(MockReferenceRepo::new()),
        );

        let err = use_cases
            .set_ability_score(CharacterId::new(), "STR", 31)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CharacterSheetError::Domain(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn set_ability_score_rejects_unknown_code() {
        let fx = fixture();
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(MockCharacterSheetRepo::new()),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let err = use_cases
            .set_ability_score(fx.sheet.id(), "LCK", 12)
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterSheetError::UnknownAbility(code) if code == "LCK"));
    }

    #[tokio::test]
    async fn set_class_level_requires_known_class() {
        let fx = fixture();
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(MockCharacterSheetRepo::new()),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let err = use_cases
            .set_class_level(fx.sheet.id(), ClassId::new(), 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CharacterSheetError::UnknownReference {
                entity_type: "Class",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn set_class_level_updates_level() {
        let fx = fixture();
        let wizard = class_named(&fx.compendium, "Wizard");
        let mut sheets = sheets_returning(&fx.sheet);
        sheets.expect_save().times(1).returning(|_| Ok(()));
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let view = use_cases
            .set_class_level(fx.sheet.id(), wizard, 5)
            .await
            .unwrap();
        assert_eq!(view.derived().total_level(), 6);
        assert_eq!(view.derived().proficiency_bonus(), 3);
    }

    #[tokio::test]
    async fn save_rejects_unknown_references() {
        let mut fx = fixture();
        fx.sheet
            .add_equipment(charsheet_domain::EquipmentItem::new(ItemId::new(), 1))
            .unwrap();
        let mut sheets = MockCharacterSheetRepo::new();
        sheets.expect_save().never();
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets),
            Arc::new(reference_returning(&fx.compendium)),
        );

        let err = use_cases.save(&fx.sheet).await.unwrap_err();
        assert!(matches!(
            err,
            CharacterSheetError::UnknownReference {
                entity_type: "Item",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn delete_missing_maps_to_not_found() {
        let mut sheets = MockCharacterSheetRepo::new();
        sheets
            .expect_delete()
            .returning(|id| Err(RepoError::not_found("CharacterSheet", id)));
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(sheets),
            Arc::new(MockReferenceRepo::new()),
        );

        let id = CharacterId::new();
        let err = use_cases.delete(id).await.unwrap_err();
        assert!(matches!(err, CharacterSheetError::CharacterNotFound(found) if found == id));
    }

    #[tokio::test]
    async fn create_rejects_blank_names() {
        let use_cases = CharacterSheetUseCases::new(
            Arc::new(MockCharacterSheetRepo::new()),
            Arc::new(MockReferenceRepo::new()),
        );

        let err = use_cases.create(UserId::new(), "   ").await.unwrap_err();
        assert!(matches!(err, CharacterSheetError::Domain(_)));
    }
}
