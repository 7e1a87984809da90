use charsheet_domain::{
    ability_modifier, proficiency_bonus, skill_value, AbilityScore, ClockTime, Duration,
    InvalidDurationError,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn modifier_matches_floor_division(raw in 1i32..=30) {
        let expected = ((f64::from(raw) - 10.0) / 2.0).floor() as i32;
        prop_assert_eq!(AbilityScore::new(raw).modifier(), expected);
        prop_assert!((-5..=10).contains(&ability_modifier(raw)));
    }

    #[test]
    fn modifier_is_monotonic(raw in i32::MIN..i32::MAX) {
        prop_assert!(ability_modifier(raw) <= ability_modifier(raw + 1));
    }

    #[test]
    fn modifier_defined_for_every_score(raw in any::<i32>()) {
        let expected = (i64::from(raw) - 10).div_euclid(2);
        prop_assert_eq!(i64::from(ability_modifier(raw)), expected);
    }

    #[test]
    fn duration_round_trips_through_clock_time(rounds in 0u32..=u32::MAX) {
        let duration = Duration::from_rounds(rounds);
        let clock = duration.to_clock_time();
        prop_assert!(clock.minutes < 60);
        prop_assert!(clock.seconds < 60);
        prop_assert_eq!(clock.seconds % 6, 0);
        prop_assert_eq!(Duration::from_clock_time(clock), Ok(duration));
    }

    #[test]
    fn duration_text_round_trips(rounds in 0u32..10_000_000) {
        let text = Duration::from_rounds(rounds).to_clock_time().to_string();
        let parsed: ClockTime = text.parse().unwrap();
        prop_assert_eq!(Duration::try_from(parsed).map(|d| d.rounds()), Ok(rounds));
    }

    #[test]
    fn partial_rounds_are_rejected(
        hours in 0u32..100,
        minutes in 0u32..60,
        seconds in (0u32..60).prop_filter("not a whole round", |s| s % 6 != 0),
    ) {
        prop_assert_eq!(
            Duration::from_clock_time(ClockTime::new(hours, minutes, seconds)),
            Err(InvalidDurationError::NotWholeRounds { seconds })
        );
    }

    #[test]
    fn proficiency_bonus_stays_in_range(level in 0u32..=u32::MAX) {
        let bonus = proficiency_bonus(level);
        prop_assert!((2..=6).contains(&bonus));
        prop_assert!(proficiency_bonus(level.saturating_add(1)) >= bonus);
    }

    #[test]
    fn training_never_lowers_a_skill(raw in i32::MIN..=i32::MAX - 4, proficient in any::<bool>(), expertise in any::<bool>()) {
        let trained = skill_value(raw, proficient, expertise);
        prop_assert!(trained >= raw);
        prop_assert_eq!(trained - raw, 2 * i32::from(proficient) + 2 * i32::from(expertise));
    }
}

#[test]
fn proficiency_bonus_reference_levels() {
    for (level, bonus) in [(1, 2), (4, 2), (5, 3), (20, 6), (100, 6)] {
        assert_eq!(proficiency_bonus(level), bonus, "level {level}");
    }
}
