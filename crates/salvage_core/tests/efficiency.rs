use salvage_core::core_api::CoreErrorCode;
use salvage_core::{EfficiencyTier, ReprocessingEfficiency, SkillLevels};

#[test]
fn accepts_closed_interval_bounds() {
    assert!(ReprocessingEfficiency::new(0.5).is_ok());
    assert!(ReprocessingEfficiency::new(0.69575).is_ok());
    assert!(ReprocessingEfficiency::new(0.6).is_ok());
}

#[test]
fn rejects_out_of_range_and_non_finite() {
    for value in [0.499, 0.696, 1.0, -0.5, f64::NAN, f64::INFINITY] {
        let err = ReprocessingEfficiency::new(value).expect_err("value should be rejected");
        assert_eq!(err.code, CoreErrorCode::InvalidEfficiency);
    }
}

#[test]
fn clamped_pins_to_bounds() {
    assert_eq!(ReprocessingEfficiency::clamped(0.1).value(), 0.5);
    assert_eq!(ReprocessingEfficiency::clamped(0.9).value(), 0.69575);
    assert_eq!(ReprocessingEfficiency::clamped(f64::NAN).value(), 0.5);
    assert_eq!(ReprocessingEfficiency::clamped(0.61).value(), 0.61);
}

#[test]
fn skill_formula_matches_game_bonuses() {
    let none = ReprocessingEfficiency::from_skills(SkillLevels::default()).expect("valid");
    assert_eq!(none.value(), 0.5);

    let maxed = ReprocessingEfficiency::from_skills(SkillLevels::maxed()).expect("valid");
    assert!((maxed.value() - 0.69575).abs() < 1e-9);
    assert!(maxed.value() <= ReprocessingEfficiency::MAX);

    let partial = ReprocessingEfficiency::from_skills(SkillLevels::new(5, 4, 3)).expect("valid");
    assert!((partial.value() - 0.65826).abs() < 0.001);
}

#[test]
fn skill_levels_above_five_are_rejected() {
    let err = ReprocessingEfficiency::from_skills(SkillLevels::new(6, 0, 0))
        .expect_err("level 6 should fail");
    assert_eq!(err.code, CoreErrorCode::InvalidSkillLevel);
}

#[test]
fn skill_levels_parse_from_comma_list() {
    assert_eq!(
        SkillLevels::parse("5, 4,3").expect("should parse"),
        SkillLevels::new(5, 4, 3)
    );
    assert!(SkillLevels::parse("5,4").is_err());
    assert!(SkillLevels::parse("5,4,x").is_err());
    assert!(SkillLevels::parse("5,4,9").is_err());
}

#[test]
fn tiers_and_labels() {
    assert_eq!(ReprocessingEfficiency::default().tier(), EfficiencyTier::Basic);
    assert_eq!(ReprocessingEfficiency::default().label(), "Basic Skills (50%)");
    assert_eq!(EfficiencyTier::from_value(0.55), EfficiencyTier::Intermediate);
    assert_eq!(EfficiencyTier::from_value(0.6), EfficiencyTier::Advanced);
    assert_eq!(EfficiencyTier::from_value(0.69575), EfficiencyTier::Perfect);
    assert_eq!(
        EfficiencyTier::Perfect.label(),
        "Perfect Skills (69.575%)"
    );
}

#[test]
fn display_is_percent_with_two_decimals() {
    let efficiency = ReprocessingEfficiency::new(0.6).expect("valid");
    assert_eq!(efficiency.to_string(), "60.00%");
    assert_eq!(ReprocessingEfficiency::default().to_string(), "50.00%");
}
