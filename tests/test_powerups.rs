use typing_rush::entities::{PowerUpKind, Rarity};
use typing_rush::powerups::*;

#[test]
fn epic_speed_scales_duration_and_multiplier() {
    let mut p = PowerUpSystem::new();
    let up = p.activate_power_up(PowerUpKind::Speed, Rarity::Epic, 0.0);
    assert!((up.duration - 4800.0).abs() < 1e-9);
    assert!((up.multiplier - 2.4).abs() < 1e-9);
}

#[test]
fn unit_multiplier_is_not_scaled() {
    let mut p = PowerUpSystem::new();
    let up = p.activate_power_up(PowerUpKind::Shield, Rarity::Rare, 0.0);
    assert_eq!(up.multiplier, 1.0);
    assert!((up.duration - 5200.0).abs() < 1e-9);
}

#[test]
fn freeze_multiplier_stays_zero() {
    let mut p = PowerUpSystem::new();
    let up = p.activate_power_up(PowerUpKind::Freeze, Rarity::Epic, 0.0);
    assert_eq!(up.multiplier, 0.0);
}

#[test]
fn same_kind_replaces_running_instance() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    p.activate_power_up(PowerUpKind::Speed, Rarity::Rare, 1000.0);

    assert_eq!(p.active().len(), 1);
    let up = p.get_power_up(PowerUpKind::Speed).unwrap();
    assert_eq!(up.start_time, 1000.0);
    assert_eq!(up.rarity, Rarity::Rare);
}

#[test]
fn different_kinds_stack() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    p.activate_power_up(PowerUpKind::Shield, Rarity::Common, 0.0);
    assert_eq!(p.active().len(), 2);
    assert!(p.is_active(PowerUpKind::Speed));
    assert!(p.is_active(PowerUpKind::Shield));
    assert!(!p.is_active(PowerUpKind::Freeze));
}

#[test]
fn timed_power_up_expires() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    p.update_power_ups(2999.0);
    assert!(p.is_active(PowerUpKind::Speed));
    p.update_power_ups(3000.0);
    assert!(!p.is_active(PowerUpKind::Speed));
}

#[test]
fn update_is_idempotent_for_same_now() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    p.activate_power_up(PowerUpKind::Multiplier, Rarity::Common, 0.0);

    p.update_power_ups(1_500.0);
    let before = p.clone();
    p.update_power_ups(1_500.0);
    assert_eq!(p, before);
    p.update_power_ups(1_500.0);
    assert_eq!(p, before);
    assert_eq!(p.active().len(), 2);
}

#[test]
fn time_remaining_in_millis() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::TimeWarp, Rarity::Common, 0.0);
    assert_eq!(
        p.get_time_remaining(PowerUpKind::TimeWarp, 1000.0),
        Some(Remaining::Millis(4000.0))
    );
    assert_eq!(p.get_time_remaining(PowerUpKind::Freeze, 1000.0), None);
}

#[test]
fn multiplier_counts_words_not_time() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Multiplier, Rarity::Common, 0.0);
    assert_eq!(
        p.get_time_remaining(PowerUpKind::Multiplier, 0.0),
        Some(Remaining::Words(3))
    );

    p.update_power_ups(100_000.0);
    assert!(p.is_active(PowerUpKind::Multiplier));

    for _ in 0..3 {
        p.consume_multiplier_use();
    }
    p.update_power_ups(100_000.0);
    assert!(!p.is_active(PowerUpKind::Multiplier));
}

#[test]
fn multiplier_of_reports_active_value() {
    let mut p = PowerUpSystem::new();
    assert_eq!(p.multiplier_of(PowerUpKind::Multiplier), None);
    p.activate_power_up(PowerUpKind::Multiplier, Rarity::Common, 0.0);
    assert_eq!(p.multiplier_of(PowerUpKind::Multiplier), Some(2.0));
}

#[test]
fn base_effects_table() {
    assert_eq!(base_effect(PowerUpKind::Speed).duration, 3000.0);
    assert_eq!(base_effect(PowerUpKind::TimeWarp).multiplier, 0.5);
    assert_eq!(base_effect(PowerUpKind::Multiplier).words, Some(3));
    assert_eq!(base_effect(PowerUpKind::LaserFocus).duration, 6000.0);
}

#[test]
fn reset_clears_everything() {
    let mut p = PowerUpSystem::new();
    p.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    p.activate_power_up(PowerUpKind::Freeze, Rarity::Epic, 0.0);
    p.reset();
    assert!(p.active().is_empty());
}
