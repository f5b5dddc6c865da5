use typing_rush::boss::BossKind;
use typing_rush::compute::*;
use typing_rush::config::GameConfig;
use typing_rush::entities::*;
use typing_rush::error::GameError;
use typing_rush::words::WordSource;

use rand::rngs::StdRng;
use rand::SeedableRng;

const BOSS_POOL: [&str; 8] = ["ant", "bee", "cow", "doe", "eel", "fox", "gnu", "hen"];

/// Always offers "cat" / "dog"; the first slot may carry a power-up.
struct FixedWords {
    drop: Option<PowerUpDrop>,
}

impl WordSource for FixedWords {
    fn next_word_pair(&mut self, _score: u64) -> WordPair {
        WordPair {
            words: ["cat".to_string(), "dog".to_string()],
            power_ups: [self.drop, None],
        }
    }

    fn next_frenzy_sentence(&mut self) -> FrenzySentence {
        FrenzySentence {
            theme: "test".to_string(),
            words: vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
        }
    }

    fn boss_word_pool(&mut self, theme: &str, count: usize) -> Result<Vec<String>, GameError> {
        if count > BOSS_POOL.len() {
            return Err(GameError::BossWordPool {
                theme: theme.to_string(),
                needed: count,
                available: BOSS_POOL.len(),
            });
        }
        Ok(BOSS_POOL.iter().take(count).map(|w| w.to_string()).collect())
    }
}

fn make_words() -> FixedWords {
    FixedWords { drop: None }
}

fn make_state() -> GameState {
    init_state(GameConfig::default(), &mut make_words(), 0.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Type `word` one key per 100 ms starting at `start`.
fn type_word(
    mut s: GameState,
    word: &str,
    start: Millis,
    words: &mut FixedWords,
    rng: &mut StdRng,
) -> GameState {
    for (i, c) in word.chars().enumerate() {
        s = push_char(&s, c, start + i as f64 * 100.0, words, rng);
    }
    s
}

/// Golem boss in combat from t=0 with limbs ant / bee / cow / doe.
fn state_in_boss_fight() -> GameState {
    let mut s = make_state();
    let pool = BOSS_POOL.iter().take(4).map(|w| w.to_string()).collect();
    s.boss.start(BossKind::SyntaxGolem, pool, 45_000.0, 0.0, 0.0).unwrap();
    s
}

/// Frenzy triggered by the fifth word, completed at t=300.
fn state_in_frenzy(words: &mut FixedWords, rng: &mut StdRng) -> GameState {
    let mut s = make_state();
    s.words_since_frenzy = 4;
    type_word(s, "cat", 100.0, words, rng)
}

// ── init_state / restart ──────────────────────────────────────────────────────

#[test]
fn init_state_defaults() {
    let s = make_state();
    assert_eq!(s.player.position, 0.5);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.pair.words, ["cat".to_string(), "dog".to_string()]);
    assert_eq!(s.active_branch, Branch::First);
    assert_eq!(s.background.scroll_speed, 1.5);
    assert!(s.typing.current_input.is_empty());
    assert!(!s.in_sub_mode());
}

#[test]
fn restart_carries_high_score() {
    let mut s = make_state();
    s.scoring.score = 50.0;
    let over = game_over(&s, GameOverReason::DangerWall, 1_000.0);
    let fresh = restart(&over, &mut make_words(), 2_000.0);
    assert_eq!(fresh.high_score, 50);
    assert_eq!(fresh.scoring.score, 0.0);
    assert_eq!(fresh.status, GameStatus::Playing);
}

// ── Normal typing ─────────────────────────────────────────────────────────────

#[test]
fn correct_key_moves_forward() {
    let s = push_char(&make_state(), 'c', 100.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.typing.current_input, "c");
    assert!((s.player.speed - 0.1).abs() < 1e-9);
}

#[test]
fn push_char_does_not_mutate_original() {
    let s = make_state();
    let _ = push_char(&s, 'c', 100.0, &mut make_words(), &mut seeded_rng());
    assert!(s.typing.current_input.is_empty());
    assert_eq!(s.player.speed, 0.0);
}

#[test]
fn completing_word_scores_and_refreshes() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(make_state(), "cat", 100.0, &mut words, &mut rng);

    assert_eq!(s.scoring.points(), 10);
    assert_eq!(s.scoring.combo, 1);
    assert_eq!(s.scoring.words_completed, 1);
    assert!(s.typing.current_input.is_empty());
    assert!((s.player.speed - 0.35).abs() < 1e-9);
    assert_eq!(s.words_since_frenzy, 1);
    assert_eq!(s.words_since_boss, 1);
}

#[test]
fn combo_and_fever_raise_word_value() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(make_state(), "cat", 100.0, &mut words, &mut rng);
    let s = type_word(s, "cat", 400.0, &mut words, &mut rng);

    // Second word: (10 + 2 * 1) at Warm (1.2)
    assert_eq!(s.scoring.combo, 2);
    assert_eq!(s.fever.level_name(), "Warm");
    assert!((s.scoring.score - 24.4).abs() < 1e-9);
}

#[test]
fn typo_pushes_back_and_breaks_combo() {
    let mut s = make_state();
    s.scoring.combo = 3;
    let s = push_char(&s, 'x', 100.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.player.speed, -0.04);
    assert_eq!(s.scoring.combo, 0);
    assert!(s.typing.had_error_during_word);
}

#[test]
fn shield_absorbs_typo() {
    let mut s = make_state();
    s.scoring.combo = 3;
    s.power_ups.activate_power_up(PowerUpKind::Shield, Rarity::Common, 0.0);
    let s = push_char(&s, 'x', 100.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.player.speed, 0.05);
    assert_eq!(s.scoring.combo, 3);
}

#[test]
fn laser_focus_absorbs_typo() {
    let mut s = make_state();
    s.power_ups.activate_power_up(PowerUpKind::LaserFocus, Rarity::Common, 0.0);
    let s = push_char(&s, 'x', 100.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.player.speed, 0.08);
}

#[test]
fn backspace_removes_last_char() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(make_state(), "ca", 100.0, &mut words, &mut rng);
    let s = backspace(&s, 300.0, &mut words, &mut rng);
    assert_eq!(s.typing.current_input, "c");
}

#[test]
fn backspace_on_empty_is_noop() {
    let s = make_state();
    let s2 = backspace(&s, 100.0, &mut make_words(), &mut seeded_rng());
    assert!(s2.typing.current_input.is_empty());
    assert_eq!(s2.player.speed, s.player.speed);
}

#[test]
fn switch_branch_swaps_target() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(make_state(), "ca", 100.0, &mut words, &mut rng);
    let s = switch_branch(&s);
    assert_eq!(s.active_branch, Branch::Second);
    assert_eq!(s.target_word(), "dog");
    assert!(s.typing.current_input.is_empty());
}

#[test]
fn sanitize_strips_punctuation() {
    assert_eq!(sanitize_input("  Hello, World! "), "hello world");
    assert_eq!(sanitize_input("don't-stop"), "don't-stop");
    assert_eq!(sanitize_input(&"a".repeat(80)).len(), 50);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn tagged_word_grants_power_up() {
    let mut words = FixedWords {
        drop: Some(PowerUpDrop { kind: PowerUpKind::Speed, rarity: Rarity::Common }),
    };
    let mut rng = seeded_rng();
    let s = init_state(GameConfig::default(), &mut words, 0.0);
    let s = type_word(s, "cat", 100.0, &mut words, &mut rng);

    assert!(s.power_ups.is_active(PowerUpKind::Speed));
    assert!(s.banner.as_ref().is_some_and(|b| b.text.contains("Speed")));
    assert!((s.player.speed - 0.35 * 1.5).abs() < 1e-9);
}

#[test]
fn multiplier_applies_to_the_granting_word() {
    let mut words = FixedWords {
        drop: Some(PowerUpDrop { kind: PowerUpKind::Multiplier, rarity: Rarity::Common }),
    };
    let mut rng = seeded_rng();
    let s = init_state(GameConfig::default(), &mut words, 0.0);
    let s = type_word(s, "cat", 100.0, &mut words, &mut rng);

    assert_eq!(s.scoring.points(), 20);
    let up = s.power_ups.get_power_up(PowerUpKind::Multiplier).unwrap();
    assert_eq!(up.words_left, Some(2));
}

#[test]
fn freeze_stops_the_wall() {
    let mut s = make_state();
    s.power_ups.activate_power_up(PowerUpKind::Freeze, Rarity::Common, 0.0);
    let s = tick(&s, 33.0, 33.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.background.offset, 0.0);
    assert_eq!(s.player.position, 0.5);
}

#[test]
fn tick_expires_power_ups() {
    let mut s = make_state();
    s.power_ups.activate_power_up(PowerUpKind::Speed, Rarity::Common, 0.0);
    let s = tick(&s, 33.0, 3_000.0, &mut make_words(), &mut seeded_rng());
    assert!(!s.power_ups.is_active(PowerUpKind::Speed));
}

// ── Sub-mode triggers ─────────────────────────────────────────────────────────

#[test]
fn fifth_word_starts_frenzy() {
    let s = state_in_frenzy(&mut make_words(), &mut seeded_rng());
    assert!(s.frenzy.is_active());
    assert_eq!(s.words_since_frenzy, 0);
    assert_eq!(s.player.position, 0.9);
    assert_eq!(s.background.scroll_speed, 0.0);
    assert!(s.fever.is_fever_rush_active());
}

#[test]
fn boss_wins_a_shared_trigger() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.words_since_frenzy = 4;
    s.words_since_boss = 11;
    let s = type_word(s, "cat", 100.0, &mut words, &mut rng);

    assert!(s.boss.is_engaged());
    assert!(!s.frenzy.is_engaged());
    assert_eq!(s.words_since_boss, 0);
    assert_eq!(s.words_since_frenzy, 4);
}

#[test]
fn switch_branch_ignored_in_sub_mode() {
    let s = state_in_frenzy(&mut make_words(), &mut seeded_rng());
    let s2 = switch_branch(&s);
    assert_eq!(s2.active_branch, s.active_branch);
}

// ── Frenzy ────────────────────────────────────────────────────────────────────

#[test]
fn space_submits_frenzy_word() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = state_in_frenzy(&mut words, &mut rng);
    let before = s.scoring.score;

    let s = type_word(s, "alpha ", 400.0, &mut words, &mut rng);
    assert_eq!(s.frenzy.current_word_index(), 1);
    assert!((s.scoring.score - before - 175.0).abs() < 1e-9);
    assert!(s.typing.current_input.is_empty());
}

#[test]
fn empty_frenzy_submit_warns() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = state_in_frenzy(&mut words, &mut rng);
    let s = submit(&s, 400.0);
    assert_eq!(s.frenzy.current_word_index(), 0);
    assert_eq!(s.banner.map(|b| b.text), Some("Type something first!".to_string()));
}

#[test]
fn frenzy_exit_resumes_scroll_later() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = state_in_frenzy(&mut words, &mut rng);

    // 30 s budget from t=300
    let s = tick(&s, 33.0, 30_300.0, &mut words, &mut rng);
    assert!(s.frenzy.is_engaged());
    assert!(!s.frenzy.is_active());

    let s = tick(&s, 33.0, 32_300.0, &mut words, &mut rng);
    assert!(!s.frenzy.is_engaged());
    assert_eq!(s.background.resume_at, Some(33_300.0));
    assert_eq!(s.background.scroll_speed, 0.0);
    assert!(s.player.position >= 0.7);

    let s = tick(&s, 33.0, 33_300.0, &mut words, &mut rng);
    assert_eq!(s.background.scroll_speed, s.background.base_speed);
    assert_eq!(s.background.resume_at, None);
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[test]
fn typed_limb_word_destroys_itself() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(state_in_boss_fight(), "ant", 100.0, &mut words, &mut rng);
    assert_eq!(s.boss.destroyed_limbs(), 1);
    assert_eq!(s.scoring.points(), 100);
    assert!(s.typing.current_input.is_empty());
}

#[test]
fn countdown_keys_are_dropped_when_combat_starts() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let mut s = make_state();
    let pool = BOSS_POOL.iter().take(4).map(|w| w.to_string()).collect();
    s.boss.start(BossKind::SyntaxGolem, pool, 45_000.0, 3_000.0, 0.0).unwrap();

    let s = type_word(s, "zz", 100.0, &mut words, &mut rng);
    assert_eq!(s.typing.current_input, "zz");

    let s = tick(&s, 33.0, 3_000.0, &mut words, &mut rng);
    assert!(s.typing.current_input.is_empty());

    let s = type_word(s, "ant", 3_100.0, &mut words, &mut rng);
    assert_eq!(s.boss.destroyed_limbs(), 1);
}

#[test]
fn clearing_boss_adds_final_score() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let mut s = state_in_boss_fight();
    for (i, word) in ["ant", "bee", "cow", "doe"].iter().enumerate() {
        s = type_word(s, word, 100.0 + i as f64 * 300.0, &mut words, &mut rng);
    }
    // 4 limbs plus a flawless, instant clear
    assert_eq!(s.scoring.points(), 400 + 3250);

    let s = tick(&s, 33.0, 5_200.0, &mut words, &mut rng);
    assert!(!s.boss.is_engaged());
    assert_eq!(s.scoring.points(), 3650);
}

#[test]
fn wrong_limb_submit_costs_time() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let s = type_word(state_in_boss_fight(), "zzz", 100.0, &mut words, &mut rng);
    let s = submit(&s, 400.0);
    assert_eq!(s.boss.time_remaining(), 42_000.0);
    assert_eq!(s.banner.map(|b| b.text), Some("MISS -3.0s".to_string()));
}

#[test]
fn empty_boss_submit_is_ignored() {
    let s = state_in_boss_fight();
    let s2 = submit(&s, 100.0);
    assert_eq!(s2.boss.time_remaining(), 45_000.0);
    assert_eq!(s2.boss.missed_attempts(), 0);
}

#[test]
fn boss_defeat_ends_run() {
    let mut words = make_words();
    let mut rng = seeded_rng();
    let mut s = state_in_boss_fight();
    s.boss.take_damage(100);

    let s = tick(&s, 33.0, 100.0, &mut words, &mut rng);
    assert_eq!(s.status, GameStatus::Playing);

    let s = tick(&s, 33.0, 1_600.0, &mut words, &mut rng);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.game_over_reason, Some(GameOverReason::BossDefeat));
}

// ── tick / game over ──────────────────────────────────────────────────────────

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let s2 = tick(&s, 33.0, 33.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.frame, 0);
    assert_eq!(s2.frame, 1);
    assert_eq!(s.background.offset, 0.0);
}

#[test]
fn wall_pushes_player_back() {
    let s = tick(&make_state(), 33.0, 33.0, &mut make_words(), &mut seeded_rng());
    assert!(s.player.position < 0.5);
    assert!(s.background.offset > 0.0);
}

#[test]
fn danger_wall_ends_run() {
    let mut s = make_state();
    s.player.position = 0.01;
    s.scoring.score = 42.0;
    let s = tick(&s, 33.0, 33.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.game_over_reason, Some(GameOverReason::DangerWall));
    assert_eq!(s.high_score, 42);
}

#[test]
fn no_game_over_inside_boss_fight() {
    let mut s = state_in_boss_fight();
    s.player.position = 0.0;
    let s = tick(&s, 33.0, 33.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn game_over_freezes_state() {
    let s = game_over(&make_state(), GameOverReason::DangerWall, 0.0);
    let s2 = push_char(&s, 'c', 100.0, &mut make_words(), &mut seeded_rng());
    assert!(s2.typing.current_input.is_empty());
    let s3 = tick(&s2, 33.0, 133.0, &mut make_words(), &mut seeded_rng());
    assert_eq!(s3.frame, s.frame);
}

#[test]
fn banner_expires() {
    let mut s = make_state();
    s.banner = Some(Banner { text: "hi".to_string(), until: 500.0 });
    let s = tick(&s, 33.0, 499.0, &mut make_words(), &mut seeded_rng());
    assert!(s.banner.is_some());
    let s = tick(&s, 33.0, 500.0, &mut make_words(), &mut seeded_rng());
    assert!(s.banner.is_none());
}
