use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use typing_rush::error::GameError;
use typing_rush::words::*;

fn make_words() -> BuiltinWords<StdRng> {
    BuiltinWords::new(StdRng::seed_from_u64(42))
}

// ── partial_match ─────────────────────────────────────────────────────────────

#[test]
fn prefix_in_progress() {
    let m = partial_match("ty", "type");
    assert_eq!(m.correct, 2);
    assert_eq!(m.total, 4);
    assert!(!m.is_complete);
    assert!(!m.has_error);
}

#[test]
fn match_ignores_case() {
    let m = partial_match("TyPe", "type");
    assert!(m.is_complete);
    assert!(!m.has_error);
}

#[test]
fn mismatch_stops_the_count() {
    let m = partial_match("txpe", "type");
    assert_eq!(m.correct, 1);
    assert!(m.has_error);
    assert!(!m.is_complete);
}

#[test]
fn overlong_input_is_an_error() {
    let m = partial_match("types", "type");
    assert_eq!(m.correct, 4);
    assert!(m.has_error);
    assert!(!m.is_complete);
}

#[test]
fn empty_input_is_clean() {
    let m = partial_match("", "type");
    assert_eq!(m.correct, 0);
    assert!(!m.has_error);
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[test]
fn difficulty_tiers() {
    assert_eq!(Difficulty::from_score(0), Difficulty::Easy);
    assert_eq!(Difficulty::from_score(19), Difficulty::Easy);
    assert_eq!(Difficulty::from_score(20), Difficulty::Medium);
    assert_eq!(Difficulty::from_score(50), Difficulty::Hard);
    assert_eq!(Difficulty::from_score(100), Difficulty::Expert);
}

// ── BuiltinWords ──────────────────────────────────────────────────────────────

#[test]
fn pair_words_are_distinct() {
    let mut words = make_words();
    for score in [0, 30, 70, 500] {
        for _ in 0..50 {
            let pair = words.next_word_pair(score);
            assert_ne!(pair.words[0], pair.words[1]);
            assert!(!pair.words[0].is_empty());
        }
    }
}

#[test]
fn power_ups_appear_over_many_pairs() {
    let mut words = make_words();
    let tagged = (0..200)
        .map(|_| words.next_word_pair(0))
        .filter(|p| p.power_ups.iter().any(Option::is_some))
        .count();
    assert!(tagged > 0);
}

#[test]
fn frenzy_sentence_is_lowercase_words() {
    let mut words = make_words();
    for _ in 0..20 {
        let s = words.next_frenzy_sentence();
        assert!(!s.theme.is_empty());
        assert!(!s.words.is_empty());
        for w in &s.words {
            assert_eq!(w, &w.to_lowercase());
            assert!(!w.contains(' '));
        }
    }
}

#[test]
fn boss_pool_is_unique() {
    let mut words = make_words();
    let pool = words.boss_word_pool("debugging", 8).unwrap();
    assert_eq!(pool.len(), 8);
    let unique: HashSet<&String> = pool.iter().collect();
    assert_eq!(unique.len(), 8);
}

#[test]
fn unknown_theme_falls_back() {
    let mut words = make_words();
    let pool = words.boss_word_pool("nonexistent", 4).unwrap();
    assert_eq!(pool.len(), 4);
}

#[test]
fn oversized_request_fails() {
    let mut words = make_words();
    let err = words.boss_word_pool("tech", 500);
    assert!(matches!(err, Err(GameError::BossWordPool { needed: 500, .. })));
}
