use typing_rush::compute::init_state;
use typing_rush::config::GameConfig;
use typing_rush::entities::*;
use typing_rush::error::GameError;
use typing_rush::words::WordSource;

struct OnePair;

impl WordSource for OnePair {
    fn next_word_pair(&mut self, _score: u64) -> WordPair {
        WordPair {
            words: ["left".to_string(), "right".to_string()],
            power_ups: [
                None,
                Some(PowerUpDrop { kind: PowerUpKind::Freeze, rarity: Rarity::Rare }),
            ],
        }
    }

    fn next_frenzy_sentence(&mut self) -> FrenzySentence {
        FrenzySentence { theme: "test".to_string(), words: vec!["one".to_string()] }
    }

    fn boss_word_pool(&mut self, theme: &str, count: usize) -> Result<Vec<String>, GameError> {
        Err(GameError::BossWordPool { theme: theme.to_string(), needed: count, available: 0 })
    }
}

#[test]
fn entity_clone_and_eq() {
    assert_eq!(PowerUpKind::Speed, PowerUpKind::Speed);
    assert_ne!(PowerUpKind::Speed, PowerUpKind::Freeze);
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
    assert_ne!(GameOverReason::DangerWall, GameOverReason::BossDefeat);

    let kind = Rarity::Epic;
    assert_eq!(kind.clone(), Rarity::Epic);
}

#[test]
fn branch_other_flips() {
    assert_eq!(Branch::First.other(), Branch::Second);
    assert_eq!(Branch::Second.other(), Branch::First);
    assert_eq!(Branch::default(), Branch::First);
}

#[test]
fn word_pair_lookup_by_branch() {
    let pair = OnePair.next_word_pair(0);
    assert_eq!(pair.word(Branch::First), "left");
    assert_eq!(pair.word(Branch::Second), "right");
    assert_eq!(pair.power_up(Branch::First), None);
    assert_eq!(pair.power_up(Branch::Second).map(|d| d.kind), Some(PowerUpKind::Freeze));
}

#[test]
fn rarity_factors() {
    assert_eq!(Rarity::Common.factor(), 1.0);
    assert_eq!(Rarity::Rare.factor(), 1.3);
    assert_eq!(Rarity::Epic.factor(), 1.6);
}

#[test]
fn every_power_up_kind_has_a_label() {
    assert_eq!(PowerUpKind::ALL.len(), 6);
    for kind in PowerUpKind::ALL {
        assert!(!kind.name().is_empty());
        assert!(!kind.symbol().is_empty());
    }
}

#[test]
fn points_floor_the_float_score() {
    let scoring = Scoring { score: 87.9, combo: 0, words_completed: 0, best_wpm: 0 };
    assert_eq!(scoring.points(), 87);
}

#[test]
fn target_word_follows_active_branch() {
    let mut s = init_state(GameConfig::default(), &mut OnePair, 0.0);
    assert_eq!(s.target_word(), "left");
    s.active_branch = Branch::Second;
    assert_eq!(s.target_word(), "right");
    assert!(!s.in_sub_mode());
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(GameConfig::default(), &mut OnePair, 0.0);
    let mut cloned = original.clone();

    cloned.player.position = 0.99;
    cloned.scoring.score = 999.0;
    cloned.typing.current_input.push_str("abc");
    cloned.power_ups.activate_power_up(PowerUpKind::Shield, Rarity::Common, 0.0);

    assert_eq!(original.player.position, 0.5);
    assert_eq!(original.scoring.score, 0.0);
    assert!(original.typing.current_input.is_empty());
    assert!(original.power_ups.active().is_empty());
}
