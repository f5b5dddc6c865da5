/// Read-only views of the game state, taken once per frame for the renderer.

use crate::boss::{BossOutcome, BossPhase};
use crate::entities::{GameState, Millis, PowerUpKind, Rarity};
use crate::powerups::Remaining;

#[derive(Clone, Debug, PartialEq)]
pub struct FeverSnapshot {
    pub heat_percent: f64,
    pub level: u8,
    pub level_name: &'static str,
    pub multiplier: f64,
    pub rush_active: bool,
    pub rush_time_left: Millis,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub remaining: Remaining,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrenzySnapshot {
    pub active: bool,
    pub theme: String,
    pub words: Vec<String>,
    pub word_index: usize,
    pub total_words: usize,
    pub time_remaining_seconds: u32,
    pub current_wpm: u32,
    pub accuracy_percent: u32,
    /// Result bonus while the completion screen is up.
    pub completed_bonus: Option<u64>,
    pub timed_out: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LimbSnapshot {
    pub id: usize,
    pub word: String,
    pub destroyed: bool,
    pub angle: f64,
    pub under_attack: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WarningPrompt {
    Defense(&'static str),
    Chant(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttackWarningSnapshot {
    pub countdown: Millis,
    pub prompt: WarningPrompt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossSnapshot {
    pub active: bool,
    pub name: &'static str,
    /// Seconds to combat while the intro countdown runs.
    pub countdown_seconds: Option<u32>,
    pub hearts: u32,
    pub hp: u32,
    pub limbs: Vec<LimbSnapshot>,
    pub time_remaining_seconds: u32,
    pub attack_warning: Option<AttackWarningSnapshot>,
    pub result: Option<(BossOutcome, u64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSnapshot {
    pub score: u64,
    pub combo: u32,
    pub wpm: u32,
    pub position_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub fever: FeverSnapshot,
    pub power_ups: Vec<PowerUpSnapshot>,
    pub frenzy: FrenzySnapshot,
    pub boss: BossSnapshot,
    pub run: RunSnapshot,
}

pub fn snapshot(state: &GameState, now: Millis) -> Snapshot {
    Snapshot {
        fever: fever_snapshot(state, now),
        power_ups: state
            .power_ups
            .active()
            .iter()
            .map(|p| PowerUpSnapshot {
                kind: p.kind,
                rarity: p.rarity,
                remaining: p.remaining(now),
            })
            .collect(),
        frenzy: frenzy_snapshot(state),
        boss: boss_snapshot(state, now),
        run: RunSnapshot {
            score: state.scoring.points(),
            combo: state.scoring.combo,
            wpm: state.typing.words_per_minute,
            position_percent: state.player.position * 100.0,
        },
    }
}

fn fever_snapshot(state: &GameState, now: Millis) -> FeverSnapshot {
    let fever = &state.fever;
    FeverSnapshot {
        heat_percent: fever.heat_percentage(),
        level: fever.level(),
        level_name: fever.level_name(),
        multiplier: fever.score_multiplier(),
        rush_active: fever.is_fever_rush_active(),
        rush_time_left: fever.fever_rush_time_left(now),
    }
}

fn frenzy_snapshot(state: &GameState) -> FrenzySnapshot {
    use crate::frenzy::{FrenzyOutcome, FrenzyPhase};

    let frenzy = &state.frenzy;
    let (completed_bonus, timed_out) = match frenzy.phase() {
        FrenzyPhase::Resolved { outcome: FrenzyOutcome::Completed { bonus }, .. } => (Some(bonus), false),
        FrenzyPhase::Resolved { outcome: FrenzyOutcome::TimedOut, .. } => (None, true),
        _ => (None, false),
    };
    FrenzySnapshot {
        active: frenzy.is_engaged(),
        theme: frenzy.theme().to_string(),
        words: frenzy.sentence_words().to_vec(),
        word_index: frenzy.current_word_index(),
        total_words: frenzy.sentence_words().len(),
        time_remaining_seconds: frenzy.time_remaining_seconds(),
        current_wpm: frenzy.stats().current_wpm,
        accuracy_percent: (frenzy.stats().average_accuracy * 100.0).round() as u32,
        completed_bonus,
        timed_out,
    }
}

fn boss_snapshot(state: &GameState, now: Millis) -> BossSnapshot {
    let boss = &state.boss;
    let phase = boss.phase();

    let attacking = match phase {
        BossPhase::AttackWarning { limb_id, .. } => Some(limb_id),
        _ => None,
    };
    let attack_warning = match (phase, boss.archetype()) {
        (BossPhase::AttackWarning { defense_word, .. }, _) => Some(WarningPrompt::Defense(defense_word)),
        (BossPhase::SpecialWarning { .. }, Some(a)) => Some(WarningPrompt::Chant(a.special_move_chant)),
        _ => None,
    }
    .map(|prompt| AttackWarningSnapshot {
        countdown: boss.warning_time_left(now).unwrap_or(0.0),
        prompt,
    });

    let countdown_seconds = match phase {
        BossPhase::Countdown { until } => Some(((until - now).max(0.0) / 1000.0).ceil() as u32),
        _ => None,
    };
    let result = match phase {
        BossPhase::Resolved { outcome, .. } => boss.final_score().map(|s| (outcome, s.total_score)),
        _ => None,
    };

    BossSnapshot {
        active: boss.is_engaged(),
        name: boss.archetype().map_or("", |a| a.name),
        countdown_seconds,
        hearts: boss.hearts(),
        hp: boss.current_hp(),
        limbs: boss
            .limbs()
            .iter()
            .map(|l| LimbSnapshot {
                id: l.id,
                word: l.word.clone(),
                destroyed: l.destroyed,
                angle: l.angle,
                under_attack: attacking == Some(l.id),
            })
            .collect(),
        time_remaining_seconds: boss.time_remaining_seconds(),
        attack_warning,
        result,
    }
}
