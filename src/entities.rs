/// All game entity types — pure data, no logic.
///
/// The per-mode systems (`FeverSystem`, `PowerUpSystem`, `FrenzyController`,
/// `BossSystem`) live in their own modules; this file holds the records they
/// share and the master `GameState` that bundles them.

use crate::boss::BossSystem;
use crate::config::GameConfig;
use crate::fever::FeverSystem;
use crate::frenzy::FrenzyController;
use crate::powerups::PowerUpSystem;

/// Milliseconds on the caller's monotonic clock.
pub type Millis = f64;

// ── Power-up identity ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Multiplies forward player speed.
    Speed,
    /// Slows the background scroll.
    TimeWarp,
    /// Typing errors nudge forward instead of resetting the combo.
    Shield,
    /// Multiplies word score for a fixed number of words.
    Multiplier,
    /// Like Shield, with a stronger forward nudge.
    LaserFocus,
    /// Stops the background scroll entirely.
    Freeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Speed,
        PowerUpKind::TimeWarp,
        PowerUpKind::Shield,
        PowerUpKind::Multiplier,
        PowerUpKind::LaserFocus,
        PowerUpKind::Freeze,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Speed",
            PowerUpKind::TimeWarp => "Time Warp",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Multiplier => "Multiplier",
            PowerUpKind::LaserFocus => "Laser Focus",
            PowerUpKind::Freeze => "Freeze",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "»",
            PowerUpKind::TimeWarp => "◷",
            PowerUpKind::Shield => "◈",
            PowerUpKind::Multiplier => "×",
            PowerUpKind::LaserFocus => "◎",
            PowerUpKind::Freeze => "❄",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    /// Scale applied to a power-up's duration and (non-unit) multiplier.
    pub fn factor(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.3,
            Rarity::Epic => 1.6,
        }
    }
}

/// A power-up attached to a word slot; granted when that word is completed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpDrop {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
}

// ── Words ─────────────────────────────────────────────────────────────────────

/// Which of the two displayed words the player is typing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Branch {
    #[default]
    First,
    Second,
}

impl Branch {
    pub fn other(self) -> Branch {
        match self {
            Branch::First => Branch::Second,
            Branch::Second => Branch::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Branch::First => 0,
            Branch::Second => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordPair {
    pub words: [String; 2],
    pub power_ups: [Option<PowerUpDrop>; 2],
}

impl WordPair {
    pub fn word(&self, branch: Branch) -> &str {
        &self.words[branch.index()]
    }

    pub fn power_up(&self, branch: Branch) -> Option<PowerUpDrop> {
        self.power_ups[branch.index()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrenzySentence {
    pub theme: String,
    pub words: Vec<String>,
}

/// Prefix comparison of typed input against a target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialMatch {
    /// Length of the correct prefix, in characters.
    pub correct: usize,
    /// Target length, in characters.
    pub total: usize,
    pub is_complete: bool,
    /// Input extends past the correct prefix.
    pub has_error: bool,
}

// ── Run state ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    /// The danger wall caught the player.
    DangerWall,
    /// Boss HP reached zero.
    BossDefeat,
}

/// Tug-of-war avatar. `position` 0 is the danger wall, 1 the safe wall.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: f64,
    pub speed: f64,
    /// Seconds-ish of contact with the safe wall, capped at 3.0.
    pub safe_wall_contact_time: f64,
    pub was_in_safe_zone: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub offset: f64,
    pub scroll_speed: f64,
    pub base_speed: f64,
    pub max_speed: f64,
    /// Scroll is paused after a sub-mode and restored to `base_speed` here.
    pub resume_at: Option<Millis>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Typing {
    pub current_input: String,
    pub words_per_minute: u32,
    pub start_time: Millis,
    /// Last 10 non-zero WPM samples.
    pub wpm_history: Vec<u32>,
    pub had_error_during_word: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scoring {
    /// Accumulated as a float, shown as an integer.
    pub score: f64,
    pub combo: u32,
    pub words_completed: u32,
    pub best_wpm: u32,
}

impl Scoring {
    pub fn points(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

/// Short-lived feedback line ("+3.0s", "BLOCKED!", ...).
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub text: String,
    pub until: Millis,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub background: Background,
    pub typing: Typing,
    pub scoring: Scoring,
    pub fever: FeverSystem,
    pub power_ups: PowerUpSystem,
    pub frenzy: FrenzyController,
    pub boss: BossSystem,
    pub pair: WordPair,
    pub active_branch: Branch,
    /// Completed normal words since the last frenzy / boss trigger.
    pub words_since_frenzy: u32,
    pub words_since_boss: u32,
    pub status: GameStatus,
    pub game_over_reason: Option<GameOverReason>,
    pub banner: Option<Banner>,
    /// The highest score seen so far (updated at game over).
    pub high_score: u64,
    pub frame: u64,
    pub config: GameConfig,
}

impl GameState {
    /// True while frenzy or boss owns the input and the timers.
    pub fn in_sub_mode(&self) -> bool {
        self.frenzy.is_engaged() || self.boss.is_engaged()
    }

    pub fn target_word(&self) -> &str {
        self.pair.word(self.active_branch)
    }
}
