/// Fever heat meter.
///
/// Heat (0–100) rises on good typing and decays over time.  The level is a
/// pure function of heat and picks the score multiplier.  Reaching 100 starts
/// a 10 s fever rush at the top multiplier during which heat is frozen; the
/// rush ends with heat dropped to zero.

use crate::entities::Millis;

pub const MAX_HEAT: f64 = 100.0;
pub const FEVER_RUSH_DURATION_MS: Millis = 10_000.0;
pub const RUSH_LEVEL: u8 = 4;

/// Decay per second while typing normally.
const DECAY_NORMAL: f64 = 5.0;
/// Instant loss on a typing error.
const DECAY_ERROR: f64 = 15.0;
/// Extra decay per second while camping near the safe wall.
const DECAY_SAFE_ZONE: f64 = 2.0;
/// Decay per second while not typing.
const DECAY_INACTIVITY: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeverLevel {
    pub name: &'static str,
    pub multiplier: f64,
    pub threshold: f64,
}

pub const FEVER_LEVELS: [FeverLevel; 5] = [
    FeverLevel { name: "Cool", multiplier: 1.0, threshold: 0.0 },
    FeverLevel { name: "Warm", multiplier: 1.2, threshold: 25.0 },
    FeverLevel { name: "Hot", multiplier: 1.5, threshold: 50.0 },
    FeverLevel { name: "Blazing", multiplier: 2.0, threshold: 75.0 },
    FeverLevel { name: "FEVER!", multiplier: 3.0, threshold: 100.0 },
];

#[derive(Clone, Debug, PartialEq)]
pub struct FeverSystem {
    heat: f64,
    level: u8,
    /// Start of the running fever rush, if any.
    rush_started_at: Option<Millis>,
    perfect_word_streak: u32,
}

impl Default for FeverSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FeverSystem {
    pub fn new() -> Self {
        Self {
            heat: 0.0,
            level: 0,
            rush_started_at: None,
            perfect_word_streak: 0,
        }
    }

    pub fn heat(&self) -> f64 {
        self.heat
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn level_name(&self) -> &'static str {
        FEVER_LEVELS[self.level as usize].name
    }

    pub fn heat_percentage(&self) -> f64 {
        self.heat / MAX_HEAT * 100.0
    }

    pub fn perfect_word_streak(&self) -> u32 {
        self.perfect_word_streak
    }

    pub fn is_fever_rush_active(&self) -> bool {
        self.rush_started_at.is_some()
    }

    pub fn fever_rush_time_left(&self, now: Millis) -> Millis {
        match self.rush_started_at {
            Some(start) => (FEVER_RUSH_DURATION_MS - (now - start)).max(0.0),
            None => 0.0,
        }
    }

    pub fn score_multiplier(&self) -> f64 {
        FEVER_LEVELS[self.level as usize].multiplier
    }

    // ── Heat bookkeeping ─────────────────────────────────────────────────────

    /// Add heat; ignored during a fever rush.  Crossing 100 from below starts
    /// a rush.
    pub fn add_heat(&mut self, amount: f64, now: Millis) {
        if self.is_fever_rush_active() {
            return;
        }
        let previous_level = self.level;
        self.heat = (self.heat + amount).min(MAX_HEAT);
        self.update_level();

        if self.heat >= MAX_HEAT && previous_level < RUSH_LEVEL {
            self.trigger_fever_rush(now);
        }
    }

    pub fn remove_heat(&mut self, amount: f64) {
        self.heat = (self.heat - amount).max(0.0);
        self.update_level();
    }

    fn update_level(&mut self) {
        self.level = FEVER_LEVELS
            .iter()
            .rposition(|l| self.heat >= l.threshold)
            .unwrap_or(0) as u8;
    }

    /// Per-frame decay.  An error takes the flat error penalty; otherwise the
    /// rate depends on whether the player is typing and where they stand.
    pub fn apply_decay(&mut self, dt: Millis, player_position: f64, is_typing: bool, has_error: bool) {
        if self.is_fever_rush_active() {
            return;
        }

        let decay = if has_error {
            DECAY_ERROR
        } else if !is_typing {
            DECAY_INACTIVITY * dt / 1000.0
        } else if player_position > 0.7 {
            (DECAY_NORMAL + DECAY_SAFE_ZONE) * dt / 1000.0
        } else {
            DECAY_NORMAL * dt / 1000.0
        };

        self.remove_heat(decay);
    }

    // ── Fever rush ───────────────────────────────────────────────────────────

    pub fn trigger_fever_rush(&mut self, now: Millis) {
        log::info!("Fever rush started");
        self.rush_started_at = Some(now);
        self.level = RUSH_LEVEL;
        self.perfect_word_streak = 0;
    }

    /// Poll once per frame.  Returns whether the rush is still running.
    pub fn update_fever_rush(&mut self, now: Millis) -> bool {
        let Some(start) = self.rush_started_at else {
            return false;
        };
        if now - start >= FEVER_RUSH_DURATION_MS {
            self.end_fever_rush();
            return false;
        }
        true
    }

    fn end_fever_rush(&mut self) {
        log::info!("Fever rush ended");
        self.rush_started_at = None;
        self.heat = 0.0;
        self.update_level();
    }

    // ── Heat sources ─────────────────────────────────────────────────────────

    /// Typing close to the danger wall heats up proportionally to how close.
    pub fn on_danger_zone_typing(&mut self, player_position: f64, dt: Millis, now: Millis) {
        if player_position < 0.3 {
            let intensity = (0.3 - player_position) / 0.3;
            self.add_heat(8.0 * intensity * dt / 1000.0, now);
        }
    }

    pub fn on_right_wall_touch(&mut self, player_position: f64, now: Millis) {
        if player_position > 0.9 {
            self.add_heat(15.0, now);
        }
    }

    pub fn on_perfect_word(&mut self, now: Millis) {
        self.perfect_word_streak += 1;
        self.add_heat(10.0 + self.perfect_word_streak as f64 * 2.0, now);
    }

    pub fn on_wpm_burst(&mut self, current_wpm: f64, average_wpm: f64, now: Millis) {
        if current_wpm > average_wpm + 20.0 {
            let intensity = ((current_wpm - average_wpm - 20.0) / 20.0).min(2.0);
            self.add_heat(5.0 + intensity * 3.0, now);
        }
    }

    pub fn on_combo_increase(&mut self, combo: u32, now: Millis) {
        self.add_heat(combo as f64 * 1.5, now);
    }

    pub fn on_typing_error(&mut self) {
        self.perfect_word_streak = 0;
        self.apply_decay(0.0, 0.0, false, true);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
