/// Frenzy mode: type a themed sentence word by word against a shrinking (or
/// growing) duration budget.
///
/// Phases run `Inactive → Countdown → Active → Resolved → Inactive`.  The
/// countdown is skipped when configured to zero.  Every timed check is gated
/// on the phase, so nothing left over from an earlier frenzy can fire after
/// it has been reset.

use crate::entities::{FrenzySentence, Millis};
use crate::error::GameError;
use crate::words::partial_match;

pub const MIN_DURATION_MS: Millis = 5_000.0;
pub const MAX_DURATION_MS: Millis = 60_000.0;
pub const TYPO_PENALTY_MS: Millis = 2_000.0;
pub const TYPO_COOLDOWN_MS: Millis = 500.0;
pub const CORRECT_WORD_BONUS_MS: Millis = 3_000.0;
pub const COMPLETE_DISPLAY_MS: Millis = 2_500.0;
pub const TIMEOUT_DISPLAY_MS: Millis = 2_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrenzyOutcome {
    Completed { bonus: u64 },
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrenzyPhase {
    Inactive,
    Countdown { until: Millis },
    Active,
    /// Result is on screen; the mode exits at `until`.
    Resolved { outcome: FrenzyOutcome, until: Millis },
}

/// Transition reported by `FrenzyController::update`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrenzyEvent {
    Started,
    TimedOut,
    Exited(FrenzyOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletedWord {
    pub word: String,
    pub input: String,
    pub accuracy: f64,
    pub score: u64,
}

/// Outcome of submitting one sentence word.
#[derive(Clone, Debug, PartialEq)]
pub struct WordResult {
    pub word: String,
    pub accuracy: f64,
    pub score: u64,
    /// Change applied to the duration budget, negative for a penalty.
    pub time_delta: Millis,
    /// Completion bonus, present when this word finished the sentence.
    pub bonus: Option<u64>,
}

/// Per-keystroke feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct Keystroke {
    pub accuracy: f64,
    pub penalized: bool,
    /// The final word was typed exactly and submitted on its own.
    pub submitted: Option<WordResult>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrenzyStats {
    pub total_characters_typed: usize,
    pub correct_characters_typed: usize,
    pub total_words: u32,
    pub perfect_words: u32,
    pub current_wpm: u32,
    pub average_accuracy: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrenzyController {
    phase: FrenzyPhase,
    theme: String,
    sentence_words: Vec<String>,
    current_word_index: usize,
    completed_words: Vec<CompletedWord>,
    duration: Millis,
    time_remaining: Millis,
    start_time: Millis,
    last_typo_time: Option<Millis>,
    /// The current input already showed an error on the previous keystroke.
    input_had_error: bool,
    stats: FrenzyStats,
}

impl Default for FrenzyController {
    fn default() -> Self {
        Self::new()
    }
}

impl FrenzyController {
    pub fn new() -> Self {
        Self {
            phase: FrenzyPhase::Inactive,
            theme: String::new(),
            sentence_words: Vec::new(),
            current_word_index: 0,
            completed_words: Vec::new(),
            duration: 0.0,
            time_remaining: 0.0,
            start_time: 0.0,
            last_typo_time: None,
            input_had_error: false,
            stats: FrenzyStats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn phase(&self) -> FrenzyPhase {
        self.phase
    }

    /// Frenzy owns the game from trigger until its result screen closes.
    pub fn is_engaged(&self) -> bool {
        self.phase != FrenzyPhase::Inactive
    }

    pub fn is_active(&self) -> bool {
        self.phase == FrenzyPhase::Active
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn sentence_words(&self) -> &[String] {
        &self.sentence_words
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn current_word(&self) -> Option<&str> {
        self.sentence_words.get(self.current_word_index).map(String::as_str)
    }

    pub fn completed_words(&self) -> &[CompletedWord] {
        &self.completed_words
    }

    pub fn duration(&self) -> Millis {
        self.duration
    }

    pub fn time_remaining(&self) -> Millis {
        self.time_remaining
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        (self.time_remaining / 1000.0).ceil() as u32
    }

    pub fn stats(&self) -> &FrenzyStats {
        &self.stats
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Enter frenzy with `sentence`.  A zero countdown goes straight to the
    /// active phase.
    pub fn start(
        &mut self,
        sentence: FrenzySentence,
        duration: Millis,
        countdown: Millis,
        now: Millis,
    ) -> Result<(), GameError> {
        if sentence.words.is_empty() {
            return Err(GameError::EmptySentence);
        }

        *self = Self::new();
        self.theme = sentence.theme;
        self.sentence_words = sentence.words;
        self.duration = duration.clamp(MIN_DURATION_MS, MAX_DURATION_MS);
        self.time_remaining = self.duration;

        log::info!(
            "Frenzy triggered: {} ({} words)",
            self.theme,
            self.sentence_words.len()
        );

        if countdown > 0.0 {
            self.phase = FrenzyPhase::Countdown { until: now + countdown };
        } else {
            self.begin(now);
        }
        Ok(())
    }

    fn begin(&mut self, now: Millis) {
        self.phase = FrenzyPhase::Active;
        self.start_time = now;
        self.time_remaining = self.duration;
        self.stats = FrenzyStats::default();
    }

    /// Poll once per frame.  Idempotent for a repeated `now`.
    pub fn update(&mut self, now: Millis) -> Option<FrenzyEvent> {
        match self.phase {
            FrenzyPhase::Inactive => None,
            FrenzyPhase::Countdown { until } => {
                if now >= until {
                    self.begin(now);
                    Some(FrenzyEvent::Started)
                } else {
                    None
                }
            }
            FrenzyPhase::Active => {
                if self.update_timer(now) {
                    None
                } else {
                    log::info!(
                        "Frenzy timed out at word {}/{}",
                        self.current_word_index,
                        self.sentence_words.len()
                    );
                    self.phase = FrenzyPhase::Resolved {
                        outcome: FrenzyOutcome::TimedOut,
                        until: now + TIMEOUT_DISPLAY_MS,
                    };
                    Some(FrenzyEvent::TimedOut)
                }
            }
            FrenzyPhase::Resolved { outcome, until } => {
                if now >= until {
                    self.reset();
                    Some(FrenzyEvent::Exited(outcome))
                } else {
                    None
                }
            }
        }
    }

    /// Recompute `time_remaining` from the current duration.  Returns whether
    /// time is left.
    pub fn update_timer(&mut self, now: Millis) -> bool {
        if self.phase != FrenzyPhase::Active {
            return true;
        }
        self.time_remaining = (self.duration - (now - self.start_time)).max(0.0);
        self.time_remaining > 0.0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Live validation of the in-progress word.  The first keystroke that
    /// introduces an error costs time; typing the last word exactly submits
    /// it.
    pub fn handle_input(&mut self, input: &str, now: Millis) -> Option<Keystroke> {
        if self.phase != FrenzyPhase::Active {
            return None;
        }
        let target = self.current_word()?.to_string();
        let m = partial_match(input, &target);

        let mut penalized = false;
        if m.has_error && !self.input_had_error {
            penalized = self.apply_typo_penalty(now);
        }
        self.input_had_error = m.has_error;

        let is_last_word = self.current_word_index + 1 == self.sentence_words.len();
        if m.is_complete && is_last_word {
            let submitted = self.submit_word(input, now);
            return Some(Keystroke { accuracy: 1.0, penalized, submitted });
        }

        Some(Keystroke {
            accuracy: calculate_word_accuracy(input, &target),
            penalized,
            submitted: None,
        })
    }

    /// Explicit advance (Space/Enter).  Empty input is rejected so words
    /// cannot be skipped.
    pub fn submit_word(&mut self, input: &str, now: Millis) -> Option<WordResult> {
        if self.phase != FrenzyPhase::Active {
            return None;
        }
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let target = self.current_word()?.to_string();

        let accuracy = calculate_word_accuracy(input, &target);
        let word_len = target.chars().count();
        let score = score_frenzy_word(accuracy, word_len);

        self.completed_words.push(CompletedWord {
            word: target.clone(),
            input: input.to_string(),
            accuracy,
            score,
        });
        self.update_tracking(input, word_len, accuracy, now);

        let before = self.duration;
        if accuracy >= 0.8 {
            self.extend_timer(CORRECT_WORD_BONUS_MS * accuracy);
        } else if accuracy < 0.6 {
            self.apply_typo_penalty(now);
        }
        let time_delta = self.duration - before;

        self.current_word_index += 1;
        self.input_had_error = false;

        let bonus = if self.current_word_index >= self.sentence_words.len() {
            Some(self.complete(now))
        } else {
            None
        };

        log::debug!("Frenzy word '{}' acc {:.2} -> {} pts", target, accuracy, score);
        Some(WordResult { word: target, accuracy, score, time_delta, bonus })
    }

    fn complete(&mut self, now: Millis) -> u64 {
        let bonus = performance_bonus(
            self.sentence_words.len(),
            self.stats.current_wpm,
            self.stats.average_accuracy,
            self.stats.perfect_words,
        );
        log::info!(
            "Frenzy complete: {} WPM, {:.0}% accuracy, bonus {}",
            self.stats.current_wpm,
            self.stats.average_accuracy * 100.0,
            bonus
        );
        self.phase = FrenzyPhase::Resolved {
            outcome: FrenzyOutcome::Completed { bonus },
            until: now + COMPLETE_DISPLAY_MS,
        };
        bonus
    }

    fn update_tracking(&mut self, input: &str, word_len: usize, accuracy: f64, now: Millis) {
        let stats = &mut self.stats;
        stats.total_characters_typed += input.chars().count();
        stats.correct_characters_typed += (word_len as f64 * accuracy).round() as usize;
        stats.total_words += 1;
        if accuracy == 1.0 {
            stats.perfect_words += 1;
        }

        let minutes = (now - self.start_time) / 1000.0 / 60.0;
        stats.current_wpm = if minutes > 0.0 {
            (stats.total_words as f64 / minutes).round() as u32
        } else {
            0
        };
        stats.average_accuracy =
            stats.correct_characters_typed as f64 / stats.total_characters_typed.max(1) as f64;
    }

    // ── Duration budget ──────────────────────────────────────────────────────

    pub fn extend_timer(&mut self, bonus: Millis) {
        if self.phase != FrenzyPhase::Active {
            return;
        }
        self.duration = (self.duration + bonus).min(MAX_DURATION_MS);
    }

    /// Shorten the duration; the deadline moves earlier while the clock keeps
    /// running.  Returns false inside the cooldown window.
    pub fn apply_typo_penalty(&mut self, now: Millis) -> bool {
        if self.phase != FrenzyPhase::Active {
            return false;
        }
        if let Some(last) = self.last_typo_time {
            if now - last < TYPO_COOLDOWN_MS {
                return false;
            }
        }
        self.last_typo_time = Some(now);
        self.duration = (self.duration - TYPO_PENALTY_MS).max(MIN_DURATION_MS);
        true
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Positional accuracy with a penalty for length mismatch; 1.0 on an exact
/// (case-insensitive) match.
pub fn calculate_word_accuracy(input: &str, target: &str) -> f64 {
    let user: Vec<char> = input.trim().to_lowercase().chars().collect();
    let target: Vec<char> = target.trim().to_lowercase().chars().collect();
    if user.is_empty() || target.is_empty() {
        return 0.0;
    }
    if user == target {
        return 1.0;
    }

    let correct = user.iter().zip(&target).filter(|(a, b)| a == b).count();
    let target_len = target.len() as f64;
    let length_penalty = (user.len() as f64 - target_len).abs() / target_len;
    (correct as f64 / target_len - length_penalty * 0.5).max(0.0)
}

pub fn score_frenzy_word(accuracy: f64, word_len: usize) -> u64 {
    let base = 25.0 + word_len as f64 * 2.0;
    (base * accuracy.max(0.3) * 5.0).floor() as u64
}

pub fn wpm_multiplier(wpm: u32) -> f64 {
    match wpm {
        80.. => 3.0,
        60..=79 => 2.5,
        40..=59 => 2.0,
        25..=39 => 1.5,
        15..=24 => 1.0,
        _ => 0.5,
    }
}

pub fn accuracy_multiplier(accuracy: f64) -> f64 {
    if accuracy >= 0.95 {
        2.5
    } else if accuracy >= 0.9 {
        2.0
    } else if accuracy >= 0.8 {
        1.5
    } else if accuracy >= 0.7 {
        1.0
    } else if accuracy >= 0.5 {
        0.7
    } else {
        0.3
    }
}

/// Sentence-completion bonus.
pub fn performance_bonus(word_count: usize, wpm: u32, accuracy: f64, perfect_words: u32) -> u64 {
    let base = word_count as f64 * 100.0;
    let performance = (wpm_multiplier(wpm) + accuracy_multiplier(accuracy)) / 2.0;
    let perfect = 1.0 + perfect_words as f64 * 0.2;
    (base * performance * perfect).round() as u64
}

/// Player speed nudge for live frenzy feedback.
pub fn feedback_speed(accuracy: f64) -> f64 {
    if accuracy > 0.7 {
        0.03
    } else if accuracy > 0.3 {
        0.01
    } else {
        -0.01
    }
}
