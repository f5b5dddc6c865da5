/// Boss battle.
///
/// A boss has a ring of limbs, each labelled with a word.  Typing a limb's
/// word destroys it; destroying every limb wins.  While limbs remain the boss
/// attacks on an interval that shortens as limbs fall.  Each attack opens a
/// warning window in which a defense word (or destroying the attacking limb)
/// cancels it.  When exactly one limb is left the boss fires its special move
/// once, which only the full chant can stop.  HP reaching zero loses the
/// battle and the run.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::Millis;
use crate::error::GameError;

pub const MAX_HP: u32 = 100;
pub const HP_PER_HEART: u32 = 20;
pub const ATTACK_WARNING_MS: Millis = 2_500.0;
pub const SPECIAL_WARNING_MS: Millis = 12_000.0;
pub const TYPO_PENALTY_MS: Millis = 3_000.0;
pub const MIN_DURATION_MS: Millis = 5_000.0;

pub const LIMB_POINTS: u64 = 100;
pub const COUNTER_POINTS: u64 = 50;
pub const BLOCK_POINTS: u64 = 50;
pub const SPECIAL_BLOCK_POINTS: u64 = 100;

pub const VICTORY_DISPLAY_MS: Millis = 4_000.0;
pub const TIMEOUT_DISPLAY_MS: Millis = 3_000.0;
pub const DEFEAT_DISPLAY_MS: Millis = 1_500.0;

pub const DEFENSE_WORDS: [&str; 10] = [
    "defend", "block", "dodge", "guard", "parry", "evade", "shield", "counter", "resist", "duck",
];

// ── Archetypes ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossKind {
    GlitchSpider,
    CodeHydra,
    SyntaxGolem,
    BugKraken,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossArchetype {
    pub name: &'static str,
    pub limb_count: usize,
    pub theme: &'static str,
    pub attack_name: &'static str,
    pub attack_damage: u32,
    pub special_move_name: &'static str,
    pub special_move_chant: &'static str,
    pub special_move_damage: u32,
}

const GLITCH_SPIDER: BossArchetype = BossArchetype {
    name: "GLITCH SPIDER",
    limb_count: 6,
    theme: "tech",
    attack_name: "Web Shot",
    attack_damage: 20,
    special_move_name: "CORRUPTED WEB PRISON",
    special_move_chant: "break the protocol and purge the virus",
    special_move_damage: 60,
};

const CODE_HYDRA: BossArchetype = BossArchetype {
    name: "CODE HYDRA",
    limb_count: 5,
    theme: "programming",
    attack_name: "Syntax Flame",
    attack_damage: 20,
    special_move_name: "INFINITE RECURSION",
    special_move_chant: "return to base case and escape the loop",
    special_move_damage: 60,
};

const SYNTAX_GOLEM: BossArchetype = BossArchetype {
    name: "SYNTAX GOLEM",
    limb_count: 4,
    theme: "errors",
    attack_name: "Error Punch",
    attack_damage: 20,
    special_move_name: "FATAL EXCEPTION",
    special_move_chant: "catch the error and handle gracefully",
    special_move_damage: 60,
};

const BUG_KRAKEN: BossArchetype = BossArchetype {
    name: "BUG KRAKEN",
    limb_count: 8,
    theme: "debugging",
    attack_name: "Tentacle Slam",
    attack_damage: 20,
    special_move_name: "MEMORY LEAK TSUNAMI",
    special_move_chant: "garbage collect and free the heap",
    special_move_damage: 60,
};

impl BossKind {
    pub const ALL: [BossKind; 4] = [
        BossKind::GlitchSpider,
        BossKind::CodeHydra,
        BossKind::SyntaxGolem,
        BossKind::BugKraken,
    ];

    pub fn archetype(self) -> &'static BossArchetype {
        match self {
            BossKind::GlitchSpider => &GLITCH_SPIDER,
            BossKind::CodeHydra => &CODE_HYDRA,
            BossKind::SyntaxGolem => &SYNTAX_GOLEM,
            BossKind::BugKraken => &BUG_KRAKEN,
        }
    }

    pub fn random(rng: &mut impl Rng) -> BossKind {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Limb {
    pub id: usize,
    pub word: String,
    pub destroyed: bool,
    /// Radians around the boss body, evenly spaced.
    pub angle: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossOutcome {
    Victory,
    Timeout,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossPhase {
    Idle,
    Countdown { until: Millis },
    Combat,
    AttackWarning { limb_id: usize, defense_word: &'static str, started_at: Millis },
    SpecialWarning { started_at: Millis },
    /// Result is on screen; the battle exits at `until`.
    Resolved { outcome: BossOutcome, until: Millis },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackResult {
    pub damage: u32,
    pub is_special: bool,
    pub limb_id: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossScore {
    pub limb_score: u64,
    pub accuracy: f64,
    pub accuracy_multiplier: f64,
    pub time_bonus: u64,
    pub completion_bonus: u64,
    pub perfect_bonus: u64,
    pub speed_bonus: u64,
    pub defense_bonus: u64,
    pub perfect_defense_bonus: u64,
    pub total_score: u64,
}

/// Transition reported by `BossSystem::update`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossEvent {
    CombatStarted,
    AttackWarning { limb_id: usize, defense_word: &'static str },
    SpecialMove,
    Attack(AttackResult),
    Resolved { outcome: BossOutcome, score: BossScore },
    Exited(BossOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LimbHit {
    Destroyed {
        limb_id: usize,
        all_destroyed: bool,
        /// The limb was mid-attack; the attack is cancelled.
        countered: bool,
        points: u64,
    },
    /// No live limb matched; the timer took the typo penalty.
    Missed,
    /// Limbs cannot be targeted in this phase.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Defense {
    Blocked { points: u64 },
    Rejected,
}

/// Live prefix validation for the renderer and auto-submit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCheck {
    /// Every typed character is correct so far.
    pub valid: bool,
    pub progress: usize,
    pub total_length: usize,
    pub is_complete: bool,
    pub error_index: Option<usize>,
    /// Best-matching live limb, for limb validation.
    pub limb_id: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossSystem {
    phase: BossPhase,
    kind: Option<BossKind>,
    limbs: Vec<Limb>,
    destroyed_limbs: usize,

    base_duration: Millis,
    duration: Millis,
    time_remaining: Millis,
    start_time: Millis,

    current_hp: u32,
    no_damage_taken: bool,

    last_attack_time: Millis,
    special_move_triggered: bool,
    total_attacks: u32,
    attacks_blocked: u32,
    damage_dealt: u32,

    total_attempts: u32,
    successful_hits: u32,
    missed_attempts: u32,
    perfect_boss: bool,

    final_score: Option<BossScore>,
}

impl Default for BossSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BossSystem {
    pub fn new() -> Self {
        Self {
            phase: BossPhase::Idle,
            kind: None,
            limbs: Vec::new(),
            destroyed_limbs: 0,
            base_duration: 0.0,
            duration: 0.0,
            time_remaining: 0.0,
            start_time: 0.0,
            current_hp: MAX_HP,
            no_damage_taken: true,
            last_attack_time: 0.0,
            special_move_triggered: false,
            total_attacks: 0,
            attacks_blocked: 0,
            damage_dealt: 0,
            total_attempts: 0,
            successful_hits: 0,
            missed_attempts: 0,
            perfect_boss: true,
            final_score: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn is_engaged(&self) -> bool {
        self.phase != BossPhase::Idle
    }

    /// Combat, with or without a pending attack.
    pub fn is_fighting(&self) -> bool {
        matches!(
            self.phase,
            BossPhase::Combat | BossPhase::AttackWarning { .. } | BossPhase::SpecialWarning { .. }
        )
    }

    pub fn kind(&self) -> Option<BossKind> {
        self.kind
    }

    pub fn archetype(&self) -> Option<&'static BossArchetype> {
        self.kind.map(BossKind::archetype)
    }

    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn active_limbs(&self) -> impl Iterator<Item = &Limb> {
        self.limbs.iter().filter(|l| !l.destroyed)
    }

    pub fn active_limb_count(&self) -> usize {
        self.limbs.len() - self.destroyed_limbs
    }

    pub fn destroyed_limbs(&self) -> usize {
        self.destroyed_limbs
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn hearts(&self) -> u32 {
        self.current_hp.div_ceil(HP_PER_HEART)
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    pub fn time_remaining(&self) -> Millis {
        self.time_remaining
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        (self.time_remaining / 1000.0).ceil() as u32
    }

    pub fn attacks_blocked(&self) -> u32 {
        self.attacks_blocked
    }

    pub fn total_attacks(&self) -> u32 {
        self.total_attacks
    }

    pub fn damage_dealt(&self) -> u32 {
        self.damage_dealt
    }

    pub fn missed_attempts(&self) -> u32 {
        self.missed_attempts
    }

    pub fn special_move_triggered(&self) -> bool {
        self.special_move_triggered
    }

    pub fn final_score(&self) -> Option<&BossScore> {
        self.final_score.as_ref()
    }

    /// Milliseconds left in the current warning window.
    pub fn warning_time_left(&self, now: Millis) -> Option<Millis> {
        match self.phase {
            BossPhase::AttackWarning { started_at, .. } => {
                Some((ATTACK_WARNING_MS - (now - started_at)).max(0.0))
            }
            BossPhase::SpecialWarning { started_at } => {
                Some((SPECIAL_WARNING_MS - (now - started_at)).max(0.0))
            }
            _ => None,
        }
    }

    /// Time between attacks; shorter as limbs fall.
    pub fn attack_interval(&self) -> Millis {
        match self.active_limb_count() {
            6.. => 8000.0,
            4..=5 => 6000.0,
            2..=3 => 4000.0,
            _ => 2000.0,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Set up a battle with `words` as limb labels (taken in order).
    pub fn start(
        &mut self,
        kind: BossKind,
        words: Vec<String>,
        duration: Millis,
        countdown: Millis,
        now: Millis,
    ) -> Result<(), GameError> {
        let archetype = kind.archetype();
        if words.len() < archetype.limb_count {
            return Err(GameError::BossWordPool {
                theme: archetype.theme.to_string(),
                needed: archetype.limb_count,
                available: words.len(),
            });
        }

        *self = Self::new();
        self.kind = Some(kind);
        let count = archetype.limb_count;
        self.limbs = words
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(id, word)| Limb {
                id,
                word,
                destroyed: false,
                angle: std::f64::consts::TAU * id as f64 / count as f64,
            })
            .collect();

        self.base_duration = duration;
        self.duration = duration;
        self.time_remaining = duration;

        log::info!("Boss incoming: {} with {} limbs", archetype.name, count);

        if countdown > 0.0 {
            self.phase = BossPhase::Countdown { until: now + countdown };
        } else {
            self.begin_combat(now);
        }
        Ok(())
    }

    fn begin_combat(&mut self, now: Millis) {
        self.phase = BossPhase::Combat;
        self.start_time = now;
        self.last_attack_time = now;
        self.time_remaining = self.duration;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Poll once per frame.  Defeat is checked before anything else and again
    /// after an attack lands, so it pre-empts a same-tick timeout.
    pub fn update(&mut self, now: Millis, rng: &mut impl Rng) -> Vec<BossEvent> {
        let mut events = Vec::new();

        match self.phase {
            BossPhase::Idle => {}
            BossPhase::Countdown { until } => {
                if now >= until {
                    log::info!("Boss combat started");
                    self.begin_combat(now);
                    events.push(BossEvent::CombatStarted);
                }
            }
            BossPhase::Resolved { outcome, until } => {
                if now >= until {
                    self.reset();
                    events.push(BossEvent::Exited(outcome));
                }
            }
            BossPhase::Combat | BossPhase::AttackWarning { .. } | BossPhase::SpecialWarning { .. } => {
                if self.is_dead() {
                    events.push(self.resolve(BossOutcome::Defeat, now));
                    return events;
                }
                let time_left = self.update_timer(now);

                if let Some(event) = self.update_attack_system(now, rng) {
                    events.push(event);
                }

                if self.is_dead() {
                    events.push(self.resolve(BossOutcome::Defeat, now));
                } else if !time_left {
                    events.push(self.resolve(BossOutcome::Timeout, now));
                }
            }
        }
        events
    }

    /// Recompute `time_remaining`.  Returns whether time is left.
    pub fn update_timer(&mut self, now: Millis) -> bool {
        if !self.is_fighting() {
            return true;
        }
        self.time_remaining = (self.duration - (now - self.start_time)).max(0.0);
        self.time_remaining > 0.0
    }

    fn update_attack_system(&mut self, now: Millis, rng: &mut impl Rng) -> Option<BossEvent> {
        match self.phase {
            BossPhase::Combat => {
                if self.active_limb_count() == 1 && !self.special_move_triggered {
                    self.special_move_triggered = true;
                    self.phase = BossPhase::SpecialWarning { started_at: now };
                    log::info!("Boss special move incoming");
                    return Some(BossEvent::SpecialMove);
                }
                if now - self.last_attack_time >= self.attack_interval() {
                    return self.start_attack_warning(now, rng);
                }
                None
            }
            BossPhase::AttackWarning { limb_id, started_at, .. } => {
                if now - started_at >= ATTACK_WARNING_MS {
                    let damage = self.archetype().map_or(20, |a| a.attack_damage);
                    return Some(self.execute_attack(damage, false, Some(limb_id), now));
                }
                None
            }
            BossPhase::SpecialWarning { started_at } => {
                if now - started_at >= SPECIAL_WARNING_MS {
                    let damage = self.archetype().map_or(60, |a| a.special_move_damage);
                    return Some(self.execute_attack(damage, true, None, now));
                }
                None
            }
            _ => None,
        }
    }

    fn start_attack_warning(&mut self, now: Millis, rng: &mut impl Rng) -> Option<BossEvent> {
        let live: Vec<usize> = self.active_limbs().map(|l| l.id).collect();
        let limb_id = *live.choose(rng)?;
        let defense_word = *DEFENSE_WORDS.choose(rng)?;
        self.phase = BossPhase::AttackWarning { limb_id, defense_word, started_at: now };
        log::debug!("Boss attack warning: limb {} defend with '{}'", limb_id, defense_word);
        Some(BossEvent::AttackWarning { limb_id, defense_word })
    }

    fn execute_attack(&mut self, damage: u32, is_special: bool, limb_id: Option<usize>, now: Millis) -> BossEvent {
        self.total_attacks += 1;
        self.take_damage(damage);
        self.phase = BossPhase::Combat;
        self.last_attack_time = now;
        log::info!("Boss attack landed for {} (hp {})", damage, self.current_hp);
        BossEvent::Attack(AttackResult { damage, is_special, limb_id })
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.damage_dealt += amount;
        self.no_damage_taken = false;
        self.perfect_boss = false;
    }

    fn resolve(&mut self, outcome: BossOutcome, now: Millis) -> BossEvent {
        let score = self.calculate_score();
        let display = match outcome {
            BossOutcome::Victory => VICTORY_DISPLAY_MS,
            BossOutcome::Timeout => TIMEOUT_DISPLAY_MS,
            BossOutcome::Defeat => DEFEAT_DISPLAY_MS,
        };
        self.phase = BossPhase::Resolved { outcome, until: now + display };
        self.final_score = Some(score);
        log::info!(
            "Boss {:?}: {}/{} limbs, score {}",
            outcome,
            self.destroyed_limbs,
            self.limbs.len(),
            score.total_score
        );
        BossEvent::Resolved { outcome, score }
    }

    // ── Player actions ───────────────────────────────────────────────────────

    /// Exact, case-insensitive match against live limbs.  Destroying the last
    /// limb resolves the battle as a victory.
    pub fn attempt_destroy_limb(&mut self, word: &str, now: Millis) -> LimbHit {
        if !matches!(self.phase, BossPhase::Combat | BossPhase::AttackWarning { .. }) {
            return LimbHit::Ignored;
        }
        self.total_attempts += 1;

        let word = word.trim().to_lowercase();
        let Some(index) = self
            .limbs
            .iter()
            .position(|l| !l.destroyed && l.word.to_lowercase() == word)
        else {
            self.perfect_boss = false;
            self.missed_attempts += 1;
            self.apply_typo_penalty();
            return LimbHit::Missed;
        };

        self.limbs[index].destroyed = true;
        let limb_id = self.limbs[index].id;
        self.destroyed_limbs += 1;
        self.successful_hits += 1;

        let mut points = LIMB_POINTS;
        let countered = matches!(self.phase, BossPhase::AttackWarning { limb_id: id, .. } if id == limb_id);
        if countered {
            points += COUNTER_POINTS;
            self.phase = BossPhase::Combat;
            self.last_attack_time = now;
        }

        let all_destroyed = self.destroyed_limbs == self.limbs.len();
        if all_destroyed {
            self.resolve(BossOutcome::Victory, now);
        }

        LimbHit::Destroyed { limb_id, all_destroyed, countered, points }
    }

    /// Take `TYPO_PENALTY_MS` off the remaining time without going under the
    /// floor.  The duration shrinks with it so the next timer update keeps
    /// the loss.
    fn apply_typo_penalty(&mut self) {
        let reduced = (self.time_remaining - TYPO_PENALTY_MS)
            .max(MIN_DURATION_MS)
            .min(self.time_remaining);
        self.duration -= self.time_remaining - reduced;
        self.time_remaining = reduced;
    }

    pub fn attempt_defense(&mut self, word: &str, now: Millis) -> Defense {
        let BossPhase::AttackWarning { defense_word, .. } = self.phase else {
            return Defense::Rejected;
        };
        if word.trim().to_lowercase() != defense_word {
            return Defense::Rejected;
        }
        self.attacks_blocked += 1;
        self.phase = BossPhase::Combat;
        self.last_attack_time = now;
        log::info!("Boss attack blocked with '{}'", defense_word);
        Defense::Blocked { points: BLOCK_POINTS }
    }

    pub fn attempt_special_defense(&mut self, chant: &str, now: Millis) -> Defense {
        let (BossPhase::SpecialWarning { .. }, Some(archetype)) = (self.phase, self.archetype()) else {
            return Defense::Rejected;
        };
        if chant.trim().to_lowercase() != archetype.special_move_chant {
            return Defense::Rejected;
        }
        self.attacks_blocked += 1;
        self.phase = BossPhase::Combat;
        self.last_attack_time = now;
        log::info!("Boss special move blocked");
        Defense::Blocked { points: SPECIAL_BLOCK_POINTS }
    }

    // ── Live validation ──────────────────────────────────────────────────────

    /// Best prefix match among live limbs.
    pub fn validate_limb_input(&self, input: &str) -> InputCheck {
        if !self.is_fighting() {
            return InputCheck::default();
        }
        self.active_limbs()
            .map(|limb| {
                let mut check = prefix_check(input, &limb.word);
                check.limb_id = Some(limb.id);
                check
            })
            .filter(|c| c.progress > 0)
            .fold(None, |best: Option<InputCheck>, c| match best {
                Some(b) if b.progress >= c.progress => Some(b),
                _ => Some(c),
            })
            .unwrap_or_default()
    }

    pub fn validate_defense_input(&self, input: &str) -> InputCheck {
        match self.phase {
            BossPhase::AttackWarning { defense_word, .. } => prefix_check(input, defense_word),
            _ => InputCheck::default(),
        }
    }

    pub fn validate_special_chant(&self, input: &str) -> InputCheck {
        match (self.phase, self.archetype()) {
            (BossPhase::SpecialWarning { .. }, Some(a)) => prefix_check(input, a.special_move_chant),
            _ => InputCheck::default(),
        }
    }

    // ── Scoring ──────────────────────────────────────────────────────────────

    pub fn calculate_score(&self) -> BossScore {
        let limb_score = self.destroyed_limbs as u64 * LIMB_POINTS;
        let accuracy = if self.total_attempts > 0 {
            self.successful_hits as f64 / self.total_attempts as f64
        } else {
            1.0
        };
        let accuracy_multiplier = accuracy * accuracy;
        let time_bonus = (self.time_remaining / 1000.0).floor() as u64 * 10;

        let cleared = !self.limbs.is_empty() && self.destroyed_limbs == self.limbs.len();
        let completion_bonus = if cleared { 500 } else { 0 };
        let perfect_bonus = if cleared && self.perfect_boss { 500 } else { 0 };
        let speed_bonus = if cleared {
            let time_taken = (self.base_duration - self.time_remaining) / 1000.0;
            ((self.base_duration / 1000.0 - time_taken) * 20.0).floor().max(0.0) as u64
        } else {
            0
        };
        let defense_bonus = self.attacks_blocked as u64 * 50;
        let perfect_defense_bonus = if cleared && self.no_damage_taken { 500 } else { 0 };

        let total = limb_score as f64 * accuracy_multiplier
            + (time_bonus + completion_bonus + perfect_bonus + speed_bonus + defense_bonus + perfect_defense_bonus)
                as f64;

        BossScore {
            limb_score,
            accuracy,
            accuracy_multiplier,
            time_bonus,
            completion_bonus,
            perfect_bonus,
            speed_bonus,
            defense_bonus,
            perfect_defense_bonus,
            total_score: total.floor() as u64,
        }
    }
}

/// Character-wise prefix check; the first mismatch is the error index.
fn prefix_check(input: &str, target: &str) -> InputCheck {
    let input: Vec<char> = input.to_lowercase().chars().collect();
    let target: Vec<char> = target.to_lowercase().chars().collect();

    let progress = input
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    let error_index = (progress < input.len()).then_some(progress);

    InputCheck {
        valid: !input.is_empty() && error_index.is_none(),
        progress,
        total_length: target.len(),
        is_complete: progress == target.len() && input.len() == target.len(),
        error_index,
        limb_id: None,
    }
}
