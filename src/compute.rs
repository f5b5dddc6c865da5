/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the clock value and, where needed, the word source and
/// an RNG handle) and returns a brand-new `GameState`.  Side effects are
/// limited to the injected word source and RNG.

use rand::Rng;

use crate::boss::{BossEvent, BossKind, BossOutcome, BossPhase, BossSystem, Defense, LimbHit};
use crate::config::GameConfig;
use crate::entities::{
    Background, Banner, Branch, GameOverReason, GameState, GameStatus, Millis, PartialMatch,
    Player, PowerUpKind, Scoring, Typing,
};
use crate::fever::FeverSystem;
use crate::frenzy::{feedback_speed, FrenzyController, FrenzyEvent, FrenzyPhase, WordResult};
use crate::powerups::PowerUpSystem;
use crate::words::{partial_match, WordSource};

/// Longest input kept in the buffer.
const MAX_INPUT_CHARS: usize = 50;
/// Danger-wall contact position.
const DANGER_POSITION: f64 = 0.02;
/// Scroll stays stopped this long after a sub-mode exits.
const RESUME_DELAY_MS: Millis = 1_000.0;
const BANNER_MS: Millis = 1_200.0;
const WPM_HISTORY_LEN: usize = 10;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state for a fresh run starting at `now`.
pub fn init_state(config: GameConfig, words: &mut impl WordSource, now: Millis) -> GameState {
    GameState {
        player: Player {
            position: 0.5,
            speed: 0.0,
            safe_wall_contact_time: 0.0,
            was_in_safe_zone: false,
        },
        background: Background {
            offset: 0.0,
            scroll_speed: config.base_scroll_speed,
            base_speed: config.base_scroll_speed,
            max_speed: config.max_scroll_speed,
            resume_at: None,
        },
        typing: Typing {
            current_input: String::new(),
            words_per_minute: 0,
            start_time: now,
            wpm_history: Vec::new(),
            had_error_during_word: false,
        },
        scoring: Scoring {
            score: 0.0,
            combo: 0,
            words_completed: 0,
            best_wpm: 0,
        },
        fever: FeverSystem::new(),
        power_ups: PowerUpSystem::new(),
        frenzy: FrenzyController::new(),
        boss: BossSystem::new(),
        pair: words.next_word_pair(0),
        active_branch: Branch::First,
        words_since_frenzy: 0,
        words_since_boss: 0,
        status: GameStatus::Playing,
        game_over_reason: None,
        banner: None,
        high_score: 0,
        frame: 0,
        config,
    }
}

/// New run with the same config, carrying the high score forward.
pub fn restart(state: &GameState, words: &mut impl WordSource, now: Millis) -> GameState {
    let mut next = init_state(state.config.clone(), words, now);
    next.high_score = state.high_score.max(state.scoring.points());
    next
}

// ── Input-driven state transitions ───────────────────────────────────────────

/// Type one character.  A space submits the current word in frenzy and in
/// boss combat; during a special-move chant it is part of the phrase.
pub fn push_char(
    state: &GameState,
    c: char,
    now: Millis,
    words: &mut impl WordSource,
    rng: &mut impl Rng,
) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let chanting = matches!(state.boss.phase(), BossPhase::SpecialWarning { .. });
    if c == ' ' && state.in_sub_mode() && !chanting {
        return submit(state, now);
    }

    let mut s = state.clone();
    s.typing.current_input.push(c);
    apply_input(&mut s, now, words, rng);
    s
}

pub fn backspace(
    state: &GameState,
    now: Millis,
    words: &mut impl WordSource,
    rng: &mut impl Rng,
) -> GameState {
    if state.status != GameStatus::Playing || state.typing.current_input.is_empty() {
        return state.clone();
    }
    let mut s = state.clone();
    s.typing.current_input.pop();
    apply_input(&mut s, now, words, rng);
    s
}

/// Explicit submit (Space/Enter).  Normal words complete on their own, so
/// this only acts inside frenzy and boss mode.
pub fn submit(state: &GameState, now: Millis) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut s = state.clone();
    let input = s.typing.current_input.trim().to_string();

    if s.frenzy.is_active() {
        match s.frenzy.submit_word(&input, now) {
            Some(result) => apply_frenzy_word(&mut s, result, now),
            None => flash(&mut s, "Type something first!", now),
        }
    } else if s.boss.is_fighting() {
        if input.is_empty() {
            return s;
        }
        match s.boss.phase() {
            BossPhase::SpecialWarning { .. } => match s.boss.attempt_special_defense(&input, now) {
                Defense::Blocked { points } => {
                    s.scoring.score += points as f64;
                    s.typing.current_input.clear();
                    flash(&mut s, "SPECIAL BLOCKED!", now);
                }
                Defense::Rejected => flash(&mut s, "WRONG CHANT", now),
            },
            BossPhase::AttackWarning { .. } => match s.boss.attempt_defense(&input, now) {
                Defense::Blocked { points } => {
                    s.scoring.score += points as f64;
                    s.typing.current_input.clear();
                    flash(&mut s, "BLOCKED!", now);
                }
                Defense::Rejected => destroy_limb(&mut s, &input, now),
            },
            _ => destroy_limb(&mut s, &input, now),
        }
    }
    s
}

/// Swap which of the two words is being typed.  Normal play only.
pub fn switch_branch(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing || state.in_sub_mode() {
        return state.clone();
    }
    let mut s = state.clone();
    s.active_branch = s.active_branch.other();
    s.typing.current_input.clear();
    s
}

fn apply_input(s: &mut GameState, now: Millis, words: &mut impl WordSource, rng: &mut impl Rng) {
    if s.boss.is_engaged() {
        handle_boss_input(s, now);
    } else if s.frenzy.is_engaged() {
        handle_frenzy_input(s, now);
    } else {
        handle_normal_input(s, now, words, rng);
    }
    update_wpm(s, now);
}

// ── Normal play ──────────────────────────────────────────────────────────────

/// Lowercase, keep word characters, whitespace, `'` and `-`, trim, cap.
pub fn sanitize_input(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '\'' || *c == '-')
        .take(MAX_INPUT_CHARS)
        .collect()
}

fn handle_normal_input(s: &mut GameState, now: Millis, words: &mut impl WordSource, rng: &mut impl Rng) {
    s.typing.current_input = sanitize_input(&s.typing.current_input);
    if s.typing.current_input.is_empty() {
        return;
    }

    let m = partial_match(&s.typing.current_input, s.target_word());
    if m.is_complete {
        complete_word(s, now, words, rng);
    } else {
        update_player_speed(s, m);
    }
}

/// Per-keystroke movement.  Errors push back and break the combo unless a
/// shield or laser focus is up, which turn them into a small step forward.
fn update_player_speed(s: &mut GameState, m: PartialMatch) {
    if m.has_error {
        s.typing.had_error_during_word = true;
        s.fever.on_typing_error();

        if s.power_ups.is_active(PowerUpKind::Shield) {
            s.player.speed = 0.05;
            return;
        }
        if s.power_ups.is_active(PowerUpKind::LaserFocus) {
            s.player.speed = 0.08;
            return;
        }
        s.player.speed = -0.04;
        s.scoring.combo = 0;
    } else {
        let progress = if m.total > 0 { m.correct as f64 / m.total as f64 } else { 0.0 };
        let speed = 0.05 + progress * 0.15;
        s.player.speed = speed * s.power_ups.multiplier_of(PowerUpKind::Speed).unwrap_or(1.0);
    }
}

fn complete_word(s: &mut GameState, now: Millis, words: &mut impl WordSource, rng: &mut impl Rng) {
    if !s.typing.had_error_during_word {
        s.fever.on_perfect_word(now);
    }
    s.fever.on_combo_increase(s.scoring.combo + 1, now);
    s.fever
        .on_wpm_burst(s.typing.words_per_minute as f64, average_wpm(&s.typing), now);

    if let Some(drop) = s.pair.power_up(s.active_branch) {
        s.power_ups.activate_power_up(drop.kind, drop.rarity, now);
        flash(s, &format!("{} {}!", drop.kind.symbol(), drop.kind.name()), now);
    }

    let mut multiplier = s.fever.score_multiplier();
    if let Some(m) = s.power_ups.multiplier_of(PowerUpKind::Multiplier) {
        multiplier *= m;
        s.power_ups.consume_multiplier_use();
    }
    s.scoring.score += (10.0 + s.scoring.combo as f64 * 2.0) * multiplier;
    s.scoring.combo += 1;
    s.scoring.words_completed += 1;
    s.typing.current_input.clear();
    s.typing.had_error_during_word = false;

    // Only one sub-mode may start per word; boss first.
    s.words_since_boss += 1;
    if s.words_since_boss >= s.config.boss_trigger_interval {
        s.words_since_boss = 0;
        if start_boss(s, now, words, rng) {
            return;
        }
    }
    s.words_since_frenzy += 1;
    if s.words_since_frenzy >= s.config.frenzy_trigger_interval {
        s.words_since_frenzy = 0;
        if start_frenzy(s, now, words) {
            return;
        }
    }

    let boost = 0.3 + s.scoring.combo as f64 * 0.05;
    s.player.speed = boost * s.power_ups.multiplier_of(PowerUpKind::Speed).unwrap_or(1.0);
    update_difficulty(s);
    s.pair = words.next_word_pair(s.scoring.points());
}

fn average_wpm(typing: &Typing) -> f64 {
    if typing.wpm_history.is_empty() {
        return typing.words_per_minute as f64;
    }
    typing.wpm_history.iter().map(|&w| w as f64).sum::<f64>() / typing.wpm_history.len() as f64
}

fn update_wpm(s: &mut GameState, now: Millis) {
    let minutes = (now - s.typing.start_time) / 1000.0 / 60.0;
    if minutes <= 0.0 {
        return;
    }
    let typed = s.scoring.words_completed as f64 + s.typing.current_input.chars().count() as f64 / 5.0;
    let wpm = (typed / minutes).round() as u32;
    s.typing.words_per_minute = wpm;

    if wpm > 0 {
        s.typing.wpm_history.push(wpm);
        if s.typing.wpm_history.len() > WPM_HISTORY_LEN {
            s.typing.wpm_history.remove(0);
        }
    }
    s.scoring.best_wpm = s.scoring.best_wpm.max(wpm);
}

/// Scroll speed follows WPM (against 60) and score (against 200).
fn update_difficulty(s: &mut GameState) {
    let wpm_factor = (s.typing.words_per_minute as f64 / 60.0).min(1.0);
    let score_factor = (s.scoring.score / 200.0).min(1.0);
    let level = (wpm_factor + score_factor) / 2.0;
    let bg = &mut s.background;
    bg.scroll_speed = bg.base_speed + level * (bg.max_speed - bg.base_speed);
}

// ── Sub-mode entry and exit ──────────────────────────────────────────────────

/// Park the player in the safe zone and stop the wall.
fn enter_sub_mode(s: &mut GameState) {
    s.player.position = 0.9;
    s.player.speed = 0.0;
    s.background.scroll_speed = 0.0;
    s.background.resume_at = None;
    s.typing.current_input.clear();
}

fn exit_sub_mode(s: &mut GameState, now: Millis, words: &mut impl WordSource) {
    s.player.position = s.player.position.max(0.7);
    s.player.speed = 0.0;
    s.typing.current_input.clear();
    s.active_branch = Branch::First;
    s.pair = words.next_word_pair(s.scoring.points());
    s.background.scroll_speed = 0.0;
    s.background.resume_at = Some(now + RESUME_DELAY_MS);
}

fn start_boss(s: &mut GameState, now: Millis, words: &mut impl WordSource, rng: &mut impl Rng) -> bool {
    let kind = BossKind::random(rng);
    let archetype = kind.archetype();
    let started = words
        .boss_word_pool(archetype.theme, archetype.limb_count)
        .and_then(|pool| {
            s.boss.start(
                kind,
                pool,
                s.config.boss_duration_ms,
                s.config.boss_countdown_ms,
                now,
            )
        });

    match started {
        Ok(()) => {
            enter_sub_mode(s);
            true
        }
        Err(e) => {
            log::warn!("Boss could not start: {}", e);
            false
        }
    }
}

fn start_frenzy(s: &mut GameState, now: Millis, words: &mut impl WordSource) -> bool {
    let sentence = words.next_frenzy_sentence();
    match s.frenzy.start(sentence, s.config.frenzy_duration_ms, s.config.frenzy_countdown_ms, now) {
        Ok(()) => {
            enter_sub_mode(s);
            s.fever.trigger_fever_rush(now);
            true
        }
        Err(e) => {
            log::warn!("Frenzy could not start: {}", e);
            false
        }
    }
}

// ── Frenzy ───────────────────────────────────────────────────────────────────

fn handle_frenzy_input(s: &mut GameState, now: Millis) {
    s.typing.current_input = s.typing.current_input.to_lowercase().chars().take(MAX_INPUT_CHARS).collect();
    let input = s.typing.current_input.clone();

    let Some(keystroke) = s.frenzy.handle_input(&input, now) else {
        return;
    };
    if keystroke.penalized {
        flash(s, "-2.0s", now);
    }
    match keystroke.submitted {
        Some(result) => apply_frenzy_word(s, result, now),
        None => s.player.speed = feedback_speed(keystroke.accuracy),
    }
}

fn apply_frenzy_word(s: &mut GameState, result: WordResult, now: Millis) {
    s.scoring.score += result.score as f64;
    s.scoring.words_completed += 1;
    s.typing.current_input.clear();

    if let Some(bonus) = result.bonus {
        s.scoring.score += bonus as f64;
        flash(s, &format!("FRENZY COMPLETE! +{}", bonus), now);
    } else if result.time_delta > 0.0 {
        flash(s, &format!("+{:.1}s", result.time_delta / 1000.0), now);
    } else if result.time_delta < 0.0 {
        flash(s, &format!("{:.1}s", result.time_delta / 1000.0), now);
    }
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Live boss input: complete words submit themselves.
fn handle_boss_input(s: &mut GameState, now: Millis) {
    s.typing.current_input = s.typing.current_input.to_lowercase().chars().take(MAX_INPUT_CHARS).collect();
    let input = s.typing.current_input.clone();

    match s.boss.phase() {
        BossPhase::SpecialWarning { .. } => {
            if s.boss.validate_special_chant(&input).is_complete {
                if let Defense::Blocked { points } = s.boss.attempt_special_defense(&input, now) {
                    s.scoring.score += points as f64;
                    s.typing.current_input.clear();
                    flash(s, "SPECIAL BLOCKED!", now);
                }
            }
        }
        BossPhase::AttackWarning { .. } => {
            if s.boss.validate_defense_input(&input).is_complete {
                if let Defense::Blocked { points } = s.boss.attempt_defense(&input, now) {
                    s.scoring.score += points as f64;
                    s.typing.current_input.clear();
                    flash(s, "BLOCKED!", now);
                }
            } else if s.boss.validate_limb_input(&input).is_complete {
                destroy_limb(s, &input, now);
            }
        }
        BossPhase::Combat => {
            if s.boss.validate_limb_input(&input).is_complete {
                destroy_limb(s, &input, now);
            }
        }
        _ => {}
    }
}

fn destroy_limb(s: &mut GameState, input: &str, now: Millis) {
    match s.boss.attempt_destroy_limb(input, now) {
        LimbHit::Destroyed { all_destroyed, countered, points, .. } => {
            s.scoring.score += points as f64;
            s.typing.current_input.clear();
            if countered {
                flash(s, "COUNTER! +50", now);
            }
            if all_destroyed {
                if let Some(result) = s.boss.final_score() {
                    s.scoring.score += result.total_score as f64;
                    let text = format!("VICTORY! +{}", result.total_score);
                    flash(s, &text, now);
                }
            }
        }
        LimbHit::Missed => {
            s.typing.current_input.clear();
            flash(s, "MISS -3.0s", now);
        }
        LimbHit::Ignored => {}
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by `dt` milliseconds ending at `now`.
///
/// Order within a frame: power-ups, fever, frenzy, boss, background and
/// player physics, then the danger-wall check.
pub fn tick(
    state: &GameState,
    dt: Millis,
    now: Millis,
    words: &mut impl WordSource,
    rng: &mut impl Rng,
) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut s = state.clone();
    s.frame += 1;

    // ── 1. Power-ups ─────────────────────────────────────────────────────────
    s.power_ups.update_power_ups(now);

    // ── 2. Fever ─────────────────────────────────────────────────────────────
    let is_typing = !s.typing.current_input.is_empty();
    if !s.frenzy.is_engaged() {
        s.fever.apply_decay(dt, s.player.position, is_typing, false);
    }
    s.fever.update_fever_rush(now);
    if !s.frenzy.is_engaged() && is_typing {
        s.fever.on_danger_zone_typing(s.player.position, dt, now);
    }
    s.fever.on_right_wall_touch(s.player.position, now);

    // ── 3. Frenzy ────────────────────────────────────────────────────────────
    match s.frenzy.update(now) {
        Some(FrenzyEvent::TimedOut) => flash(&mut s, "TIME UP!", now),
        Some(FrenzyEvent::Exited(_)) => exit_sub_mode(&mut s, now, words),
        Some(FrenzyEvent::Started) | None => {}
    }

    // ── 4. Boss ──────────────────────────────────────────────────────────────
    for event in s.boss.update(now, rng) {
        match event {
            BossEvent::CombatStarted => {
                // Keys typed during the countdown never count toward a limb.
                s.typing.current_input.clear();
                flash(&mut s, "FIGHT!", now);
            }
            BossEvent::AttackWarning { defense_word, .. } => {
                let text = format!("INCOMING! type '{}'", defense_word);
                flash(&mut s, &text, now);
            }
            BossEvent::SpecialMove => flash(&mut s, "SPECIAL MOVE! chant to survive", now),
            BossEvent::Attack(hit) => {
                let text = format!("HIT! -{} HP", hit.damage);
                flash(&mut s, &text, now);
            }
            BossEvent::Resolved { outcome, score } => {
                s.scoring.score += score.total_score as f64;
                let text = match outcome {
                    BossOutcome::Victory => format!("VICTORY! +{}", score.total_score),
                    BossOutcome::Timeout => format!("TIME UP! +{}", score.total_score),
                    BossOutcome::Defeat => "DEFEATED".to_string(),
                };
                flash(&mut s, &text, now);
            }
            BossEvent::Exited(BossOutcome::Defeat) => {
                return game_over(&s, GameOverReason::BossDefeat, now);
            }
            BossEvent::Exited(_) => exit_sub_mode(&mut s, now, words),
        }
    }

    // ── 5. Background and physics ────────────────────────────────────────────
    if let Some(at) = s.background.resume_at {
        if now >= at {
            s.background.scroll_speed = s.background.base_speed;
            s.background.resume_at = None;
        }
    }
    update_physics(&mut s, dt);

    // ── 6. Danger wall ───────────────────────────────────────────────────────
    if s.player.position <= DANGER_POSITION && !s.in_sub_mode() {
        return game_over(&s, GameOverReason::DangerWall, now);
    }

    if s.banner.as_ref().is_some_and(|b| now >= b.until) {
        s.banner = None;
    }
    s
}

/// Tug-of-war between typing speed and scroll pressure.
fn update_physics(s: &mut GameState, dt: Millis) {
    let mut scroll = s.background.scroll_speed;
    if let Some(warp) = s.power_ups.multiplier_of(PowerUpKind::TimeWarp) {
        scroll *= warp;
    }
    if s.power_ups.is_active(PowerUpKind::Freeze) {
        scroll = 0.0;
    }
    s.background.offset += scroll * dt * 0.016;

    if matches!(s.frenzy.phase(), FrenzyPhase::Countdown { .. }) {
        s.player.position = s.player.position.max(0.85);
        s.player.speed = 0.0;
    } else {
        let pressure = scroll * 0.008;
        s.player.position = (s.player.position + (s.player.speed - pressure) * dt * 0.016).clamp(0.0, 1.0);
        s.player.speed *= 0.92;
    }

    let in_safe_zone = s.player.position >= 0.95;
    let contact = &mut s.player.safe_wall_contact_time;
    if in_safe_zone {
        *contact = (*contact + dt * 0.016).min(3.0);
    } else {
        *contact = (*contact - dt * 0.032).max(0.0);
    }
    s.player.was_in_safe_zone = in_safe_zone;
}

// ── Game over ────────────────────────────────────────────────────────────────

/// End the run.  Score, words and best WPM stay for the results screen;
/// every sub-system is reset.
pub fn game_over(state: &GameState, reason: GameOverReason, now: Millis) -> GameState {
    let mut s = state.clone();
    s.status = GameStatus::GameOver;
    s.game_over_reason = Some(reason);
    s.scoring.best_wpm = s.scoring.best_wpm.max(s.typing.words_per_minute);
    s.high_score = s.high_score.max(s.scoring.points());

    s.frenzy.reset();
    s.boss.reset();
    s.fever.reset();
    s.power_ups.reset();
    s.typing.current_input.clear();
    s.banner = None;

    log::info!(
        "Game over ({:?}) at {:.0}s: score {}, {} words, best {} WPM",
        reason,
        (now - s.typing.start_time) / 1000.0,
        s.scoring.points(),
        s.scoring.words_completed,
        s.scoring.best_wpm
    );
    s
}

fn flash(s: &mut GameState, text: &str, now: Millis) {
    s.banner = Some(Banner {
        text: text.to_string(),
        until: now + BANNER_MS,
    });
}
