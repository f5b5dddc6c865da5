/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use typing_rush::boss::BossOutcome;
use typing_rush::entities::{Branch, GameOverReason, GameState, GameStatus, Millis, Rarity};
use typing_rush::powerups::Remaining;
use typing_rush::snapshot::{self, BossSnapshot, FrenzySnapshot, Snapshot, WarningPrompt};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_STAT: Color = Color::White;
const C_DANGER: Color = Color::Red;
const C_SAFE: Color = Color::Green;
const C_TRACK: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::Cyan;
const C_WORD: Color = Color::White;
const C_WORD_ACTIVE: Color = Color::Yellow;
const C_TYPED_OK: Color = Color::Green;
const C_TYPED_BAD: Color = Color::Red;
const C_FRENZY: Color = Color::Magenta;
const C_BOSS: Color = Color::Red;
const C_BANNER: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Fever bar colour per level.
const FEVER_COLORS: [Color; 5] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::DarkYellow,
    Color::Red,
];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    now: Millis,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let snap = snapshot::snapshot(state, now);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, &snap, width)?;
    draw_fever_bar(out, &snap, width)?;
    draw_track(out, &snap, width)?;

    if snap.boss.active {
        draw_boss(out, &snap.boss, width)?;
    } else if snap.frenzy.active {
        draw_frenzy(out, &snap.frenzy, width)?;
    } else {
        draw_word_pair(out, state, width)?;
    }

    draw_input(out, state, height)?;
    draw_banner(out, state, width, height)?;
    draw_controls_hint(out, height)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn centre(width: u16, text: &str) -> u16 {
    (width / 2).saturating_sub(text.chars().count() as u16 / 2)
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, snap: &Snapshot, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if state.high_score > 0 {
        out.queue(Print(format!("Score:{:>7}  Hi:{:>7}", snap.run.score, state.high_score)))?;
    } else {
        out.queue(Print(format!("Score:{:>7}", snap.run.score)))?;
    }

    let stats = format!("Combo:{:<3} WPM:{:<3}", snap.run.combo, snap.run.wpm);
    out.queue(cursor::MoveTo(centre(width, &stats), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAT))?;
    out.queue(Print(&stats))?;

    // Active power-ups, right-aligned
    let tags: Vec<String> = snap
        .power_ups
        .iter()
        .map(|p| {
            let left = match p.remaining {
                Remaining::Millis(ms) => format!("{}s", (ms / 1000.0).ceil() as u32),
                Remaining::Words(n) => format!("{}w", n),
            };
            format!("[{} {}]", p.kind.symbol(), left)
        })
        .collect();
    let right = tags.join(" ");
    if !right.is_empty() {
        let rx = width.saturating_sub(right.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(rx, 0))?;
        let color = match snap.power_ups.iter().map(|p| p.rarity).last() {
            Some(Rarity::Epic) => Color::Magenta,
            Some(Rarity::Rare) => Color::Cyan,
            _ => Color::White,
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(&right))?;
    }
    Ok(())
}

// ── Fever bar (row 2) ─────────────────────────────────────────────────────────

fn draw_fever_bar<W: Write>(out: &mut W, snap: &Snapshot, width: u16) -> std::io::Result<()> {
    let fever = &snap.fever;
    let label = if fever.rush_active {
        format!(
            " {} x{:.1} {:>2}s",
            fever.level_name,
            fever.multiplier,
            (fever.rush_time_left / 1000.0).ceil() as u32
        )
    } else {
        format!(" {} x{:.1}", fever.level_name, fever.multiplier)
    };
    let bar_width = (width as usize).saturating_sub(label.chars().count() + 10).min(50);
    let filled = ((fever.heat_percent / 100.0) * bar_width as f64).round() as usize;

    out.queue(cursor::MoveTo(2, 2))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Heat "))?;
    out.queue(style::SetForegroundColor(FEVER_COLORS[fever.level as usize]))?;
    out.queue(Print("█".repeat(filled.min(bar_width))))?;
    out.queue(style::SetForegroundColor(C_TRACK))?;
    out.queue(Print("░".repeat(bar_width.saturating_sub(filled))))?;
    out.queue(style::SetForegroundColor(FEVER_COLORS[fever.level as usize]))?;
    out.queue(Print(label))?;
    Ok(())
}

// ── Track (row 4) ─────────────────────────────────────────────────────────────

/// The tug-of-war lane: danger wall on the left, safe wall on the right.
fn draw_track<W: Write>(out: &mut W, snap: &Snapshot, width: u16) -> std::io::Result<()> {
    let lane = width.saturating_sub(6).max(1);
    let marker = ((snap.run.position_percent / 100.0) * (lane - 1) as f64).round() as u16;

    out.queue(cursor::MoveTo(2, 4))?;
    out.queue(style::SetForegroundColor(C_DANGER))?;
    out.queue(Print("▓"))?;
    out.queue(style::SetForegroundColor(C_TRACK))?;
    out.queue(Print("·".repeat(lane as usize)))?;
    out.queue(style::SetForegroundColor(C_SAFE))?;
    out.queue(Print("▓"))?;

    out.queue(cursor::MoveTo(3 + marker, 4))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print("@"))?;
    Ok(())
}

// ── Normal play ───────────────────────────────────────────────────────────────

fn draw_word_pair<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    let half = width / 2;
    for branch in [Branch::First, Branch::Second] {
        let word = state.pair.word(branch);
        let tag = state
            .pair
            .power_up(branch)
            .map(|p| format!(" {}", p.kind.symbol()))
            .unwrap_or_default();
        let active = branch == state.active_branch;
        let slot_centre = match branch {
            Branch::First => half / 2,
            Branch::Second => half + half / 2,
        };
        let text = format!("{}{}", word, tag);
        let col = slot_centre.saturating_sub(text.chars().count() as u16 / 2);

        out.queue(cursor::MoveTo(col, 7))?;
        if active {
            draw_typed_word(out, word, &state.typing.current_input)?;
            out.queue(style::SetForegroundColor(C_WORD_ACTIVE))?;
            out.queue(Print(tag))?;
            out.queue(cursor::MoveTo(col, 8))?;
            out.queue(Print("▔".repeat(text.chars().count())))?;
        } else {
            out.queue(style::SetForegroundColor(C_WORD))?;
            out.queue(Print(text))?;
        }
    }
    Ok(())
}

/// Print `word` with its typed prefix coloured by correctness.
fn draw_typed_word<W: Write>(out: &mut W, word: &str, input: &str) -> std::io::Result<()> {
    let typed: Vec<char> = input.chars().collect();
    for (i, c) in word.chars().enumerate() {
        let color = match typed.get(i) {
            Some(t) if t.to_lowercase().eq(c.to_lowercase()) => C_TYPED_OK,
            Some(_) => C_TYPED_BAD,
            None => C_WORD_ACTIVE,
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(c))?;
    }
    Ok(())
}

// ── Frenzy ────────────────────────────────────────────────────────────────────

fn draw_frenzy<W: Write>(out: &mut W, frenzy: &FrenzySnapshot, width: u16) -> std::io::Result<()> {
    let title = format!(
        "FRENZY [{}]  {}s  {}/{}  WPM {}  Acc {}%",
        frenzy.theme,
        frenzy.time_remaining_seconds,
        frenzy.word_index,
        frenzy.total_words,
        frenzy.current_wpm,
        frenzy.accuracy_percent
    );
    out.queue(cursor::MoveTo(centre(width, &title), 6))?;
    out.queue(style::SetForegroundColor(C_FRENZY))?;
    out.queue(Print(&title))?;

    // Wrap the sentence across rows, highlighting the current word
    let max_col = width.saturating_sub(4);
    let (mut col, mut row) = (3u16, 8u16);
    for (i, word) in frenzy.words.iter().enumerate() {
        let len = word.chars().count() as u16 + 1;
        if col + len > max_col {
            col = 3;
            row += 1;
        }
        let color = match i.cmp(&frenzy.word_index) {
            std::cmp::Ordering::Less => C_TYPED_OK,
            std::cmp::Ordering::Equal => C_WORD_ACTIVE,
            std::cmp::Ordering::Greater => C_WORD,
        };
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(word))?;
        col += len;
    }

    let result = match (frenzy.completed_bonus, frenzy.timed_out) {
        (Some(bonus), _) => Some(format!("SENTENCE COMPLETE!  +{}", bonus)),
        (None, true) => Some("OUT OF TIME".to_string()),
        _ => None,
    };
    if let Some(text) = result {
        out.queue(cursor::MoveTo(centre(width, &text), row + 2))?;
        out.queue(style::SetForegroundColor(C_BANNER))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Boss ──────────────────────────────────────────────────────────────────────

fn draw_boss<W: Write>(out: &mut W, boss: &BossSnapshot, width: u16) -> std::io::Result<()> {
    let hearts = format!("{}{}", "♥".repeat(boss.hearts as usize), "♡".repeat(5usize.saturating_sub(boss.hearts as usize)));
    let title = format!("{}   {}   {}s", boss.name, hearts, boss.time_remaining_seconds);
    out.queue(cursor::MoveTo(centre(width, &title), 6))?;
    out.queue(style::SetForegroundColor(C_BOSS))?;
    out.queue(Print(&title))?;

    if let Some(secs) = boss.countdown_seconds {
        let text = format!("GET READY... {}", secs);
        out.queue(cursor::MoveTo(centre(width, &text), 8))?;
        out.queue(style::SetForegroundColor(C_BANNER))?;
        out.queue(Print(text))?;
        return Ok(());
    }

    // Two columns of limbs
    for (i, limb) in boss.limbs.iter().enumerate() {
        let col = if i % 2 == 0 { 4 } else { width / 2 + 2 };
        let row = 8 + (i / 2) as u16;
        out.queue(cursor::MoveTo(col, row))?;
        let (marker, color) = if limb.destroyed {
            ("✗", C_TRACK)
        } else if limb.under_attack {
            ("!", C_DANGER)
        } else {
            ("◆", C_WORD)
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(format!("{} {}", marker, limb.word)))?;
    }

    let warn_row = 9 + boss.limbs.len().div_ceil(2) as u16;
    if let Some(warning) = &boss.attack_warning {
        let text = match warning.prompt {
            WarningPrompt::Defense(word) => {
                format!("ATTACK! type '{}'  {:.1}s", word, warning.countdown / 1000.0)
            }
            WarningPrompt::Chant(chant) => {
                format!("SPECIAL! chant: \"{}\"  {:.1}s", chant, warning.countdown / 1000.0)
            }
        };
        out.queue(cursor::MoveTo(centre(width, &text), warn_row))?;
        out.queue(style::SetForegroundColor(C_DANGER))?;
        out.queue(Print(text))?;
    }

    if let Some((outcome, score)) = boss.result {
        let text = match outcome {
            BossOutcome::Victory => format!("BOSS DEFEATED!  +{}", score),
            BossOutcome::Timeout => format!("THE BOSS ESCAPED  +{}", score),
            BossOutcome::Defeat => "YOU WERE DEFEATED".to_string(),
        };
        out.queue(cursor::MoveTo(centre(width, &text), warn_row + 1))?;
        out.queue(style::SetForegroundColor(C_BANNER))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Input line and banner ─────────────────────────────────────────────────────

fn draw_input<W: Write>(out: &mut W, state: &GameState, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(3, height.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(C_HUD_STAT))?;
    out.queue(Print(format!("> {}_", state.typing.current_input)))?;
    Ok(())
}

fn draw_banner<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    if let Some(banner) = &state.banner {
        out.queue(cursor::MoveTo(centre(width, &banner.text), height.saturating_sub(4)))?;
        out.queue(style::SetForegroundColor(C_BANNER))?;
        out.queue(Print(&banner.text))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Type to move   TAB : Switch word   SPACE/ENTER : Submit   ESC : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let score = state.scoring.points();
    let new_best = score >= state.high_score && score > 0;

    let reason = match state.game_over_reason {
        Some(GameOverReason::BossDefeat) => "The boss overpowered you",
        _ => "The wall caught you",
    };
    let lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (reason.to_string(), Color::DarkGrey),
        (format!("Final Score: {:>7}", score), Color::Yellow),
        (
            if new_best {
                format!("★ NEW BEST: {:>7} ★", score)
            } else {
                format!("Best Score:  {:>7}", state.high_score)
            },
            if new_best { Color::Yellow } else { Color::DarkGrey },
        ),
        (
            format!("Words: {}   Best WPM: {}", state.scoring.words_completed, state.scoring.best_wpm),
            Color::White,
        ),
        ("R - Play Again  Q - Menu  ESC - Quit".to_string(), Color::White),
    ];

    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(centre(width, msg), start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
