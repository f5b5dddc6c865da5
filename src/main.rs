mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use env_logger::Env;
use rand::rngs::ThreadRng;
use rand::thread_rng;

use typing_rush::compute::{backspace, init_state, push_char, restart, submit, switch_branch, tick};
use typing_rush::config::GameConfig;
use typing_rush::entities::{GameState, GameStatus, Millis, PowerUpKind};
use typing_rush::error::GameError;
use typing_rush::words::BuiltinWords;

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".typing_rush_score")
}

fn load_high_score() -> u64 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u64) {
    if let Err(e) = std::fs::write(high_score_path(), score.to_string()) {
        log::warn!("Could not save high score: {}", e);
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u64,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "»  TYPING  RUSH  «";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(6),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let rules: &[&str] = &[
        "Type the highlighted word to run from the wall.",
        "Every 5 words: FRENZY sentence.  Every 12: BOSS.",
        "Keep typing clean to build fever heat.",
    ];
    for (i, line) in rules.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(24), cy.saturating_sub(4) + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }

    // Power-up legend
    out.queue(cursor::MoveTo(cx.saturating_sub(24), cy))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups (complete a tagged word):"))?;

    for (i, kind) in PowerUpKind::ALL.iter().enumerate() {
        let row = cy + 1 + (i / 2) as u16;
        let col = if i % 2 == 0 { cx.saturating_sub(24) } else { cx + 2 };
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(kind.symbol()))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", kind.name())))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(24), cy + 5))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("ENTER : Start   Q / ESC : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Enter => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Milliseconds since the program clock started.
fn millis_since(epoch: Instant) -> Millis {
    epoch.elapsed().as_secs_f64() * 1000.0
}

/// Returns `true` to quit the program, `false` to go back to the menu.
/// `R` on the results screen starts a new run in place.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    words: &mut BuiltinWords<ThreadRng>,
    rx: &mpsc::Receiver<Event>,
    epoch: Instant,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let frame = Duration::from_millis(state.config.frame_ms);
    let mut last = millis_since(epoch);

    loop {
        let frame_start = Instant::now();
        let now = millis_since(epoch);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            if code == KeyCode::Esc
                || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
            {
                return Ok(true);
            }

            if state.status == GameStatus::GameOver {
                match code {
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        *state = restart(state, words, now);
                        last = now;
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(false),
                    _ => {}
                }
                continue;
            }

            *state = match code {
                KeyCode::Char(c) => push_char(state, c, now, words, &mut rng),
                KeyCode::Backspace => backspace(state, now, words, &mut rng),
                KeyCode::Enter => submit(state, now),
                KeyCode::Tab => switch_branch(state),
                _ => continue,
            };
        }

        if state.status == GameStatus::Playing {
            *state = tick(state, now - last, now, words, &mut rng);
        }
        last = now;

        let (width, height) = terminal::size()?;
        display::render(out, state, now, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events let the loop ignore key-ups on terminals that send them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Event reader stopped: {}", e);
                    break;
                }
            }
        }
    });

    let result = run(&mut out, &rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(GameError::from)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
) -> std::io::Result<()> {
    let mut high_score = load_high_score();
    let mut words = BuiltinWords::new(thread_rng());
    let epoch = Instant::now();

    loop {
        match show_menu(out, rx, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let mut state = init_state(config.clone(), &mut words, millis_since(epoch));
                state.high_score = high_score;
                let quit = game_loop(out, &mut state, &mut words, rx, epoch)?;

                // Persist new high score if beaten
                let best = state.high_score.max(state.scoring.points());
                if best > high_score {
                    high_score = best;
                    save_high_score(high_score);
                }

                if quit {
                    break;
                }
            }
        }
    }
    log::info!("Session ended with best score {}", high_score);
    Ok(())
}
