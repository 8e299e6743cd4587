use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
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
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_war::compute::{self, FIELD_HEIGHT, FIELD_WIDTH};
use space_war::display;
use space_war::entities::{GamePhase, GameState, TickInput};

/// Terminal space shooter: dodge the descending fleet, shoot back, rack up
/// points.
#[derive(Parser, Debug)]
#[command(name = "space_war", version, about)]
struct Args {
    /// Difficulty multiplier; skips the selection menu when given.
    #[arg(long)]
    difficulty: Option<f32>,

    /// Seed for the simulation RNG; omit for a different run every time.
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second for the loop driver.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

/// Menu presets, selected with the 1/2/3 keys (also live, mid-game).
const DIFFICULTY_PRESETS: [f32; 3] = [1.0, 1.5, 2.0];

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms at
/// 30 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Deferred game-over notice ─────────────────────────────────────────────────

/// The delay lets the final frame (ship explosion) reach the screen first.
const GAME_OVER_NOTICE_DELAY: Duration = Duration::from_millis(50);

/// One-shot notice scheduled on the `GameOver` transition and cancelled by
/// restart, so a quick restart can never surface a stale score.
struct Deferred {
    due: Instant,
    score: u32,
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(f32),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SPACE  WAR  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green, "Sparse, slow raiders"),
        ("2", "Normal", Color::Yellow, "Balanced challenge"),
        ("3", "Hard  ", Color::Red, "Fast, tough and relentless!"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Fire   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(DIFFICULTY_PRESETS[0])),
                KeyCode::Char('2') => return Ok(MenuResult::Start(DIFFICULTY_PRESETS[1])),
                KeyCode::Char('3') => return Ok(MenuResult::Start(DIFFICULTY_PRESETS[2])),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drives the session until the user quits.
///
/// Input model: instead of acting on each key event individually, a
/// `key_frame` map records the frame number of the last press/repeat event
/// for every key.  Each frame we check which keys are still "fresh" (within
/// `HOLD_WINDOW` frames) and sample them into the tick input, so movement
/// and fire work simultaneously.  Fire is different: edge-triggered, one
/// buffered shot per press event, consumed by the next tick.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames
///   of silence.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_budget: Duration,
) -> Result<()> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut pending_fire: u32 = 0;
    let mut last_tick: Option<Instant> = None;
    let mut notice: Option<Deferred> = None;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                // Press: record key + handle one-shot commands
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') => {
                            pending_fire += 1;
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
                            let started = !state.phase.is_running();
                            *state = compute::start(state);
                            if started && state.phase.is_running() {
                                last_tick = None; // first tick after start sees dt = 0
                            }
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            *state = compute::pause(state);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            *state = compute::restart(state);
                            notice = None; // cancelled before it can fire
                            pending_fire = 0;
                            last_tick = None;
                            log::info!("restart at difficulty {:.1}", state.difficulty);
                        }
                        KeyCode::Char(c @ '1'..='3') => {
                            let preset = DIFFICULTY_PRESETS[c as usize - '1' as usize];
                            *state = compute::set_difficulty(state, preset);
                            log::info!("difficulty set to {:.1}", state.difficulty);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // Elapsed real time since the previous iteration; the first tick
        // after start/restart sees 0 so there is no initial jump.
        let dt = match last_tick {
            Some(prev) => prev.elapsed().as_secs_f32() * 1000.0,
            None => 0.0,
        };
        last_tick = Some(Instant::now());

        if state.phase.is_running() {
            let input = TickInput {
                left: is_held(&key_frame, &KeyCode::Left, frame)
                    || is_held(&key_frame, &KeyCode::Char('a'), frame)
                    || is_held(&key_frame, &KeyCode::Char('A'), frame),
                right: is_held(&key_frame, &KeyCode::Right, frame)
                    || is_held(&key_frame, &KeyCode::Char('d'), frame)
                    || is_held(&key_frame, &KeyCode::Char('D'), frame),
                fire: std::mem::take(&mut pending_fire),
            };
            *state = compute::tick(state, &input, dt, rng);
            if state.phase == GamePhase::GameOver {
                notice = Some(Deferred {
                    due: Instant::now() + GAME_OVER_NOTICE_DELAY,
                    score: state.score,
                });
            }
        } else {
            pending_fire = 0;
        }

        if let Some(deferred) = &notice {
            if Instant::now() >= deferred.due {
                log::info!("game over: final score {}", deferred.score);
                notice = None;
            }
        }

        display::render(out, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back
    // gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &args);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, args: &Args) -> Result<()> {
    let difficulty = match args.difficulty {
        Some(d) => d,
        None => match show_menu(out, rx)? {
            MenuResult::Start(d) => d,
            MenuResult::Quit => return Ok(()),
        },
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut state = compute::init_state(difficulty, FIELD_WIDTH, FIELD_HEIGHT);
    log::info!("session start: difficulty {:.1}", state.difficulty);

    let frame_budget = Duration::from_millis(1000 / u64::from(args.fps.max(1)));
    game_loop(out, &mut state, rx, &mut rng, frame_budget)
}
