//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only scales field
//! units onto the terminal cell grid and translates state into terminal
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::compute::PARTICLE_FULL_LIFE;
use crate::entities::{Enemy, GamePhase, GameState, Particle, Projectile};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_STAR: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_ENEMY_TOUGH: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const STAR_COUNT: u32 = 40;

// ── Field → cell mapping ──────────────────────────────────────────────────────

/// Scales field coordinates onto the cell grid between the borders
/// (row 0 is the HUD, row 1 and `rows-2` the border bars, the last row the
/// controls hint).
#[derive(Clone, Copy)]
struct Grid {
    cols: u16,
    rows: u16,
    field_w: f32,
    field_h: f32,
}

impl Grid {
    /// Cell for a field point; `None` when the point is outside the field
    /// (spawning enemies and exiting bullets simply don't draw).
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.field_w || y >= self.field_h {
            return None;
        }
        let inner_w = f32::from(self.cols.saturating_sub(2));
        let inner_h = f32::from(self.rows.saturating_sub(4));
        let cx = 1 + (x / self.field_w * inner_w) as u16;
        let cy = 2 + (y / self.field_h * inner_h) as u16;
        Some((
            cx.min(self.cols.saturating_sub(2)),
            cy.min(self.rows.saturating_sub(3)),
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame from a read-only state snapshot.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let grid = Grid {
        cols,
        rows,
        field_w: state.width,
        field_h: state.height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, state, cols)?;
    draw_stars(out, &grid)?;

    for particle in &state.particles {
        draw_particle(out, &grid, particle)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, &grid, enemy)?;
    }
    for bullet in &state.player.bullets {
        draw_bullet(out, &grid, bullet, true)?;
    }
    for bullet in &state.enemy_bullets {
        draw_bullet(out, &grid, bullet, false)?;
    }
    draw_player(out, &grid, state)?;
    draw_controls_hint(out, rows)?;

    match state.phase {
        GamePhase::Stopped => draw_start_hint(out, cols, rows)?,
        GamePhase::Paused => draw_paused(out, cols, rows)?,
        GamePhase::GameOver => draw_game_over(out, state, cols, rows)?,
        GamePhase::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn difficulty_tag(difficulty: f32) -> (String, Color) {
    if difficulty == 1.0 {
        ("[ EASY ]".to_string(), Color::Green)
    } else if difficulty == 1.5 {
        ("[ NORMAL ]".to_string(), Color::Yellow)
    } else if difficulty == 2.0 {
        ("[ HARD ]".to_string(), Color::Red)
    } else {
        (format!("[ x{:.1} ]", difficulty), Color::Cyan)
    }
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    // Difficulty — centre
    let (tag, tag_color) = difficulty_tag(state.difficulty);
    let tx = (cols / 2).saturating_sub(tag.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(tag_color))?;
    out.queue(Print(&tag))?;

    // Lives — right
    let hearts: String = "♥".repeat(state.lives as usize);
    let lives_str = format!("Lives:{}", hearts);
    let rx = cols.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

/// Dim deterministic star field (same pseudo-layout every frame).
fn draw_stars<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    for i in 0..STAR_COUNT {
        let sx = (i * 53) as f32 % grid.field_w;
        let sy = (i * 37) as f32 % grid.field_h;
        if let Some((cx, cy)) = grid.cell(sx, sy) {
            out.queue(cursor::MoveTo(cx, cy))?;
            out.queue(Print("·"))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, grid: &Grid, state: &GameState) -> std::io::Result<()> {
    // 2-row sprite:
    //   ▲       ← apex
    //  /█\      ← fuselage + wings
    let p = &state.player;
    if let Some((cx, cy)) = grid.cell(p.x, p.y) {
        out.queue(style::SetForegroundColor(C_PLAYER))?;
        out.queue(cursor::MoveTo(cx, cy.saturating_sub(1)))?;
        out.queue(Print("▲"))?;
        out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), cy))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, grid: &Grid, enemy: &Enemy) -> std::io::Result<()> {
    let (x, y) = enemy.center();
    if let Some((cx, cy)) = grid.cell(x, y) {
        // Tougher tiers get their own tint so the knob is visible on screen.
        let color = if enemy.hp > 1 { C_ENEMY_TOUGH } else { C_ENEMY };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), cy))?;
        out.queue(Print("▟█▙"))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    grid: &Grid,
    bullet: &Projectile,
    from_player: bool,
) -> std::io::Result<()> {
    if let Some((cx, cy)) = grid.cell(bullet.x, bullet.y) {
        out.queue(cursor::MoveTo(cx, cy))?;
        if from_player {
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        } else {
            out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

/// Debris fades with its remaining lifetime fraction.
fn draw_particle<W: Write>(out: &mut W, grid: &Grid, particle: &Particle) -> std::io::Result<()> {
    if let Some((cx, cy)) = grid.cell(particle.x, particle.y) {
        let fraction = (particle.life / PARTICLE_FULL_LIFE).clamp(0.0, 1.0);
        let color = if fraction > 0.66 {
            Color::Yellow
        } else if fraction > 0.33 {
            Color::DarkYellow
        } else {
            Color::DarkGrey
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print("•"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Fire   S : Start   P : Pause   R : Restart   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Print `lines` centred on the play field, one per row.
fn draw_center_lines<W: Write>(
    out: &mut W,
    cols: u16,
    rows: u16,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_start_hint<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════════╗".to_string(), Color::Cyan),
        ("║     SPACE  WAR       ║".to_string(), Color::Cyan),
        ("╚══════════════════════╝".to_string(), Color::Cyan),
        ("S - Start   Q - Quit".to_string(), Color::White),
    ];
    draw_center_lines(out, cols, rows, &lines)
}

fn draw_paused<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines = [
        ("╔════════════╗".to_string(), Color::Yellow),
        ("║   PAUSED   ║".to_string(), Color::Yellow),
        ("╚════════════╝".to_string(), Color::Yellow),
        ("S - Resume".to_string(), Color::White),
    ];
    draw_center_lines(out, cols, rows, &lines)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", state.score), Color::Yellow),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_center_lines(out, cols, rows, &lines)
}
