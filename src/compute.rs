//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where randomness is needed, an injected RNG handle)
//! and returns a brand-new `GameState`.  Side effects are limited to the
//! injected RNG.

use std::ops::Range;

use rand::Rng;

use crate::entities::{
    Enemy, GamePhase, GameState, Particle, Player, Projectile, TickInput,
};

// ── Tuning constants ─────────────────────────────────────────────────────────

/// Default play-field size in abstract pixels.
pub const FIELD_WIDTH: f32 = 480.0;
pub const FIELD_HEIGHT: f32 = 640.0;

/// Nominal frame period in ms; `dt / FRAME_UNIT` normalises per-frame speeds
/// so motion is roughly frame-rate independent.
pub const FRAME_UNIT: f32 = 16.0;

/// Floor for the difficulty knob — keeps `spawn_interval / difficulty` and
/// the speed formulas sane for negative or NaN input.
pub const MIN_DIFFICULTY: f32 = 0.1;

pub const START_LIVES: u32 = 3;
pub const KILL_SCORE: u32 = 10;

/// Base ms between spawns; divided by difficulty.
pub const SPAWN_INTERVAL: f32 = 1200.0;

const PLAYER_WIDTH: f32 = 34.0;
const PLAYER_HEIGHT: f32 = 20.0;
const PLAYER_SPEED: f32 = 6.0;
/// The ship's base line sits this far above the field bottom.
const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

const PLAYER_BULLET_W: f32 = 4.0;
const PLAYER_BULLET_H: f32 = 8.0;
const PLAYER_BULLET_SPEED: f32 = 8.0;
/// Player bullets die strictly above this line.
const TOP_EXIT_Y: f32 = -20.0;

const ENEMY_WIDTH: f32 = 34.0;
const ENEMY_HEIGHT: f32 = 18.0;
const ENEMY_SPEED_RANGE: Range<f32> = 1.2..2.5;
const ENEMY_FIRE_RANGE: Range<f32> = 1200.0..2200.0;
/// An enemy this far past the bottom has missed the player and is dropped.
const ENEMY_EXIT_MARGIN: f32 = 50.0;

const ENEMY_BULLET_W: f32 = 6.0;
const ENEMY_BULLET_H: f32 = 10.0;
const ENEMY_BULLET_BASE_SPEED: f32 = 4.0;
/// Enemy bullets vanish silently this far past the bottom.
const BULLET_EXIT_MARGIN: f32 = 20.0;

/// Particles per explosion.
pub const BURST_SIZE: usize = 12;
const PARTICLE_SPREAD: f32 = 2.5;
const PARTICLE_LIFE_RANGE: Range<f32> = 300.0..700.0;
/// Full-opacity reference lifetime for the renderer's fade.
pub const PARTICLE_FULL_LIFE: f32 = 700.0;

/// Clamp the difficulty knob to a usable value (`f32::max` also swallows a
/// NaN input).
pub fn clamp_difficulty(difficulty: f32) -> f32 {
    difficulty.max(MIN_DIFFICULTY)
}

/// Toughness tier for a freshly spawned enemy: 1 at base difficulty, one
/// more per whole step above it.
pub fn enemy_hp(difficulty: f32) -> u32 {
    (1.0 + (difficulty - 1.0).floor()).max(1.0) as u32
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh idle session for the given difficulty and field size.
pub fn init_state(difficulty: f32, width: f32, height: f32) -> GameState {
    GameState {
        player: Player {
            x: width / 2.0,
            y: height - PLAYER_BOTTOM_OFFSET,
            w: PLAYER_WIDTH,
            h: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            bullets: Vec::new(),
        },
        enemies: Vec::new(),
        enemy_bullets: Vec::new(),
        particles: Vec::new(),
        score: 0,
        lives: START_LIVES,
        phase: GamePhase::Stopped,
        difficulty: clamp_difficulty(difficulty),
        spawn_timer: 0.0,
        spawn_interval: SPAWN_INTERVAL,
        width,
        height,
    }
}

// ── Session commands (pure) ──────────────────────────────────────────────────

/// Start: wakes an idle or paused session.  Ignored while already playing
/// and after game over — restart is the only way out of `GameOver`.
pub fn start(state: &GameState) -> GameState {
    match state.phase {
        GamePhase::Stopped | GamePhase::Paused => GameState {
            phase: GamePhase::Playing,
            ..state.clone()
        },
        GamePhase::Playing | GamePhase::GameOver => state.clone(),
    }
}

/// Pause: only a running session can pause.
pub fn pause(state: &GameState) -> GameState {
    if state.phase == GamePhase::Playing {
        GameState {
            phase: GamePhase::Paused,
            ..state.clone()
        }
    } else {
        state.clone()
    }
}

/// Restart: reinitialise the whole session — score, lives, every entity
/// collection and the spawn timer — keeping difficulty and field size, then
/// go straight to `Playing`.
pub fn restart(state: &GameState) -> GameState {
    GameState {
        phase: GamePhase::Playing,
        ..init_state(state.difficulty, state.width, state.height)
    }
}

/// Replace the difficulty multiplier.  Takes effect immediately for future
/// spawns and enemy shots; enemies already on screen keep their stats.
pub fn set_difficulty(state: &GameState, difficulty: f32) -> GameState {
    GameState {
        difficulty: clamp_difficulty(difficulty),
        ..state.clone()
    }
}

/// Enqueue one bullet at the ship's nose.  Fire is edge-triggered by the
/// driver, one bullet per key press; there is no cap on live bullets.
pub fn player_shoot(state: &GameState) -> GameState {
    let bullet = Projectile {
        x: state.player.x - 2.0,
        y: state.player.y - state.player.h,
        w: PLAYER_BULLET_W,
        h: PLAYER_BULLET_H,
        speed: PLAYER_BULLET_SPEED,
    };
    let mut player = state.player.clone();
    player.bullets.push(bullet);
    GameState {
        player,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame's `dt` (ms).  All randomness comes
/// through `rng` so callers control determinism (useful for tests with a
/// seeded RNG).
///
/// The stages run in this fixed order; nothing rebinds or wraps them at
/// runtime:
///
///   apply_input → run_spawner → update_enemies →
///   update_player_bullets → update_enemy_bullets → update_particles
pub fn tick(state: &GameState, input: &TickInput, dt: f32, rng: &mut impl Rng) -> GameState {
    if !state.phase.is_running() {
        return state.clone();
    }
    let state = apply_input(state, input, dt);
    let state = run_spawner(&state, dt, rng);
    let state = update_enemies(&state, dt);
    let state = update_player_bullets(&state, rng);
    let state = update_enemy_bullets(&state, rng);
    update_particles(&state, dt)
}

/// Movement is level-triggered from the held-key sample (opposing keys
/// cancel out); each buffered fire press becomes one bullet.  The ship is
/// clamped to the field after every move.
pub fn apply_input(state: &GameState, input: &TickInput, dt: f32) -> GameState {
    let mut player = state.player.clone();
    let step = player.speed * dt / FRAME_UNIT;
    if input.left {
        player.x -= step;
    }
    if input.right {
        player.x += step;
    }
    let half = player.w / 2.0;
    player.x = player.x.clamp(half, state.width - half);

    let mut state = GameState {
        player,
        ..state.clone()
    };
    for _ in 0..input.fire {
        state = player_shoot(&state);
    }
    state
}

/// Timer-driven enemy spawner.  Higher difficulty shortens the interval and
/// raises speed and toughness — it is the single knob.  At most one enemy
/// spawns per tick.
pub fn run_spawner(state: &GameState, dt: f32, rng: &mut impl Rng) -> GameState {
    let spawn_timer = state.spawn_timer + dt;
    if spawn_timer <= state.spawn_interval / state.difficulty {
        return GameState {
            spawn_timer,
            ..state.clone()
        };
    }

    let enemy = Enemy {
        x: rng.gen_range(ENEMY_WIDTH..state.width - ENEMY_WIDTH),
        y: -ENEMY_HEIGHT,
        w: ENEMY_WIDTH,
        h: ENEMY_HEIGHT,
        speed: rng.gen_range(ENEMY_SPEED_RANGE) * state.difficulty,
        hp: enemy_hp(state.difficulty),
        fire_timer: 0.0,
        fire_interval: rng.gen_range(ENEMY_FIRE_RANGE),
    };
    let mut enemies = state.enemies.clone();
    enemies.push(enemy);
    GameState {
        enemies,
        spawn_timer: 0.0,
        ..state.clone()
    }
}

/// Descend every enemy, run its fire timer, and drop the ones that have
/// fallen past the field (missed the player, no penalty).  An enemy may
/// still fire on the tick it leaves.
pub fn update_enemies(state: &GameState, dt: f32) -> GameState {
    let mut enemy_bullets = state.enemy_bullets.clone();
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .filter_map(|e| {
            let mut e = *e;
            e.y += e.speed * dt / FRAME_UNIT;
            e.fire_timer += dt;
            if e.fire_timer > e.fire_interval {
                e.fire_timer = 0.0;
                enemy_bullets.push(Projectile {
                    x: e.x + e.w / 2.0 - ENEMY_BULLET_W / 2.0,
                    y: e.y + e.h,
                    w: ENEMY_BULLET_W,
                    h: ENEMY_BULLET_H,
                    speed: ENEMY_BULLET_BASE_SPEED + state.difficulty,
                });
            }
            (e.y <= state.height + ENEMY_EXIT_MARGIN).then_some(e)
        })
        .collect();

    GameState {
        enemies,
        enemy_bullets,
        ..state.clone()
    }
}

/// Move player bullets and resolve their collisions against enemies.
///
/// Bullets advance by their fixed speed each pass.  Both scans run
/// newest-first (reverse insertion order); a bullet spends itself on its
/// first hit, and a killed enemy is excluded from every later check in the
/// same pass.  Each kill spawns an explosion at the enemy's former centre
/// and scores `KILL_SCORE`.
pub fn update_player_bullets(state: &GameState, rng: &mut impl Rng) -> GameState {
    let bullets: Vec<Projectile> = state
        .player
        .bullets
        .iter()
        .map(|b| Projectile {
            y: b.y - b.speed,
            ..*b
        })
        .collect();

    let mut killed: Vec<usize> = Vec::new();
    let mut spent: Vec<usize> = Vec::new();
    let mut bursts: Vec<(f32, f32)> = Vec::new();

    for bi in (0..bullets.len()).rev() {
        for ei in (0..state.enemies.len()).rev() {
            if killed.contains(&ei) {
                continue;
            }
            if bullets[bi].rect().overlaps(&state.enemies[ei].rect()) {
                killed.push(ei);
                spent.push(bi);
                bursts.push(state.enemies[ei].center());
                break;
            }
        }
    }

    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed.contains(i))
        .map(|(_, e)| *e)
        .collect();

    // Spent bullets are gone; survivors above the top margin are discarded
    // (strictly above — a bullet exactly on the line lives one more pass).
    let bullets: Vec<Projectile> = bullets
        .iter()
        .enumerate()
        .filter(|(i, b)| !spent.contains(i) && b.y >= TOP_EXIT_Y)
        .map(|(_, b)| *b)
        .collect();

    let mut particles = state.particles.clone();
    for (x, y) in bursts {
        particles.extend(explosion_burst(x, y, rng));
    }

    let score = state.score + KILL_SCORE * killed.len() as u32;
    let player = Player {
        bullets,
        ..state.player.clone()
    };

    GameState {
        player,
        enemies,
        particles,
        score,
        ..state.clone()
    }
}

/// Move enemy bullets and resolve hits against the player's padded hit box.
/// A bullet is spent on its hit and checked no further; bullets past the
/// bottom vanish silently.
pub fn update_enemy_bullets(state: &GameState, rng: &mut impl Rng) -> GameState {
    let hit_box = state.player.hit_box();
    let mut hits: u32 = 0;

    let enemy_bullets: Vec<Projectile> = state
        .enemy_bullets
        .iter()
        .filter_map(|b| {
            let b = Projectile {
                y: b.y + b.speed,
                ..*b
            };
            if b.rect().overlaps(&hit_box) {
                hits += 1;
                return None;
            }
            (b.y <= state.height + BULLET_EXIT_MARGIN).then_some(b)
        })
        .collect();

    let mut state = GameState {
        enemy_bullets,
        ..state.clone()
    };
    for _ in 0..hits {
        state = hit_player(&state, rng);
    }
    state
}

/// Player-hit handler: one life gone (saturating), an explosion at the
/// ship, and the terminal `GameOver` transition exactly when lives reaches
/// zero.  One-way — only restart leaves `GameOver`.
pub fn hit_player(state: &GameState, rng: &mut impl Rng) -> GameState {
    let lives = state.lives.saturating_sub(1);
    let mut particles = state.particles.clone();
    particles.extend(explosion_burst(state.player.x, state.player.y, rng));
    let phase = if lives == 0 {
        GamePhase::GameOver
    } else {
        state.phase
    };
    GameState {
        lives,
        particles,
        phase,
        ..state.clone()
    }
}

/// One explosion: exactly `BURST_SIZE` particles scattered from the origin
/// with uniform velocities and lifetimes.
pub fn explosion_burst(x: f32, y: f32, rng: &mut impl Rng) -> Vec<Particle> {
    (0..BURST_SIZE)
        .map(|_| Particle {
            x,
            y,
            vx: rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            vy: rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            life: rng.gen_range(PARTICLE_LIFE_RANGE),
        })
        .collect()
}

/// Drift the debris and burn lifetime down; particles at or below zero life
/// never survive into the next frame.
pub fn update_particles(state: &GameState, dt: f32) -> GameState {
    let particles: Vec<Particle> = state
        .particles
        .iter()
        .filter_map(|p| {
            let p = Particle {
                x: p.x + p.vx * dt / FRAME_UNIT,
                y: p.y + p.vy * dt / FRAME_UNIT,
                life: p.life - dt,
                ..*p
            };
            (p.life > 0.0).then_some(p)
        })
        .collect();
    GameState {
        particles,
        ..state.clone()
    }
}
