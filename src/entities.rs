//! All game entity types — pure data plus the geometry accessors the
//! collision pass reads.

/// Axis-aligned bounding box, top-left origin, field units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Overlap test.  Two boxes are separated only when one lies strictly
    /// past the other on some axis, so touching edges count as a hit.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x + self.w < other.x
            || self.x > other.x + other.w
            || self.y + self.h < other.y
            || self.y > other.y + other.h)
    }
}

/// Session/loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle before the first start.
    Stopped,
    Playing,
    Paused,
    /// Terminal until an explicit restart.
    GameOver,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        *self == GamePhase::Playing
    }
}

// ── Projectiles & particles ───────────────────────────────────────────────────

/// Shared shape for player and enemy shots; the owning collection decides
/// the travel direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Field units per update pass (deliberately not dt-scaled, see DESIGN.md).
    pub speed: f32,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

/// Short-lived explosion debris.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining lifetime in ms; the renderer fades on the remaining fraction.
    pub life: f32,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Horizontal centre of the ship.
    pub x: f32,
    /// Base line of the ship; fixed near the field bottom.
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Field units per nominal frame while a movement key is held.
    pub speed: f32,
    /// Bullets this ship has fired, oldest first.
    pub bullets: Vec<Projectile>,
}

impl Player {
    /// Collision box: full width, twice the ship height, top at the apex.
    /// Intentionally taller than the drawn ship so hits feel fair.
    pub fn hit_box(&self) -> Rect {
        Rect {
            x: self.x - self.w / 2.0,
            y: self.y - self.h,
            w: self.w,
            h: self.h * 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Descent speed in field units per nominal frame.
    pub speed: f32,
    /// Toughness tier, scales with difficulty; surfaced as a renderer tint.
    pub hp: u32,
    pub fire_timer: f32,
    pub fire_interval: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Per-tick input sample ─────────────────────────────────────────────────────

/// What the driver sampled between two ticks: level-triggered movement keys
/// and the number of buffered fire presses (fire is edge-triggered).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub lives: u32,
    pub phase: GamePhase,
    /// The single knob: spawn rate, enemy speed, toughness and shot speed
    /// all scale with it.  Clamped to a small positive minimum.
    pub difficulty: f32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub width: f32,
    pub height: f32,
}
