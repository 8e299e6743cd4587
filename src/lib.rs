//! Space War — a small real-time terminal arcade shooter.
//!
//! The crate is split the same way the game is:
//! - `entities`: plain data records for every simulation entity plus the
//!   master `GameState`
//! - `compute`: pure per-frame simulation — spawning, movement integration,
//!   collision resolution, lifecycle cleanup
//! - `display`: rendering collaborator that translates a state snapshot
//!   into terminal cells
//!
//! The binary owns the terminal, the input thread and the frame-paced game
//! loop; everything it calls in here is a pure function over `GameState`.

pub mod compute;
pub mod display;
pub mod entities;

pub use entities::GameState;
