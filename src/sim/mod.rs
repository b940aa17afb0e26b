//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Frame delta clamped before use
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::{Steering, steer};
pub use collision::{circle_rect_collision, first_hit};
pub use difficulty::{difficulty_for_elapsed, level_for_elapsed};
pub use input::{HeldKeys, Joystick, MoveKey, aggregate};
pub use spawn::{SpawnEdge, SpawnRoll};
pub use state::{Dash, GameEvent, GameState, Obstacle, Player, RunPhase};
pub use tick::{TickInput, tick};
