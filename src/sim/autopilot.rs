//! Idle/demo steering
//!
//! Dodges by summing repulsion from nearby obstacles and drifting back
//! toward the middle of the arena. Reads state only; the result is fed in as
//! a joystick vector so it goes through the same aggregation as a player.

use glam::Vec2;

use super::state::GameState;

/// Obstacles further than this from the player are ignored (px)
pub const DANGER_RADIUS: f32 = 160.0;
/// Obstacles closer than this trigger a dash when one is ready (px)
pub const PANIC_RADIUS: f32 = 60.0;
/// Weight of the pull toward the arena centre
const CENTER_PULL: f32 = 0.002;

/// What the autopilot wants to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub direction: Vec2,
    pub dash: bool,
}

pub fn steer(state: &GameState) -> Steering {
    let player = &state.player;
    let mut push = Vec2::ZERO;
    let mut closest = f32::INFINITY;

    for obstacle in &state.obstacles {
        let center = obstacle.center();
        // Lead the obstacle slightly so we move out of its path, not just away
        let ahead = center + obstacle.vel * 0.25;
        let away = player.pos - ahead;
        let dist = away.length();
        closest = closest.min(player.pos.distance(center));
        if dist < DANGER_RADIUS && dist > f32::EPSILON {
            push += away / (dist * dist);
        }
    }

    let arena_center = Vec2::new(state.width, state.height) / 2.0;
    let home = (arena_center - player.pos) * CENTER_PULL / DANGER_RADIUS;

    Steering {
        direction: (push + home).normalize_or_zero(),
        dash: closest < PANIC_RADIUS && player.dash.is_ready(),
    }
}
