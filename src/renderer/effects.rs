//! Presentation-only state: the glow trail and the dash flash
//!
//! Kept outside `GameState` so drawing never has to write to the simulation.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::TRAIL_LENGTH;
use crate::sim::GameState;

/// Seconds the dash flash takes to fade
pub const PULSE_DURATION: f32 = 0.15;

#[derive(Debug, Clone, Default)]
pub struct FrameEffects {
    /// Recent player positions, oldest first
    trail: VecDeque<Vec2>,
    /// Dash flash intensity (0-1)
    pulse: f32,
}

impl FrameEffects {
    pub fn new() -> Self {
        Self {
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            pulse: 0.0,
        }
    }

    /// Record the player position for this frame
    pub fn record(&mut self, state: &GameState) {
        self.trail.push_back(state.player.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn trigger_pulse(&mut self) {
        self.pulse = 1.0;
    }

    /// Fade time-based effects
    pub fn update(&mut self, dt: f32) {
        self.pulse = (self.pulse - dt / PULSE_DURATION).max(0.0);
    }

    /// Clear trail (on restart)
    pub fn clear(&mut self) {
        self.trail.clear();
        self.pulse = 0.0;
    }

    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    pub fn pulse(&self) -> f32 {
        self.pulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_is_capped() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let mut fx = FrameEffects::new();
        for i in 0..30 {
            state.player.pos.x = i as f32;
            fx.record(&state);
        }
        assert_eq!(fx.trail().len(), TRAIL_LENGTH);
        assert_eq!(fx.trail().back().map(|p| p.x), Some(29.0));
        assert_eq!(fx.trail().front().map(|p| p.x), Some(10.0));
    }

    #[test]
    fn test_pulse_fades() {
        let mut fx = FrameEffects::new();
        fx.trigger_pulse();
        fx.update(PULSE_DURATION / 2.0);
        assert!((fx.pulse() - 0.5).abs() < 1e-5);
        fx.update(1.0);
        assert_eq!(fx.pulse(), 0.0);
    }
}
