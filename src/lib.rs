//! Neon Dodge - An arcade avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, scoring)
//! - `renderer`: WebGPU rendering collaborator (reads state, never writes it)
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance
//! - `best_score`, `settings`: LocalStorage-backed persistence

pub mod best_score;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod summary;
pub mod tuning;

pub use best_score::BestScore;
pub use settings::Settings;
pub use summary::RunSummary;
pub use tuning::Tuning;

/// Fixed game rules that are not exposed as tuning knobs
pub mod consts {
    /// Largest frame delta the simulation accepts (avoids jumps after tab suspend)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Gap kept between the player's edge and the canvas edge
    pub const WALL_INSET: f32 = 2.0;
    /// Obstacles whose corner leaves the canvas by more than this are pruned
    pub const OFFSCREEN_MARGIN: f32 = 80.0;

    /// Seconds of run time per level
    pub const LEVEL_DURATION: f32 = 15.0;
    /// Seconds of run time for the difficulty multiplier to grow by 1.0
    pub const DIFFICULTY_RAMP: f32 = 60.0;
    /// Score per second at difficulty 1.0
    pub const SCORE_RATE: f32 = 10.0;

    /// Dash charge regained per second
    pub const DASH_RECHARGE_RATE: f32 = 0.8;
    /// Fraction of the cooldown the charge must reach before a dash is allowed
    pub const DASH_READY_FRACTION: f32 = 0.98;

    /// Number of player positions kept for the glow trail
    pub const TRAIL_LENGTH: usize = 20;
}

/// Clamp a frame delta into the range the simulation accepts
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(0.016), 0.016);
        assert_eq!(clamp_frame_dt(2.5), consts::MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(-1.0), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY), 0.0);
    }
}
