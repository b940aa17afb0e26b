//! Score and difficulty progression
//!
//! Both are functions of simulated run time only, so a paused run does not
//! get harder while it waits.

use crate::consts::{DIFFICULTY_RAMP, LEVEL_DURATION, SCORE_RATE};
use crate::tuning::Tuning;

/// Level tier for a run time: 1 for the first 15 s, then +1 every 15 s
#[inline]
pub fn level_for_elapsed(elapsed: f32) -> u32 {
    1 + (elapsed.max(0.0) / LEVEL_DURATION).floor() as u32
}

/// Continuous multiplier that speeds up spawning and scoring (unbounded)
#[inline]
pub fn difficulty_for_elapsed(elapsed: f32) -> f32 {
    1.0 + elapsed.max(0.0) / DIFFICULTY_RAMP
}

/// Score earned for surviving `dt` seconds at the given difficulty
#[inline]
pub fn score_gain(dt: f32, difficulty: f32) -> f64 {
    f64::from(dt) * f64::from(SCORE_RATE) * f64::from(difficulty)
}

/// Player movement speed at a level, before any dash bonus
pub fn player_speed(tuning: &Tuning, base_speed: f32, level: u32) -> f32 {
    base_speed + level.saturating_sub(1) as f32 * tuning.player_speed_per_level
}

/// Mean seconds between spawns at the given difficulty
pub fn spawn_interval(tuning: &Tuning, difficulty: f32) -> f32 {
    tuning.base_spawn_interval / difficulty.max(1.0)
}

/// Obstacle speed before the random spread is applied
pub fn obstacle_speed(tuning: &Tuning, elapsed: f32, level: u32) -> f32 {
    tuning.obstacle_base_speed
        + elapsed * tuning.obstacle_speed_per_second
        + level as f32 * tuning.obstacle_speed_per_level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_steps_every_fifteen_seconds() {
        assert_eq!(level_for_elapsed(0.0), 1);
        assert_eq!(level_for_elapsed(14.9), 1);
        assert_eq!(level_for_elapsed(15.0), 2);
        assert_eq!(level_for_elapsed(29.99), 2);
        assert_eq!(level_for_elapsed(45.0), 4);
    }

    #[test]
    fn test_difficulty_ramps_linearly() {
        assert_eq!(difficulty_for_elapsed(0.0), 1.0);
        assert_eq!(difficulty_for_elapsed(30.0), 1.5);
        assert_eq!(difficulty_for_elapsed(600.0), 11.0);
    }

    #[test]
    fn test_score_gain_positive_for_positive_dt() {
        assert!(score_gain(0.001, 1.0) > 0.0);
        assert_eq!(score_gain(0.0, 3.0), 0.0);
        assert!((score_gain(1.0, 2.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_speeds_scale_with_level() {
        let tuning = Tuning::default();
        assert_eq!(player_speed(&tuning, 230.0, 1), 230.0);
        assert_eq!(player_speed(&tuning, 230.0, 3), 266.0);
        assert_eq!(obstacle_speed(&tuning, 0.0, 1), 142.0);
        assert_eq!(obstacle_speed(&tuning, 10.0, 1), 182.0);
        assert!((spawn_interval(&tuning, 2.0) - 0.425).abs() < 1e-6);
    }
}
