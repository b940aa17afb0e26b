//! Data-driven game balance
//!
//! Every knob that shapes how a run plays lives here so balance passes can
//! happen in JSON without touching simulation code. Missing fields fall back
//! to the defaults, so a tuning file only needs the values it overrides.

use serde::{Deserialize, Serialize};

/// Largest absolute value any tuning knob may take
pub const MAX_MAGNITUDE: f32 = 1.0e6;

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player circle radius (px)
    pub player_radius: f32,
    /// Movement speed at level 1 (px/s)
    pub player_speed: f32,
    /// Extra movement speed per level above 1 (px/s)
    pub player_speed_per_level: f32,

    // === Dash ===
    /// Charge needed for a dash (seconds of recharge at rate 1.0)
    pub dash_cooldown: f32,
    /// Bonus speed while a dash burst is active (px/s)
    pub dash_bonus_speed: f32,
    /// Length of a dash burst (s)
    pub dash_duration: f32,

    // === Spawning ===
    /// Seconds between spawns at difficulty 1.0
    pub base_spawn_interval: f32,
    /// Random spread applied to the spawn interval
    pub spawn_jitter: (f32, f32),

    // === Obstacles ===
    /// Obstacle speed at the start of a run (px/s)
    pub obstacle_base_speed: f32,
    /// Obstacle speed gained per second of run time
    pub obstacle_speed_per_second: f32,
    /// Obstacle speed gained per level
    pub obstacle_speed_per_level: f32,
    /// Random spread applied to obstacle speed
    pub obstacle_speed_jitter: (f32, f32),
    /// Max sideways velocity as a fraction of forward speed
    pub obstacle_lateral_factor: f32,
    /// Smallest obstacle side (px)
    pub obstacle_min_size: f32,
    /// Largest obstacle side before level growth (px)
    pub obstacle_max_size: f32,
    /// Growth of the largest side per level (px)
    pub obstacle_size_per_level: f32,
    /// Level after which obstacles stop growing
    pub obstacle_size_level_cap: u32,
    /// Obstacle lifetime range (s)
    pub obstacle_lifetime: (f32, f32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 12.0,
            player_speed: 230.0,
            player_speed_per_level: 18.0,

            dash_cooldown: 2.2,
            dash_bonus_speed: 370.0,
            dash_duration: 0.12,

            base_spawn_interval: 0.85,
            spawn_jitter: (0.7, 1.3),

            obstacle_base_speed: 120.0,
            obstacle_speed_per_second: 4.0,
            obstacle_speed_per_level: 22.0,
            obstacle_speed_jitter: (0.9, 1.2),
            obstacle_lateral_factor: 0.5,
            obstacle_min_size: 16.0,
            obstacle_max_size: 38.0,
            obstacle_size_per_level: 8.0,
            obstacle_size_level_cap: 4,
            obstacle_lifetime: (5.0, 12.0),
        }
    }
}

impl Tuning {
    /// Parse a tuning file, keeping defaults for absent fields
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Upper bound of the obstacle size range at a given level
    pub fn obstacle_size_cap(&self, level: u32) -> f32 {
        let growth_levels = level.min(self.obstacle_size_level_cap) as f32;
        (self.obstacle_max_size + self.obstacle_size_per_level * growth_levels)
            .max(self.obstacle_min_size)
    }

    /// Repair values that would make sampling ranges empty, inverted or
    /// non-finite. Non-finite fields fall back to their defaults and every
    /// magnitude is capped at [`MAX_MAGNITUDE`].
    pub fn sanitized(self) -> Self {
        fn value(name: &str, v: f32, fallback: f32) -> f32 {
            if v.is_finite() {
                v.clamp(-MAX_MAGNITUDE, MAX_MAGNITUDE)
            } else {
                log::warn!("Tuning {} is not finite, using {}", name, fallback);
                fallback
            }
        }

        fn range(name: &str, r: (f32, f32), fallback: (f32, f32)) -> (f32, f32) {
            let (lo, hi) = (value(name, r.0, fallback.0), value(name, r.1, fallback.1));
            if lo <= hi { (lo, hi) } else { (hi, lo) }
        }

        let d = Self::default();
        Self {
            player_radius: value("player_radius", self.player_radius, d.player_radius).max(1.0),
            player_speed: value("player_speed", self.player_speed, d.player_speed),
            player_speed_per_level: value(
                "player_speed_per_level",
                self.player_speed_per_level,
                d.player_speed_per_level,
            ),

            dash_cooldown: value("dash_cooldown", self.dash_cooldown, d.dash_cooldown),
            dash_bonus_speed: value("dash_bonus_speed", self.dash_bonus_speed, d.dash_bonus_speed),
            dash_duration: value("dash_duration", self.dash_duration, d.dash_duration),

            base_spawn_interval: value(
                "base_spawn_interval",
                self.base_spawn_interval,
                d.base_spawn_interval,
            )
            .max(0.05),
            spawn_jitter: range("spawn_jitter", self.spawn_jitter, d.spawn_jitter),

            obstacle_base_speed: value(
                "obstacle_base_speed",
                self.obstacle_base_speed,
                d.obstacle_base_speed,
            ),
            obstacle_speed_per_second: value(
                "obstacle_speed_per_second",
                self.obstacle_speed_per_second,
                d.obstacle_speed_per_second,
            ),
            obstacle_speed_per_level: value(
                "obstacle_speed_per_level",
                self.obstacle_speed_per_level,
                d.obstacle_speed_per_level,
            ),
            obstacle_speed_jitter: range(
                "obstacle_speed_jitter",
                self.obstacle_speed_jitter,
                d.obstacle_speed_jitter,
            ),
            obstacle_lateral_factor: value(
                "obstacle_lateral_factor",
                self.obstacle_lateral_factor,
                d.obstacle_lateral_factor,
            )
            .max(0.0),
            obstacle_min_size: value("obstacle_min_size", self.obstacle_min_size, d.obstacle_min_size)
                .max(1.0),
            obstacle_max_size: value("obstacle_max_size", self.obstacle_max_size, d.obstacle_max_size),
            obstacle_size_per_level: value(
                "obstacle_size_per_level",
                self.obstacle_size_per_level,
                d.obstacle_size_per_level,
            ),
            obstacle_size_level_cap: self.obstacle_size_level_cap,
            obstacle_lifetime: range("obstacle_lifetime", self.obstacle_lifetime, d.obstacle_lifetime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 300.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 300.0);
        assert_eq!(tuning.dash_cooldown, 2.2);
        assert_eq!(tuning.obstacle_lifetime, (5.0, 12.0));
    }

    #[test]
    fn test_inverted_ranges_are_reordered() {
        let tuning = Tuning::from_json(r#"{ "obstacle_lifetime": [9.0, 3.0] }"#).unwrap();
        assert_eq!(tuning.obstacle_lifetime, (3.0, 9.0));
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_spawn_interval": 1e39 }"#).unwrap();
        assert_eq!(tuning.base_spawn_interval, 0.85);

        let tuning = Tuning::from_json(r#"{ "obstacle_speed_jitter": [0.9, 1e39] }"#).unwrap();
        assert_eq!(tuning.obstacle_speed_jitter, (0.9, 1.2));

        let tuning = Tuning::from_json(r#"{ "player_speed": -1e39 }"#).unwrap();
        assert_eq!(tuning.player_speed, 230.0);
    }

    #[test]
    fn test_huge_values_are_capped() {
        let tuning = Tuning::from_json(r#"{ "obstacle_base_speed": 3e38 }"#).unwrap();
        assert_eq!(tuning.obstacle_base_speed, MAX_MAGNITUDE);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ player_speed: }").is_err());
    }

    #[test]
    fn test_obstacle_size_cap_stops_growing() {
        let tuning = Tuning::default();
        assert_eq!(tuning.obstacle_size_cap(1), 46.0);
        assert_eq!(tuning.obstacle_size_cap(4), 70.0);
        assert_eq!(tuning.obstacle_size_cap(9), 70.0);
    }
}
