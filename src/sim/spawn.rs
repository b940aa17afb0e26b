//! Obstacle spawning and pool maintenance
//!
//! All randomness is drawn from the caller's RNG so a seeded run always
//! produces the same obstacle sequence.

use glam::Vec2;
use rand::Rng;

use super::difficulty::{obstacle_speed, spawn_interval};
use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// Canvas edge an obstacle enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Left,
        SpawnEdge::Right,
        SpawnEdge::Top,
        SpawnEdge::Bottom,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Sampled parameters of a single obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRoll {
    pub edge: SpawnEdge,
    pub size: f32,
    /// Speed across the arena, away from the spawn edge
    pub speed: f32,
    /// Position along the spawn edge (0..width or 0..height)
    pub along: f32,
    /// Sideways velocity component
    pub lateral: f32,
    pub life: f32,
}

impl SpawnRoll {
    /// Draw a roll for the current run time and level
    pub fn sample<R: Rng + ?Sized>(
        rng: &mut R,
        tuning: &Tuning,
        elapsed: f32,
        level: u32,
        width: f32,
        height: f32,
    ) -> Self {
        let edge = SpawnEdge::random(rng);
        let size = rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_size_cap(level));
        let (lo, hi) = tuning.obstacle_speed_jitter;
        let speed = obstacle_speed(tuning, elapsed, level) * rng.random_range(lo..=hi);
        let span = match edge {
            SpawnEdge::Left | SpawnEdge::Right => height,
            SpawnEdge::Top | SpawnEdge::Bottom => width,
        };
        let along = rng.random_range(0.0..=span.max(0.0));
        let max_lateral = speed.abs() * tuning.obstacle_lateral_factor;
        let lateral = rng.random_range(-max_lateral..=max_lateral);
        let (life_lo, life_hi) = tuning.obstacle_lifetime;
        let life = rng.random_range(life_lo..=life_hi);

        Self {
            edge,
            size,
            speed,
            along,
            lateral,
            life,
        }
    }

    /// Place the obstacle just outside its edge, heading into the arena
    pub fn into_obstacle(self, width: f32, height: f32) -> Obstacle {
        let Self {
            edge,
            size,
            speed,
            along,
            lateral,
            life,
        } = self;

        let (pos, vel) = match edge {
            SpawnEdge::Left => (Vec2::new(-size, along), Vec2::new(speed, lateral)),
            SpawnEdge::Right => (Vec2::new(width + size, along), Vec2::new(-speed, lateral)),
            SpawnEdge::Top => (Vec2::new(along, -size), Vec2::new(lateral, speed)),
            SpawnEdge::Bottom => (Vec2::new(along, height + size), Vec2::new(lateral, -speed)),
        };

        Obstacle {
            pos,
            size: Vec2::splat(size),
            vel,
            age: 0.0,
            life,
        }
    }
}

/// Random delay until the next spawn at the given difficulty
pub fn next_spawn_delay<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, difficulty: f32) -> f32 {
    let every = spawn_interval(tuning, difficulty);
    let (lo, hi) = tuning.spawn_jitter;
    rng.random_range(every * lo..=every * hi)
}

/// Count down the spawn timer and add an obstacle when it runs out.
/// Returns whether an obstacle was spawned.
pub fn update_spawner(state: &mut GameState, dt: f32, difficulty: f32) -> bool {
    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return false;
    }

    state.spawn_timer = next_spawn_delay(&mut state.rng, &state.tuning, difficulty);
    let roll = SpawnRoll::sample(
        &mut state.rng,
        &state.tuning,
        state.elapsed,
        state.level,
        state.width,
        state.height,
    );
    state.obstacles.push(roll.into_obstacle(state.width, state.height));
    log::trace!(
        "Spawned {:?} obstacle size {:.0} speed {:.0} ({} active)",
        roll.edge,
        roll.size,
        roll.speed,
        state.obstacles.len()
    );
    true
}

/// Move every obstacle and drop the expired ones
pub fn advance_obstacles(state: &mut GameState, dt: f32) {
    let (width, height) = (state.width, state.height);
    state.obstacles.retain_mut(|o| {
        o.advance(dt);
        !o.is_expired(width, height)
    });
}
