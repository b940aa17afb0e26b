//! Per-frame simulation step
//!
//! Advances a run by one variable-length frame: movement, spawning,
//! obstacle lifetimes, collision, then scoring.

use glam::Vec2;

use super::collision::first_hit;
use super::difficulty::{difficulty_for_elapsed, level_for_elapsed, player_speed, score_gain};
use super::input::{HeldKeys, aggregate};
use super::spawn::{advance_obstacles, update_spawner};
use super::state::{GameEvent, GameState};
use crate::clamp_frame_dt;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Unit movement direction, or zero
    pub direction: Vec2,
    /// Dash requested this frame (edge)
    pub dash: bool,
    /// Pause toggled this frame (edge)
    pub pause: bool,
}

impl TickInput {
    /// Build from held keys and a joystick vector
    pub fn from_devices(keys: &HeldKeys, joystick: Vec2) -> Self {
        Self {
            direction: aggregate(keys, joystick),
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    // Paused, idle and ended runs don't advance
    if !state.is_running() {
        return;
    }

    if input.dash {
        state.try_dash();
    }

    let dt = clamp_frame_dt(dt);

    // Difficulty from run time
    state.elapsed += dt;
    let level = level_for_elapsed(state.elapsed);
    if level > state.level {
        state.push_event(GameEvent::LevelUp(level));
        log::info!("Level {} at {:.1}s", level, state.elapsed);
    }
    state.level = level;
    let difficulty = difficulty_for_elapsed(state.elapsed);

    move_player(state, input.direction, dt);

    update_spawner(state, dt, difficulty);
    advance_obstacles(state, dt);

    if first_hit(state.player.pos, state.player.radius, &state.obstacles).is_some() {
        state.end_run();
        return;
    }

    state.score += score_gain(dt, difficulty);
    state.player.dash.recharge(dt);
}

/// Apply speed (with dash burst), integrate and clamp to the arena
fn move_player(state: &mut GameState, direction: Vec2, dt: f32) {
    let (min, max) = state.player.bounds(state.width, state.height);
    let player = &mut state.player;

    let mut speed = player_speed(&state.tuning, player.speed, state.level);
    speed += player.dash.consume_burst(dt);

    player.vel = direction * speed;
    player.pos = (player.pos + player.vel * dt).clamp(min, max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;
    use crate::sim::state::{Obstacle, RunPhase};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 800.0, 600.0);
        state.start();
        state
    }

    fn right() -> TickInput {
        TickInput {
            direction: Vec2::X,
            ..Default::default()
        }
    }

    /// Large arena where obstacles die long before they can reach the centre
    fn safe_arena(seed: u64) -> GameState {
        let tuning = Tuning {
            obstacle_lifetime: (0.5, 1.0),
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(seed, 4000.0, 4000.0, tuning);
        state.start();
        state.player.pos = Vec2::new(2000.0, 2000.0);
        state
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut state = GameState::new(1, 800.0, 600.0);
        tick(&mut state, &right(), 0.016);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_pause_toggle_via_input() {
        let mut state = running(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 0.016);
        assert_eq!(state.phase, RunPhase::Paused);

        let before = state.clone();
        tick(&mut state, &right(), 0.016);
        assert_eq!(state.elapsed, before.elapsed);
        assert_eq!(state.player.pos, before.player.pos);

        tick(&mut state, &pause, 0.016);
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.elapsed > before.elapsed);
    }

    #[test]
    fn test_first_frame_spawns() {
        let mut state = running(1);
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_out_of_range_tuning_still_plays() {
        for json in [
            r#"{ "base_spawn_interval": 1e39 }"#,
            r#"{ "obstacle_speed_jitter": [0.9, 1e39] }"#,
            r#"{ "obstacle_base_speed": 3e38, "obstacle_lateral_factor": 3e38 }"#,
        ] {
            let tuning = Tuning::from_json(json).unwrap();
            let mut state = GameState::with_tuning(5, 800.0, 600.0, tuning);
            state.start();
            for _ in 0..120 {
                tick(&mut state, &TickInput::default(), 0.016);
            }
            assert!(state.player.pos.is_finite());
            assert!(state.score.is_finite());
            assert!(state.obstacles.iter().all(|o| o.pos.is_finite() && o.vel.is_finite()));
        }
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut state = running(1);
        let start = state.player.pos;
        tick(&mut state, &right(), 5.0);
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
        assert!((state.player.pos.x - (start.x + 230.0 * MAX_FRAME_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_player_clamped_to_walls() {
        let mut state = running(1);
        state.player.pos = Vec2::new(790.0, 300.0);
        tick(&mut state, &right(), 0.033);
        assert_eq!(state.player.pos.x, 800.0 - 12.0 - 2.0);
    }

    #[test]
    fn test_dash_requires_charge() {
        let mut state = running(1);
        state.player.dash.charge = state.player.dash.cooldown * 0.5;
        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        tick(&mut state, &dash, 0.016);
        assert!(!state.player.dash.is_bursting());
        assert!(!state.drain_events().any(|e| e == GameEvent::DashStarted));
    }

    #[test]
    fn test_dash_burst_lasts_configured_duration() {
        let mut state = safe_arena(3);
        // Exactly representable so the frame count is exact
        state.player.dash.duration = 0.125;
        let dt = 0.03125;
        let dash = TickInput {
            direction: Vec2::X,
            dash: true,
            ..Default::default()
        };

        tick(&mut state, &dash, dt);
        assert_eq!(state.player.dash.charge, dt * crate::consts::DASH_RECHARGE_RATE);
        assert!(state.drain_events().any(|e| e == GameEvent::DashStarted));

        let fast = 230.0 + 370.0;
        assert_eq!(state.player.vel.x, fast);
        for _ in 0..3 {
            tick(&mut state, &right(), dt);
            assert_eq!(state.player.vel.x, fast);
        }
        // Burst used up after 4 frames of 1/32 s
        assert!(!state.player.dash.is_bursting());
        tick(&mut state, &right(), dt);
        assert_eq!(state.player.vel.x, 230.0);
    }

    #[test]
    fn test_collision_ends_run_without_scoring() {
        let mut state = running(1);
        state.spawn_timer = 10.0;
        state.obstacles.push(Obstacle {
            pos: state.player.pos - Vec2::splat(5.0),
            size: Vec2::splat(10.0),
            vel: Vec2::ZERO,
            age: 0.0,
            life: 5.0,
        });
        state.player.dash.charge = 0.0;

        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, RunPhase::Ended);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.player.dash.charge, 0.0);
        assert!(state.drain_events().any(|e| e == GameEvent::RunEnded));

        // Nothing moves after the run ends
        let elapsed = state.elapsed;
        tick(&mut state, &right(), 0.016);
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_score_strictly_increases_while_alive() {
        let mut state = safe_arena(9);
        let mut last = state.score;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), 0.016);
            assert!(state.score > last);
            last = state.score;
        }
        // Zero dt leaves the score unchanged
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, last);
    }

    #[test]
    fn test_sixteen_second_run_reaches_level_two() {
        let mut state = safe_arena(42);
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), 0.016);
            assert!(state.obstacles.iter().all(|o| o.life > 0.0));
        }
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.level, 2);
        assert!(state.score > 0.0);
        let events: Vec<_> = state.drain_events().collect();
        assert!(events.contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = running(1);
        state.spawn_timer = 10.0;
        state.obstacles.push(Obstacle {
            pos: state.player.pos,
            size: Vec2::splat(10.0),
            vel: Vec2::ZERO,
            age: 0.0,
            life: 5.0,
        });
        state.player.dash.charge = 0.3;
        state.score = 120.0;
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, RunPhase::Ended);

        state.restart(77);
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.seed, 77);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.dash.charge, state.player.dash.cooldown);
        assert_eq!(state.player.pos, Vec2::new(140.0, 300.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running(99999);
        let mut state2 = running(99999);

        let inputs = [
            right(),
            TickInput {
                direction: Vec2::new(0.0, -1.0),
                ..Default::default()
            },
            TickInput {
                dash: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, 0.016);
                tick(&mut state2, input, 0.016);
            }
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.score, state2.score);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            x in 14.0f32..786.0,
            y in 14.0f32..586.0,
            dx in -1.0f32..1.0,
            dy in -1.0f32..1.0,
            dt in 0.0f32..0.033,
            bursting in any::<bool>(),
        ) {
            let mut state = running(5);
            state.spawn_timer = 10.0;
            state.player.pos = Vec2::new(x, y);
            if bursting {
                state.player.dash.remaining = state.player.dash.duration;
            }
            let input = TickInput {
                direction: crate::sim::input::normalize_direction(Vec2::new(dx, dy)),
                ..Default::default()
            };

            for _ in 0..10 {
                tick(&mut state, &input, dt);
                let p = state.player.pos;
                prop_assert!(p.x >= 14.0 && p.x <= 786.0);
                prop_assert!(p.y >= 14.0 && p.y <= 586.0);
            }
        }
    }
}
