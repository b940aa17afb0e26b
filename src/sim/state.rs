//! Game state and core simulation types
//!
//! Everything a run needs to advance lives in [`GameState`]; the tick
//! functions take it by `&mut` and nothing else holds gameplay state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Not started yet (or reset)
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended by a collision
    Ended,
}

/// Things that happened during a tick, for collaborators to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    DashStarted,
    LevelUp(u32),
    /// The player hit an obstacle; the run is over
    RunEnded,
}

/// Dash ability: a short speed burst gated by a recharging charge
#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    /// Charge needed before a dash can fire
    pub cooldown: f32,
    /// Current charge, counts up to `cooldown`
    pub charge: f32,
    /// Length of a burst (s)
    pub duration: f32,
    /// Extra speed while bursting (px/s)
    pub bonus_speed: f32,
    /// Time left in the active burst (s)
    pub remaining: f32,
}

impl Dash {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            cooldown: tuning.dash_cooldown,
            charge: tuning.dash_cooldown,
            duration: tuning.dash_duration,
            bonus_speed: tuning.dash_bonus_speed,
            remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.charge >= self.cooldown * DASH_READY_FRACTION
    }

    pub fn is_bursting(&self) -> bool {
        self.remaining > 0.0
    }

    /// Charge as a fraction of the cooldown (0 = empty, 1 = full)
    pub fn readiness(&self) -> f32 {
        if self.cooldown > 0.0 {
            (self.charge / self.cooldown).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Start a burst if charged. Returns whether the dash fired.
    pub fn activate(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = self.duration;
        self.charge = 0.0;
        true
    }

    /// Speed bonus for this frame, consuming burst time
    pub fn consume_burst(&mut self, dt: f32) -> f32 {
        if self.is_bursting() {
            self.remaining -= dt;
            self.bonus_speed
        } else {
            0.0
        }
    }

    pub fn recharge(&mut self, dt: f32) {
        self.charge = (self.charge + dt * DASH_RECHARGE_RATE).min(self.cooldown);
    }
}

/// The player-controlled circle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Movement speed at level 1
    pub speed: f32,
    pub dash: Dash,
}

impl Player {
    pub fn new(tuning: &Tuning, width: f32, height: f32) -> Self {
        Self {
            pos: Self::spawn_point(width, height),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            dash: Dash::new(tuning),
        }
    }

    /// Where a fresh run places the player: near the left edge, vertically centred
    pub fn spawn_point(width: f32, height: f32) -> Vec2 {
        Vec2::new(140.0_f32.min(width * 0.2), height / 2.0)
    }

    /// Lowest and highest centre positions allowed inside the arena
    pub fn bounds(&self, width: f32, height: f32) -> (Vec2, Vec2) {
        let inset = self.radius + WALL_INSET;
        let min = Vec2::splat(inset);
        // A canvas smaller than the player collapses the range onto the min inset
        let max = Vec2::new(width - inset, height - inset).max(min);
        (min, max)
    }
}

/// A moving square hazard
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Seconds since spawn (drives the shimmer)
    pub age: f32,
    /// Seconds left before removal
    pub life: f32,
}

impl Obstacle {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.age += dt;
        self.life -= dt;
    }

    /// True once the obstacle should leave the pool
    pub fn is_expired(&self, width: f32, height: f32) -> bool {
        self.life <= 0.0
            || self.pos.x < -OFFSCREEN_MARGIN
            || self.pos.x > width + OFFSCREEN_MARGIN
            || self.pos.y < -OFFSCREEN_MARGIN
            || self.pos.y > height + OFFSCREEN_MARGIN
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    /// Random source for spawns, reseeded from `seed` on reset
    pub rng: Pcg32,
    /// Balance parameters this run was built with
    pub tuning: Tuning,
    pub phase: RunPhase,
    /// Arena (canvas) size in px
    pub width: f32,
    pub height: f32,
    pub player: Player,
    /// Active obstacles, unordered
    pub obstacles: Vec<Obstacle>,
    pub score: f64,
    pub level: u32,
    /// Simulated seconds since the run started
    pub elapsed: f32,
    /// Countdown to the next spawn
    pub spawn_timer: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game with default tuning
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default())
    }

    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let width = width.max(1.0);
        let height = height.max(1.0);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning, width, height),
            tuning,
            phase: RunPhase::Idle,
            width,
            height,
            obstacles: Vec::new(),
            score: 0.0,
            level: 1,
            elapsed: 0.0,
            spawn_timer: 0.0,
            events: Vec::new(),
        }
    }

    /// Return to Idle with a fresh player and an empty arena
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.player = Player::new(&self.tuning, self.width, self.height);
        self.phase = RunPhase::Idle;
        self.obstacles.clear();
        self.score = 0.0;
        self.level = 1;
        self.elapsed = 0.0;
        self.spawn_timer = 0.0;
        self.events.clear();
    }

    /// Begin the run. Only valid from Idle.
    pub fn start(&mut self) {
        if self.phase != RunPhase::Idle {
            return;
        }
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Reset with a new seed and start immediately
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
        self.start();
    }

    pub fn pause(&mut self) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == RunPhase::Paused {
            self.phase = RunPhase::Running;
            self.events.push(GameEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            RunPhase::Running => self.pause(),
            RunPhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Fire the dash if the run is active and the charge allows it
    pub fn try_dash(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        let fired = self.player.dash.activate();
        if fired {
            self.events.push(GameEvent::DashStarted);
        }
        fired
    }

    /// Terminate the run after a collision
    pub fn end_run(&mut self) {
        if self.phase != RunPhase::Running {
            return;
        }
        self.phase = RunPhase::Ended;
        self.events.push(GameEvent::RunEnded);
        log::info!(
            "Run ended: score {} level {} after {:.1}s",
            self.display_score(),
            self.level,
            self.elapsed
        );
    }

    /// Follow a canvas resize, keeping the player inside the new bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let (min, max) = self.player.bounds(self.width, self.height);
        self.player.pos = self.player.pos.clamp(min, max);
        if self.phase == RunPhase::Idle {
            self.player.pos = Player::spawn_point(self.width, self.height);
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Score as shown to the player and persisted
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}
