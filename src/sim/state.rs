//! Session and world state
//!
//! A [`Session`] owns the phase machine (Menu / Playing / Paused) and, while a
//! run is live, the [`World`] that the tick function mutates.

use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::platforms::PlatformPool;
use super::player::Player;
use super::tick::{FrameSnapshot, TickInput, step};
use crate::tuning::{Tuning, TuningError};

/// Top-level phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No live world; waiting for the player to start
    Menu,
    /// Ticking once per frame
    Playing,
    /// World kept but not ticked
    Paused,
}

/// How jumps are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpMode {
    /// Every landing immediately launches the next jump
    #[default]
    AutoBounce,
    /// Jump on the press edge of the jump action while grounded
    OnInput,
}

/// Everything a live run mutates
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    pub player: Player,
    pub platforms: PlatformPool,
    pub camera: CameraRig,
    /// Grounded flag after the previous tick (landing-edge detection)
    pub was_grounded: bool,
    /// Jump action held during the previous tick (press-edge detection)
    pub jump_held: bool,
    /// HUD height of the latest tick
    pub height: u32,
    pub time_ticks: u64,
    pub fall_resets: u32,
}

impl World {
    /// Build a run on a freshly generated tower.
    ///
    /// `tuning` must already be validated, as [`Session::new`] does.
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        let mut world = Self {
            tuning: tuning.clone(),
            player: Player::new(tuning.player_size, tuning.move_speed, tuning.jump_power),
            platforms: PlatformPool::new(tuning, seed),
            camera: CameraRig::new(tuning),
            was_grounded: false,
            jump_held: false,
            height: 0,
            time_ticks: 0,
            fall_resets: 0,
        };
        world.place_player_on_spawn();
        world
    }

    /// Start a fresh layout from a new seed, keeping the same player
    pub fn reseed(&mut self, seed: u64) {
        self.platforms = PlatformPool::new(&self.tuning, seed);
        self.player.squash = 0.0;
        self.place_player_on_spawn();
        self.time_ticks = 0;
        self.fall_resets = 0;
    }

    /// Rebuild the tower and put the player back on its spawn platform
    pub fn reset_run(&mut self) {
        self.platforms.regenerate();
        self.place_player_on_spawn();
        self.fall_resets += 1;
    }

    /// Player Y below which the run resets
    pub fn fall_threshold(&self) -> f64 {
        let floor = self
            .platforms
            .lowest()
            .map_or(0.0, |p| p.body.center.y);
        floor - self.tuning.fall_depth
    }

    fn place_player_on_spawn(&mut self) {
        let spawn = self
            .platforms
            .spawn()
            .or_else(|| self.platforms.lowest())
            .map(|p| p.body);
        if let Some(spawn) = spawn {
            self.player.place_on(&spawn);
        }
        self.was_grounded = false;
        self.height = 0;
    }
}

/// Clamp a raw frame delta into the integrator's safe range
pub fn clamp_dt(raw: f64, min_dt: f64, max_dt: f64) -> f64 {
    if raw.is_nan() {
        min_dt
    } else {
        raw.clamp(min_dt, max_dt)
    }
}

/// Phase machine plus the live world
#[derive(Debug)]
pub struct Session {
    tuning: Tuning,
    phase: SessionPhase,
    world: Option<World>,
    /// Timestamp (ms) of the last processed frame
    last_frame_ms: f64,
    last_dt: f64,
}

impl Session {
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            phase: SessionPhase::Menu,
            world: None,
            last_frame_ms: 0.0,
            last_dt: 0.0,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    /// Integration step used by the latest tick (s)
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// Menu → Playing with a freshly generated world
    pub fn start(&mut self, seed: u64, now_ms: f64) {
        if self.phase != SessionPhase::Menu {
            log::warn!("start() ignored in {:?}; use restart()", self.phase);
            return;
        }
        self.world = Some(World::new(&self.tuning, seed));
        self.phase = SessionPhase::Playing;
        self.last_frame_ms = now_ms;
        log::info!("Run started with seed {seed}");
    }

    /// Reinitialize the run in place and keep (or resume) playing
    pub fn restart(&mut self, seed: u64, now_ms: f64) {
        match self.world.as_mut() {
            Some(world) => world.reseed(seed),
            None => self.world = Some(World::new(&self.tuning, seed)),
        }
        self.phase = SessionPhase::Playing;
        self.last_frame_ms = now_ms;
        log::info!("Run restarted with seed {seed}");
    }

    /// Playing → Paused. Returns true if the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::Paused;
        log::info!("Paused");
        true
    }

    /// Paused → Playing, restarting the frame clock at `now_ms`
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Playing;
        self.last_frame_ms = now_ms;
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            SessionPhase::Playing => {
                self.pause();
            }
            SessionPhase::Paused => {
                self.resume(now_ms);
            }
            SessionPhase::Menu => {}
        }
    }

    /// Tear down the live world and return to the menu
    pub fn quit_to_menu(&mut self) {
        if let Some(world) = self.world.take() {
            log::info!(
                "Back to menu after {} ticks at height {}",
                world.time_ticks,
                world.height
            );
        }
        self.phase = SessionPhase::Menu;
    }

    /// Process one rendered frame.
    ///
    /// Handles the one-shot pause toggle, derives a clamped dt from the frame
    /// timestamp and runs a tick when Playing. Returns `None` when no tick ran.
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> Option<FrameSnapshot> {
        if input.pause {
            self.toggle_pause(now_ms);
        }
        if self.phase != SessionPhase::Playing {
            return None;
        }
        let world = self.world.as_mut()?;

        let raw = (now_ms - self.last_frame_ms) / 1000.0;
        let dt = clamp_dt(raw, self.tuning.min_dt, self.tuning.max_dt);
        self.last_frame_ms = now_ms;
        self.last_dt = dt;

        Some(step(world, input, dt))
    }
}
