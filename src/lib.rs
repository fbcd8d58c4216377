//! Dome Defense - A single-screen missile defense arcade game
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, collisions, win/loss)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `renderer`: Canvas layout and 2D drawing
//! - `audio`: Procedural sound effects

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{GameTuning, ThreatClassTuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Interceptor sprite dimensions (also its collision width)
    pub const INTERCEPTOR_WIDTH: f32 = 24.0;
    pub const INTERCEPTOR_HEIGHT: f32 = 48.0;

    /// Explosion defaults
    pub const EXPLOSION_START_RADIUS: f32 = 5.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 40.0;
    pub const EXPLOSION_MAX_RADIUS_JITTER: f32 = 20.0;
    pub const EXPLOSION_GROW_SPEED: f32 = 3.0;
    pub const EXPLOSION_SHRINK_SPEED: f32 = 1.5;
    pub const EXPLOSION_FADE: f32 = 0.05;

    /// Trail spawn chance and per-tick fade
    pub const THREAT_TRAIL_CHANCE: f32 = 0.4;
    pub const THREAT_TRAIL_ALPHA: f32 = 0.8;
    pub const THREAT_TRAIL_FADE: f32 = 0.08;
    pub const INTERCEPTOR_TRAIL_CHANCE: f32 = 0.6;
    pub const INTERCEPTOR_TRAIL_FADE: f32 = 0.15;

    /// Ballistic threats drop faster than their nominal speed
    pub const BALLISTIC_DROP_FACTOR: f32 = 1.2;
    /// Horizontal drift factor for drones and cruise missiles
    pub const DRIFT_FACTOR: f32 = 0.5;

    /// Delay between the field clearing and victory (seconds)
    pub const VICTORY_DELAY: f32 = 0.5;

    /// Autopilot fires at most once per this many ticks
    pub const AUTOPILOT_COOLDOWN_TICKS: u32 = 12;
}

/// Point `step` units from `from` toward `to`, or `None` when `to` is within reach
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, step: f32) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist > step {
        Some(from + delta / dist * step)
    } else {
        None
    }
}
