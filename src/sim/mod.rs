//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of the browser:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod report;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{hits_ground, interceptor_hits, reflect_at_bounds};
pub use report::{Hud, MissionReport, Performance, progress_percent};
pub use spawner::{SpawnTimer, spawn_threat};
pub use state::{
    Arena, Explosion, ExplosionColor, GameEvent, GamePhase, GameState, Interceptor, Threat,
    ThreatKind, TrailPoint,
};
pub use tick::{TickInput, tick};
