//! Game state and core simulation types
//!
//! Everything the per-tick update mutates lives in `GameState`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawner::SpawnTimer;
use crate::consts::*;
use crate::tuning::GameTuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every threat dealt with before the hit budget ran out
    Won,
    /// Too many threats reached the ground
    Lost,
}

/// Threat classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatKind {
    Drone,
    Cruise,
    Ballistic,
}

impl ThreatKind {
    /// All classes in spawn-timer order
    pub const ALL: [ThreatKind; 3] = [ThreatKind::Drone, ThreatKind::Cruise, ThreatKind::Ballistic];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::Drone => "drone",
            ThreatKind::Cruise => "cruise",
            ThreatKind::Ballistic => "ballistic",
        }
    }

    /// Index into per-class arrays
    pub fn index(&self) -> usize {
        match self {
            ThreatKind::Drone => 0,
            ThreatKind::Cruise => 1,
            ThreatKind::Ballistic => 2,
        }
    }
}

impl std::fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fading trail dot left behind a moving entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// Record a trail dot with the given chance, then fade and prune the trail
pub(crate) fn update_trail(
    trail: &mut Vec<TrailPoint>,
    pos: Vec2,
    roll: f32,
    chance: f32,
    alpha: f32,
    fade: f32,
) {
    if roll < chance {
        trail.push(TrailPoint { pos, alpha });
    }
    trail.retain_mut(|pt| {
        pt.alpha -= fade;
        pt.alpha > 0.0
    });
}

/// A descending threat
#[derive(Debug, Clone)]
pub struct Threat {
    pub id: u32,
    pub kind: ThreatKind,
    /// Sprite center
    pub pos: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Sprite size, also the collision diameter
    pub size: f32,
    /// Drift angle (radians from straight down), negated on bounce
    pub angle: f32,
    /// Sprite rotation
    pub rotation: f32,
    pub trail: Vec<TrailPoint>,
}

impl Threat {
    /// Displacement applied per tick
    pub fn velocity(&self) -> Vec2 {
        match self.kind {
            ThreatKind::Ballistic => Vec2::new(0.0, self.speed * BALLISTIC_DROP_FACTOR),
            ThreatKind::Drone | ThreatKind::Cruise => Vec2::new(
                self.angle.sin() * self.speed * DRIFT_FACTOR,
                self.speed,
            ),
        }
    }
}

/// A player-fired interceptor flying to a fixed point
#[derive(Debug, Clone)]
pub struct Interceptor {
    pub id: u32,
    pub pos: Vec2,
    /// Detonation point (where the player clicked)
    pub target: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Sprite rotation (sprite points up, so heading + π/2)
    pub angle: f32,
    pub width: f32,
    pub height: f32,
    pub trail: Vec<TrailPoint>,
    /// Threat the autopilot fired this interceptor at
    pub aimed_at: Option<u32>,
}

impl Interceptor {
    pub fn new(id: u32, origin: Vec2, target: Vec2, speed: f32) -> Self {
        let delta = target - origin;
        Self {
            id,
            pos: origin,
            target,
            speed,
            angle: delta.y.atan2(delta.x) + std::f32::consts::FRAC_PI_2,
            width: INTERCEPTOR_WIDTH,
            height: INTERCEPTOR_HEIGHT,
            trail: Vec::new(),
            aimed_at: None,
        }
    }
}

/// Explosion tint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionColor {
    /// Interceptor detonating at its target point
    White,
    /// Threat reaching the ground
    Orange,
    /// Threat destroyed in the air
    Threat(ThreatKind),
}

/// Expanding then fading blast
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub grow_speed: f32,
    pub shrink_speed: f32,
    pub color: ExplosionColor,
    pub alpha: f32,
}

impl Explosion {
    /// Advance one tick; returns false once the explosion is gone
    pub fn update(&mut self) -> bool {
        if self.radius < self.max_radius {
            self.radius += self.grow_speed;
        } else {
            self.radius -= self.shrink_speed;
            self.alpha -= EXPLOSION_FADE;
        }
        self.alpha > 0.0 && self.radius > 0.0
    }
}

/// Playfield size in canvas pixels; the ground is the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Interceptor launch point, centered above the ground
    pub fn launch_origin(&self, offset: f32) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - offset)
    }
}

/// Things that happened during a tick, for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ThreatSpawned { kind: ThreatKind },
    InterceptorLaunched { target: Vec2 },
    InterceptorDetonated { pos: Vec2 },
    ThreatIntercepted { kind: ThreatKind, pos: Vec2 },
    GroundImpact { kind: ThreatKind, pos: Vec2 },
    MissionEnded { victory: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    /// Balance table this run was started with
    pub tuning: GameTuning,
    pub arena: Arena,
    /// Launch point height above the ground
    pub launcher_offset: f32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulated seconds since the mission started
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Threats that reached the ground
    pub hits: u32,
    /// Threats destroyed by interceptors
    pub intercepted: u32,
    /// Active threats (sorted by id)
    pub threats: Vec<Threat>,
    /// Active interceptors (sorted by id)
    pub interceptors: Vec<Interceptor>,
    /// Active explosions (insertion order)
    pub explosions: Vec<Explosion>,
    /// One spawn timer per threat class, indexed by `ThreatKind::index`
    pub spawners: [SpawnTimer; 3],
    /// Seconds left before victory is declared, once the field is clear
    pub victory_countdown: Option<f32>,
    /// Ticks until the autopilot may fire again
    pub autopilot_cooldown: u32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a fresh mission
    pub fn new(seed: u64, tuning: GameTuning, arena: Arena) -> Self {
        let spawners = ThreatKind::ALL.map(|kind| SpawnTimer::new(kind, tuning.class(kind)));
        Self {
            seed,
            launcher_offset: tuning.launcher_offset,
            tuning,
            arena,
            phase: GamePhase::Playing,
            elapsed: 0.0,
            time_ticks: 0,
            hits: 0,
            intercepted: 0,
            threats: Vec::new(),
            interceptors: Vec::new(),
            explosions: Vec::new(),
            spawners,
            victory_countdown: None,
            autopilot_cooldown: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Threats of one class still waiting to spawn
    pub fn remaining(&self, kind: ThreatKind) -> u32 {
        self.spawners[kind.index()].remaining
    }

    /// Threats of every class still waiting to spawn
    pub fn remaining_spawns(&self) -> u32 {
        self.spawners
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.remaining))
    }

    /// Threats in the whole mission
    pub fn total_threats(&self) -> u32 {
        self.tuning.total_threats()
    }

    /// True once the mission is won or lost
    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Won | GamePhase::Lost)
    }

    /// Follow a canvas resize; live entities keep their pixel positions
    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    /// Uniform sample in [0, 1)
    pub(crate) fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Launch an interceptor from the base toward `target`
    pub fn fire_interceptor(&mut self, target: Vec2) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let id = self.next_entity_id();
        let origin = self.arena.launch_origin(self.launcher_offset);
        self.interceptors
            .push(Interceptor::new(id, origin, target, self.tuning.interceptor_speed));
        self.events.push(GameEvent::InterceptorLaunched { target });
    }

    /// Spawn an explosion with randomized size and growth
    pub fn spawn_explosion(&mut self, pos: Vec2, color: ExplosionColor) {
        let max_radius = EXPLOSION_MAX_RADIUS + self.roll() * EXPLOSION_MAX_RADIUS_JITTER;
        let grow_speed = EXPLOSION_GROW_SPEED + self.roll();
        self.explosions.push(Explosion {
            pos,
            radius: EXPLOSION_START_RADIUS,
            max_radius,
            grow_speed,
            shrink_speed: EXPLOSION_SHRINK_SPEED,
            color,
            alpha: 1.0,
        });
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.threats.sort_by_key(|t| t.id);
        self.interceptors.sort_by_key(|m| m.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, GameTuning::default(), Arena::new(800.0, 600.0))
    }

    #[test]
    fn test_new_state_counts() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.remaining(ThreatKind::Drone), 170);
        assert_eq!(state.remaining(ThreatKind::Cruise), 30);
        assert_eq!(state.remaining(ThreatKind::Ballistic), 120);
        assert_eq!(state.remaining_spawns(), 320);
        assert!(state.threats.is_empty());
        assert_eq!(state.hits, 0);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let mut tuning = GameTuning::default();
        tuning.drone.count = u32::MAX;
        let state = GameState::new(1, tuning, Arena::new(800.0, 600.0));
        assert_eq!(state.remaining_spawns(), u32::MAX);
        assert_eq!(state.total_threats(), u32::MAX);
    }

    #[test]
    fn test_interceptor_heading_points_up() {
        let m = Interceptor::new(1, Vec2::new(400.0, 570.0), Vec2::new(400.0, 100.0), 10.0);
        // Straight up: atan2(-470, 0) = -π/2, plus π/2 for the sprite
        assert!(m.angle.abs() < 1e-5);
        assert_eq!(m.width, INTERCEPTOR_WIDTH);
    }

    #[test]
    fn test_fire_interceptor_from_base() {
        let mut state = state();
        state.fire_interceptor(Vec2::new(100.0, 100.0));
        assert_eq!(state.interceptors.len(), 1);
        assert_eq!(state.interceptors[0].pos, Vec2::new(400.0, 570.0));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::InterceptorLaunched {
                target: Vec2::new(100.0, 100.0)
            }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_cannot_fire_after_game_over() {
        let mut state = state();
        state.phase = GamePhase::Lost;
        state.fire_interceptor(Vec2::new(100.0, 100.0));
        assert!(state.interceptors.is_empty());
    }

    #[test]
    fn test_explosion_lifecycle() {
        let mut state = state();
        state.spawn_explosion(Vec2::new(10.0, 10.0), ExplosionColor::White);
        let mut e = state.explosions.pop().unwrap();
        assert!(e.max_radius >= 40.0 && e.max_radius < 60.0);
        assert!(e.grow_speed >= 3.0 && e.grow_speed < 4.0);

        let mut ticks = 0;
        let mut peak = 0.0f32;
        while e.update() {
            peak = peak.max(e.radius);
            ticks += 1;
            assert!(ticks < 1000, "explosion never ended");
        }
        assert!(peak >= e.max_radius);
        // Fades 0.05 per tick once shrinking
        assert!(ticks <= 60);
    }

    #[test]
    fn test_trail_fades_out() {
        let mut trail = Vec::new();
        update_trail(&mut trail, Vec2::ZERO, 0.0, 0.4, 0.8, 0.08);
        assert_eq!(trail.len(), 1);
        assert!((trail[0].alpha - 0.72).abs() < 1e-6);
        for _ in 0..10 {
            update_trail(&mut trail, Vec2::ZERO, 1.0, 0.4, 0.8, 0.08);
        }
        assert!(trail.is_empty());
    }

    #[test]
    fn test_ballistic_falls_straight() {
        let t = Threat {
            id: 1,
            kind: ThreatKind::Ballistic,
            pos: Vec2::ZERO,
            speed: 3.0,
            size: 50.0,
            angle: 0.3,
            rotation: 0.0,
            trail: Vec::new(),
        };
        let v = t.velocity();
        assert_eq!(v.x, 0.0);
        assert!((v.y - 3.6).abs() < 1e-6);
    }
}
