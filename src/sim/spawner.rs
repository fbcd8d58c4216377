//! Threat spawning - one repeating timer per threat class.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, Threat, ThreatKind};
use crate::tuning::ThreatClassTuning;

/// Repeating spawn timer for a single threat class
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    pub kind: ThreatKind,
    /// Seconds between fires
    pub interval: f32,
    /// Seconds accumulated toward the next fire
    pub elapsed: f32,
    /// Threats of this class still to spawn
    pub remaining: u32,
    /// Set once the class is exhausted; the timer never fires again
    pub finished: bool,
}

impl SpawnTimer {
    pub fn new(kind: ThreatKind, tuning: &ThreatClassTuning) -> Self {
        Self {
            kind,
            interval: tuning.interval_ms / 1000.0,
            elapsed: 0.0,
            remaining: tuning.count,
            finished: tuning.count == 0,
        }
    }

    /// Advance the timer and return how many times it fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.finished {
            return 0;
        }
        self.elapsed += dt;
        let mut fires = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fires += 1;
        }
        fires
    }

    /// Claim one spawn; returns false (and finishes the timer) when exhausted
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            self.finished = true;
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Advance every spawn timer and spawn the threats that came due
pub fn run(state: &mut GameState, dt: f32) {
    for i in 0..state.spawners.len() {
        let fires = state.spawners[i].advance(dt);
        for _ in 0..fires {
            if state.phase != GamePhase::Playing || !state.spawners[i].take() {
                break;
            }
            let kind = state.spawners[i].kind;
            spawn_threat(state, kind);
        }
    }
}

/// Spawn one threat just above the top edge at a random column
pub fn spawn_threat(state: &mut GameState, kind: ThreatKind) {
    let class = *state.tuning.class(kind);
    let size = class.size;
    let x = state.roll() * (state.arena.width - size * 2.0) + size;
    let speed = class.base_speed + state.roll() * class.speed_jitter;
    let angle = state.roll() * std::f32::consts::PI * 0.2 - std::f32::consts::PI * 0.1;

    let id = state.next_entity_id();
    state.threats.push(Threat {
        id,
        kind,
        pos: Vec2::new(x, -size),
        speed,
        size,
        angle,
        rotation: 0.0,
        trail: Vec::new(),
    });
    state.events.push(GameEvent::ThreatSpawned { kind });
}
