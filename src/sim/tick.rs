//! Fixed timestep simulation tick
//!
//! Core game loop that advances the mission by one frame.

use glam::Vec2;
use rand::Rng;

use super::collision::{hits_ground, interceptor_hits, reflect_at_bounds};
use super::spawner;
use super::state::{ExplosionColor, GameEvent, GamePhase, GameState, update_trail};
use crate::consts::*;
use crate::step_toward;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Canvas points clicked since the last tick
    pub fire: Vec<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot defends the base
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Don't tick if paused or the mission is over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    for &target in &input.fire {
        state.fire_interceptor(target);
    }
    if input.idle_mode {
        autopilot(state);
    }

    spawner::run(state, dt);
    update_threats(state);
    update_interceptors(state);
    state.explosions.retain_mut(|e| e.update());

    if check_ground_hits(state) {
        // Lost: stop this frame immediately
        return;
    }
    check_intercepts(state);
    check_victory(state, dt);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Trail, motion and wall bounce for every threat
fn update_threats(state: &mut GameState) {
    let width = state.arena.width;
    for threat in &mut state.threats {
        let roll = state.rng.random::<f32>();
        update_trail(
            &mut threat.trail,
            threat.pos,
            roll,
            THREAT_TRAIL_CHANCE,
            THREAT_TRAIL_ALPHA,
            THREAT_TRAIL_FADE,
        );
        threat.pos += threat.velocity();
        reflect_at_bounds(threat, width);
    }
}

/// Trail and flight for every interceptor; detonate those that arrived
fn update_interceptors(state: &mut GameState) {
    let mut detonated: Vec<(u32, Vec2)> = Vec::new();
    for m in &mut state.interceptors {
        let roll = state.rng.random::<f32>();
        update_trail(
            &mut m.trail,
            m.pos,
            roll,
            INTERCEPTOR_TRAIL_CHANCE,
            1.0,
            INTERCEPTOR_TRAIL_FADE,
        );
        match step_toward(m.pos, m.target, m.speed) {
            Some(next) => m.pos = next,
            None => detonated.push((m.id, m.target)),
        }
    }

    if detonated.is_empty() {
        return;
    }
    state
        .interceptors
        .retain(|m| !detonated.iter().any(|&(id, _)| id == m.id));
    for (_, pos) in detonated {
        state.spawn_explosion(pos, ExplosionColor::White);
        state.events.push(GameEvent::InterceptorDetonated { pos });
    }
}

/// Remove threats that reached the ground; returns true if the mission was lost
fn check_ground_hits(state: &mut GameState) -> bool {
    let ground = state.arena.height;
    let mut i = state.threats.len();
    while i > 0 {
        i -= 1;
        if !hits_ground(&state.threats[i], ground) {
            continue;
        }
        let threat = state.threats.remove(i);
        let pos = Vec2::new(threat.pos.x, ground);
        state.spawn_explosion(pos, ExplosionColor::Orange);
        state.hits += 1;
        state.events.push(GameEvent::GroundImpact {
            kind: threat.kind,
            pos,
        });
        if state.hits >= state.tuning.max_hits {
            end_mission(state, false);
            return true;
        }
    }
    false
}

/// Pairwise threat/interceptor test; each interceptor destroys at most one threat
fn check_intercepts(state: &mut GameState) {
    let overlap = state.tuning.hit_overlap;
    let mut i = state.threats.len();
    while i > 0 {
        i -= 1;
        let threat = &state.threats[i];
        let Some(j) = (0..state.interceptors.len())
            .rev()
            .find(|&j| interceptor_hits(threat, &state.interceptors[j], overlap))
        else {
            continue;
        };

        let threat = state.threats.remove(i);
        state.interceptors.remove(j);
        state.spawn_explosion(threat.pos, ExplosionColor::Threat(threat.kind));
        state.intercepted += 1;
        state.events.push(GameEvent::ThreatIntercepted {
            kind: threat.kind,
            pos: threat.pos,
        });
    }
}

/// Declare victory a short delay after the last threat is dealt with
fn check_victory(state: &mut GameState, dt: f32) {
    if state.victory_countdown.is_none()
        && state.remaining_spawns() == 0
        && state.threats.is_empty()
    {
        state.victory_countdown = Some(VICTORY_DELAY);
    }

    if let Some(left) = state.victory_countdown.as_mut() {
        *left -= dt;
        if *left <= 0.0 {
            end_mission(state, true);
        }
    }
}

fn end_mission(state: &mut GameState, victory: bool) {
    if state.is_over() {
        return;
    }
    state.phase = if victory { GamePhase::Won } else { GamePhase::Lost };
    state.events.push(GameEvent::MissionEnded { victory });
    log::info!(
        "Mission {} after {:.1}s: {} intercepted, {} hits",
        if victory { "accomplished" } else { "failed" },
        state.elapsed,
        state.intercepted,
        state.hits
    );
}

/// Fire at the threat closest to the ground that nothing is already aimed at
fn autopilot(state: &mut GameState) {
    if state.autopilot_cooldown > 0 {
        state.autopilot_cooldown -= 1;
        return;
    }

    let origin = state.arena.launch_origin(state.launcher_offset);
    let speed = state.tuning.interceptor_speed;

    let target = state
        .threats
        .iter()
        .filter(|t| t.pos.y > 0.0)
        .filter(|t| !state.interceptors.iter().any(|m| m.aimed_at == Some(t.id)))
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|t| {
            // Lead the target: two passes of time-to-reach refinement
            let mut aim = t.pos;
            for _ in 0..2 {
                let ticks = origin.distance(aim) / speed;
                aim = t.pos + t.velocity() * ticks;
            }
            // Aim a little past the meeting point so the interceptor flies through it
            (t.id, aim + (aim - origin).normalize_or_zero() * t.size)
        });

    if let Some((threat_id, aim)) = target {
        state.fire_interceptor(aim);
        if let Some(m) = state.interceptors.last_mut() {
            m.aimed_at = Some(threat_id);
        }
        state.autopilot_cooldown = AUTOPILOT_COOLDOWN_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Arena, Threat, ThreatKind};
    use crate::tuning::GameTuning;

    fn new_state() -> GameState {
        GameState::new(12345, GameTuning::default(), Arena::new(800.0, 600.0))
    }

    fn place_threat(state: &mut GameState, kind: ThreatKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.threats.push(Threat {
            id,
            kind,
            pos,
            speed: 1.0,
            size: 30.0,
            angle: 0.0,
            rotation: 0.0,
            trail: Vec::new(),
        });
        id
    }

    /// Mark every spawn timer exhausted
    fn exhaust_spawns(state: &mut GameState) {
        for spawner in &mut state.spawners {
            spawner.remaining = 0;
            spawner.finished = true;
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state();
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);

        // Paused ticks do nothing
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_threat_moves_down() {
        let mut state = new_state();
        place_threat(&mut state, ThreatKind::Drone, Vec2::new(400.0, 100.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.threats[0].pos, Vec2::new(400.0, 101.0));
    }

    #[test]
    fn test_interceptor_detonates_at_target() {
        let mut state = new_state();
        let input = TickInput {
            fire: vec![Vec2::new(400.0, 520.0)],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.interceptors.len(), 1);
        assert_eq!(state.interceptors[0].pos, Vec2::new(400.0, 560.0));

        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.interceptors.is_empty());
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].color, ExplosionColor::White);
        assert_eq!(state.explosions[0].pos, Vec2::new(400.0, 520.0));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::InterceptorDetonated {
                    pos: Vec2::new(400.0, 520.0)
                })
        );
    }

    #[test]
    fn test_ground_hit() {
        let mut state = new_state();
        place_threat(&mut state, ThreatKind::Cruise, Vec2::new(300.0, 590.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.threats.is_empty());
        assert_eq!(state.hits, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        let boom = &state.explosions[0];
        assert_eq!(boom.color, ExplosionColor::Orange);
        assert_eq!(boom.pos, Vec2::new(300.0, 600.0));
    }

    #[test]
    fn test_loss_stops_frame() {
        let mut state = new_state();
        state.hits = 9;
        place_threat(&mut state, ThreatKind::Drone, Vec2::new(100.0, 590.0));
        place_threat(&mut state, ThreatKind::Drone, Vec2::new(500.0, 590.0));
        // An interceptor sitting on a live threat would score if the frame continued
        place_threat(&mut state, ThreatKind::Drone, Vec2::new(400.0, 300.0));
        state.fire_interceptor(Vec2::new(400.0, 0.0));
        state.interceptors[0].pos = Vec2::new(400.0, 301.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.hits, 10);
        assert_eq!(state.intercepted, 0);
        // Ground checks stop at the hit that ends the mission
        assert_eq!(state.threats.len(), 2);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::MissionEnded { victory: false })
        );

        // Nothing advances after the mission ends
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_interception() {
        let mut state = new_state();
        place_threat(&mut state, ThreatKind::Ballistic, Vec2::new(400.0, 300.0));
        state.fire_interceptor(Vec2::new(400.0, 0.0));
        state.interceptors[0].pos = Vec2::new(400.0, 330.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.threats.is_empty());
        assert!(state.interceptors.is_empty());
        assert_eq!(state.intercepted, 1);
        assert_eq!(
            state.explosions[0].color,
            ExplosionColor::Threat(ThreatKind::Ballistic)
        );
    }

    #[test]
    fn test_one_interceptor_one_kill() {
        let mut state = new_state();
        let older = place_threat(&mut state, ThreatKind::Drone, Vec2::new(400.0, 300.0));
        let newer = place_threat(&mut state, ThreatKind::Drone, Vec2::new(405.0, 300.0));
        state.fire_interceptor(Vec2::new(400.0, 0.0));
        state.interceptors[0].pos = Vec2::new(402.0, 315.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.intercepted, 1);
        assert_eq!(state.threats.len(), 1);
        // Newest threat is checked first, so the older one survives
        assert_eq!(state.threats[0].id, older);
        assert_ne!(state.threats[0].id, newer);
    }

    #[test]
    fn test_victory_after_delay() {
        let mut state = new_state();
        exhaust_spawns(&mut state);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.victory_countdown.is_some());

        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Won);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::MissionEnded { victory: true })
        );
    }

    #[test]
    fn test_victory_delay_length() {
        let mut state = new_state();
        exhaust_spawns(&mut state);

        // The arming tick counts toward the delay
        for _ in 0..29 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        let left = state.victory_countdown.unwrap();
        assert!((left - (VICTORY_DELAY - 29.0 * SIM_DT)).abs() < 1e-4);

        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_no_victory_with_live_threats() {
        let mut state = new_state();
        exhaust_spawns(&mut state);
        place_threat(&mut state, ThreatKind::Drone, Vec2::new(400.0, 0.0));
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.victory_countdown.is_none());
    }

    #[test]
    fn test_autopilot_fires_with_cooldown() {
        let mut state = new_state();
        place_threat(&mut state, ThreatKind::Ballistic, Vec2::new(200.0, 100.0));
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.interceptors.len(), 1);
        assert_eq!(state.autopilot_cooldown, AUTOPILOT_COOLDOWN_TICKS);

        // Threat already covered and cooldown running
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.interceptors.len(), 1);
    }

    #[test]
    fn test_autopilot_targets_lowest_threat() {
        let mut state = new_state();
        let high = place_threat(&mut state, ThreatKind::Ballistic, Vec2::new(200.0, 100.0));
        let low = place_threat(&mut state, ThreatKind::Ballistic, Vec2::new(600.0, 400.0));
        let low_pos = state.threats[1].pos;
        let low_velocity = state.threats[1].velocity();

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.interceptors.len(), 1);
        let m = &state.interceptors[0];
        assert_eq!(m.aimed_at, Some(low));
        assert_ne!(m.aimed_at, Some(high));
        // Aim point leads the threat along its direction of travel
        assert!((m.target - low_pos).dot(low_velocity) > 0.0);
    }

    #[test]
    fn test_autopilot_skips_claimed_threat() {
        let mut state = new_state();
        let high = place_threat(&mut state, ThreatKind::Drone, Vec2::new(200.0, 100.0));
        let low = place_threat(&mut state, ThreatKind::Drone, Vec2::new(600.0, 400.0));
        state.fire_interceptor(Vec2::new(600.0, 420.0));
        state.interceptors[0].aimed_at = Some(low);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.interceptors.len(), 2);
        assert_eq!(state.interceptors[1].aimed_at, Some(high));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state();
        let mut state2 = new_state();

        let inputs = [
            TickInput {
                fire: vec![Vec2::new(200.0, 200.0)],
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.threats.len(), state2.threats.len());
        assert_eq!(state1.intercepted, state2.intercepted);
        for (a, b) in state1.threats.iter().zip(&state2.threats) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
