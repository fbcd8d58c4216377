//! HUD counters and the end-of-mission summary

use std::fmt;

use super::state::{GamePhase, GameState, ThreatKind};

/// Values shown in the in-game HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub drones: u32,
    pub cruise: u32,
    pub ballistic: u32,
    pub hits: u32,
    /// Share of the mission's threats already intercepted or landed (0-100)
    pub progress_percent: f32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            drones: state.remaining(ThreatKind::Drone),
            cruise: state.remaining(ThreatKind::Cruise),
            ballistic: state.remaining(ThreatKind::Ballistic),
            hits: state.hits,
            progress_percent: progress_percent(state),
        }
    }
}

/// Threats dealt with (intercepted or landed) as a percentage of the mission
pub fn progress_percent(state: &GameState) -> f32 {
    let total = state.total_threats() as f32;
    if total <= 0.0 {
        return 100.0;
    }
    let outstanding = (state.remaining_spawns() as usize + state.threats.len()) as f32;
    ((total - outstanding) / total * 100.0).clamp(0.0, 100.0)
}

/// Overall grade on the end screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Flawless,
    Excellent,
    ValiantEffort,
    NeedsImprovement,
}

impl Performance {
    pub fn rate(victory: bool, hits: u32, intercepted: u32, total_threats: u32) -> Self {
        if victory {
            if hits == 0 {
                Performance::Flawless
            } else {
                Performance::Excellent
            }
        } else if intercepted as f32 > total_threats as f32 / 2.0 {
            Performance::ValiantEffort
        } else {
            Performance::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Performance::Flawless => "Flawless",
            Performance::Excellent => "Excellent",
            Performance::ValiantEffort => "Valiant Effort",
            Performance::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// End-of-mission statistics
#[derive(Debug, Clone, PartialEq)]
pub struct MissionReport {
    pub victory: bool,
    /// Whole seconds the mission lasted
    pub duration_secs: u32,
    pub intercepted: u32,
    pub total_threats: u32,
    pub hits: u32,
    pub max_hits: u32,
    pub performance: Performance,
}

impl MissionReport {
    /// Summarize a finished mission; `None` while it is still running
    pub fn from_state(state: &GameState) -> Option<Self> {
        let victory = match state.phase {
            GamePhase::Won => true,
            GamePhase::Lost => false,
            GamePhase::Playing | GamePhase::Paused => return None,
        };
        let total_threats = state.total_threats();
        Some(Self {
            victory,
            duration_secs: state.elapsed.max(0.0).floor() as u32,
            intercepted: state.intercepted,
            total_threats,
            hits: state.hits,
            max_hits: state.tuning.max_hits,
            performance: Performance::rate(victory, state.hits, state.intercepted, total_threats),
        })
    }

    pub fn headline(&self) -> &'static str {
        if self.victory {
            "Mission Accomplished! Israel is safe."
        } else {
            "Mission Failed: Israel has sustained critical damage."
        }
    }

    /// Statistics lines for the end screen
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Time elapsed: {} seconds", self.duration_secs),
            format!(
                "Threats intercepted: {} / {}",
                self.intercepted, self.total_threats
            ),
            format!("Hits taken: {} / {}", self.hits, self.max_hits),
            format!("Overall performance: {}", self.performance),
        ]
    }
}
