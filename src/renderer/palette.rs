//! CSS colors for entities and effects

use crate::sim::{ExplosionColor, ThreatKind};

/// Fill for fallback threat shapes and interception blasts
pub fn threat_color(kind: ThreatKind) -> &'static str {
    match kind {
        ThreatKind::Drone => "lime",
        ThreatKind::Cruise => "yellow",
        ThreatKind::Ballistic => "red",
    }
}

/// Smoke trail behind a threat
pub fn threat_trail_color(kind: ThreatKind) -> &'static str {
    match kind {
        ThreatKind::Drone => "rgba(0,255,0,0.6)",
        ThreatKind::Cruise => "rgba(255,255,0,0.6)",
        ThreatKind::Ballistic => "rgba(255,0,0,0.6)",
    }
}

pub const INTERCEPTOR_TRAIL: &str = "rgba(180, 180, 255, 0.7)";
pub const INTERCEPTOR_BODY: &str = "#ddd";
pub const FLAME: &str = "orange";
pub const BACKGROUND: &str = "#111";
pub const STAR: &str = "#fff";
pub const DOME_BASE: &str = "#888";
pub const DOME_CAP: &str = "#666";
pub const EXPLOSION_CORE: &str = "rgba(255, 255, 255, 0.9)";

/// Mid-stop of an explosion's radial gradient
pub fn explosion_color(color: ExplosionColor) -> &'static str {
    match color {
        ExplosionColor::White => "#fff",
        ExplosionColor::Orange => "orange",
        ExplosionColor::Threat(kind) => threat_color(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interception_blast_matches_threat() {
        for kind in ThreatKind::ALL {
            assert_eq!(explosion_color(ExplosionColor::Threat(kind)), threat_color(kind));
        }
        assert_eq!(explosion_color(ExplosionColor::Orange), "orange");
    }
}
