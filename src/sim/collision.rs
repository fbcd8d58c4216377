//! Collision tests for threats
//!
//! Everything is a circle: a threat's sprite size is its diameter and an
//! interceptor's width is its diameter.

use super::state::{Interceptor, Threat};

/// True once the bottom of the threat's sprite is below the ground line
#[inline]
pub fn hits_ground(threat: &Threat, ground_y: f32) -> bool {
    threat.pos.y + threat.size / 2.0 > ground_y
}

/// True when the interceptor is close enough to destroy the threat
///
/// `overlap` scales the summed radii (0.8 means the sprites must overlap by
/// a fifth before it counts).
#[inline]
pub fn interceptor_hits(threat: &Threat, interceptor: &Interceptor, overlap: f32) -> bool {
    let reach = (threat.size / 2.0 + interceptor.width / 2.0) * overlap;
    threat.pos.distance(interceptor.pos) < reach
}

/// Bounce a threat off the side walls
///
/// The drift angle is negated and the position clamped so the sprite stays
/// fully on screen. Returns true if a bounce happened.
pub fn reflect_at_bounds(threat: &mut Threat, width: f32) -> bool {
    let half = threat.size / 2.0;
    if threat.pos.x < half || threat.pos.x > width - half {
        threat.angle = -threat.angle;
        threat.pos.x = threat.pos.x.min(width - half).max(half);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ThreatKind;
    use glam::Vec2;

    fn threat(x: f32, y: f32, size: f32) -> Threat {
        Threat {
            id: 1,
            kind: ThreatKind::Drone,
            pos: Vec2::new(x, y),
            speed: 1.0,
            size,
            angle: 0.2,
            rotation: 0.0,
            trail: Vec::new(),
        }
    }

    #[test]
    fn test_ground_uses_bottom_edge() {
        assert!(!hits_ground(&threat(100.0, 585.0, 30.0), 600.0));
        assert!(hits_ground(&threat(100.0, 585.5, 30.0), 600.0));
    }

    #[test]
    fn test_intercept_radius() {
        let t = threat(100.0, 100.0, 30.0);
        // Reach = (15 + 12) * 0.8 = 21.6
        let near = Interceptor::new(1, Vec2::new(100.0, 121.0), Vec2::new(100.0, 0.0), 10.0);
        let far = Interceptor::new(2, Vec2::new(100.0, 122.0), Vec2::new(100.0, 0.0), 10.0);
        assert!(interceptor_hits(&t, &near, 0.8));
        assert!(!interceptor_hits(&t, &far, 0.8));
    }

    #[test]
    fn test_reflect_left_wall() {
        let mut t = threat(5.0, 100.0, 30.0);
        assert!(reflect_at_bounds(&mut t, 800.0));
        assert_eq!(t.pos.x, 15.0);
        assert!((t.angle + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_right_wall() {
        let mut t = threat(799.0, 100.0, 30.0);
        assert!(reflect_at_bounds(&mut t, 800.0));
        assert_eq!(t.pos.x, 785.0);
    }

    #[test]
    fn test_no_reflect_inside() {
        let mut t = threat(400.0, 100.0, 30.0);
        assert!(!reflect_at_bounds(&mut t, 800.0));
        assert_eq!(t.angle, 0.2);
    }
}
