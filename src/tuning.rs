//! Data-driven game balance
//!
//! Defaults reproduce the classic mission: 170 drones, 30 cruise missiles and
//! 120 ballistic missiles against a ten-hit budget. A JSON override may replace
//! any subset of fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::sim::ThreatKind;

/// Tuning validation/parse error
#[derive(Debug, Error)]
pub enum TuningError {
    /// JSON could not be parsed
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A threat class has a zero or negative spawn interval
    #[error("{0} spawn interval must be positive")]
    Interval(ThreatKind),

    /// A threat class has a zero or negative size
    #[error("{0} size must be positive")]
    Size(ThreatKind),

    /// A threat class has a non-finite or non-positive speed
    #[error("{0} speed must be finite and positive")]
    Speed(ThreatKind),

    /// Interceptor speed is non-finite or non-positive
    #[error("interceptor speed must be finite and positive")]
    InterceptorSpeed,

    /// Hit overlap is non-finite or non-positive
    #[error("hit overlap must be finite and positive")]
    HitOverlap,

    /// Launcher offset is non-finite or non-positive
    #[error("launcher offset must be finite and positive")]
    LauncherOffset,

    /// The mission would end before the first hit
    #[error("max_hits must be at least 1")]
    MaxHits,

    /// No threats would ever spawn
    #[error("mission has no threats")]
    NoThreats,

    /// Class counts add up past `u32::MAX`
    #[error("too many threats in the mission")]
    TooManyThreats,
}

/// Spawn and motion parameters for one threat class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatClassTuning {
    /// Threats of this class spawned over the whole mission
    pub count: u32,
    /// Milliseconds between spawns
    pub interval_ms: f32,
    /// Minimum speed (pixels per tick)
    pub base_speed: f32,
    /// Random extra speed added on top of `base_speed`
    pub speed_jitter: f32,
    /// Sprite size, also the collision diameter
    pub size: f32,
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub drone: ThreatClassTuning,
    pub cruise: ThreatClassTuning,
    pub ballistic: ThreatClassTuning,
    /// Ground hits that lose the mission
    pub max_hits: u32,
    /// Interceptor speed (pixels per tick)
    pub interceptor_speed: f32,
    /// Launch point height above the ground when no dome sprite is loaded
    pub launcher_offset: f32,
    /// Fraction of the summed radii that counts as an interception
    pub hit_overlap: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            drone: ThreatClassTuning {
                count: 170,
                interval_ms: 800.0,
                base_speed: 1.0,
                speed_jitter: 0.5,
                size: 30.0,
            },
            cruise: ThreatClassTuning {
                count: 30,
                interval_ms: 2800.0,
                base_speed: 2.0,
                speed_jitter: 0.7,
                size: 40.0,
            },
            ballistic: ThreatClassTuning {
                count: 120,
                interval_ms: 4500.0,
                base_speed: 3.0,
                speed_jitter: 1.0,
                size: 50.0,
            },
            max_hits: 10,
            interceptor_speed: 10.0,
            launcher_offset: 30.0,
            hit_overlap: 0.8,
        }
    }
}

impl GameTuning {
    /// Parse a (possibly partial) JSON override and validate it
    ///
    /// The override is merged field by field onto the defaults, so
    /// `{"cruise": {"count": 5}}` keeps the cruise interval, speed and size.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let patch: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(GameTuning::default())?;
        merge_json(&mut merged, patch);
        let tuning: GameTuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning for one threat class
    pub fn class(&self, kind: ThreatKind) -> &ThreatClassTuning {
        match kind {
            ThreatKind::Drone => &self.drone,
            ThreatKind::Cruise => &self.cruise,
            ThreatKind::Ballistic => &self.ballistic,
        }
    }

    /// Threats spawned over the whole mission (saturates at `u32::MAX`)
    pub fn total_threats(&self) -> u32 {
        ThreatKind::ALL
            .iter()
            .fold(0u32, |acc, &k| acc.saturating_add(self.class(k).count))
    }

    fn checked_total_threats(&self) -> Option<u32> {
        ThreatKind::ALL
            .iter()
            .try_fold(0u32, |acc, &k| acc.checked_add(self.class(k).count))
    }

    /// Check invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        for kind in ThreatKind::ALL {
            let class = self.class(kind);
            if !class.interval_ms.is_finite() || class.interval_ms <= 0.0 {
                return Err(TuningError::Interval(kind));
            }
            if !class.size.is_finite() || class.size <= 0.0 {
                return Err(TuningError::Size(kind));
            }
            if !class.base_speed.is_finite()
                || !class.speed_jitter.is_finite()
                || class.base_speed <= 0.0
                || class.speed_jitter < 0.0
            {
                return Err(TuningError::Speed(kind));
            }
        }
        if !self.interceptor_speed.is_finite() || self.interceptor_speed <= 0.0 {
            return Err(TuningError::InterceptorSpeed);
        }
        if !self.hit_overlap.is_finite() || self.hit_overlap <= 0.0 {
            return Err(TuningError::HitOverlap);
        }
        if !self.launcher_offset.is_finite() || self.launcher_offset <= 0.0 {
            return Err(TuningError::LauncherOffset);
        }
        if self.max_hits == 0 {
            return Err(TuningError::MaxHits);
        }
        match self.checked_total_threats() {
            None => Err(TuningError::TooManyThreats),
            Some(0) => Err(TuningError::NoThreats),
            Some(_) => Ok(()),
        }
    }
}

/// Overlay `patch` onto `base`; objects merge key by key, anything else replaces
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mission() {
        let tuning = GameTuning::default();
        assert_eq!(tuning.total_threats(), 320);
        assert_eq!(tuning.max_hits, 10);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = GameTuning::from_json(r#"{ "max_hits": 3 }"#).unwrap();
        assert_eq!(tuning.max_hits, 3);
        assert_eq!(tuning.drone.count, 170);
        assert_eq!(tuning.ballistic.interval_ms, 4500.0);
    }

    #[test]
    fn test_class_override() {
        let json = r#"{
            "cruise": { "count": 5, "interval_ms": 100, "base_speed": 2, "speed_jitter": 0, "size": 40 }
        }"#;
        let tuning = GameTuning::from_json(json).unwrap();
        assert_eq!(tuning.cruise.count, 5);
        assert_eq!(tuning.total_threats(), 170 + 5 + 120);
    }

    #[test]
    fn test_partial_class_override_keeps_class_defaults() {
        let tuning = GameTuning::from_json(r#"{"cruise":{"count":5}}"#).unwrap();
        assert_eq!(tuning.cruise.count, 5);
        assert_eq!(tuning.cruise.interval_ms, 2800.0);
        assert_eq!(tuning.cruise.base_speed, 2.0);
        assert_eq!(tuning.cruise.size, 40.0);
        // Other classes untouched
        assert_eq!(tuning.drone, GameTuning::default().drone);
        assert_eq!(tuning.ballistic, GameTuning::default().ballistic);
    }

    #[test]
    fn test_rejects_wrong_field_type() {
        assert!(matches!(
            GameTuning::from_json(r#"{"drone":{"count":"many"}}"#),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_count_overflow() {
        let json = r#"{ "drone": { "count": 4294967295 }, "cruise": { "count": 2 } }"#;
        assert!(matches!(
            GameTuning::from_json(json),
            Err(TuningError::TooManyThreats)
        ));

        let mut tuning = GameTuning::default();
        tuning.drone.count = u32::MAX;
        assert_eq!(tuning.total_threats(), u32::MAX);
    }

    #[test]
    fn test_rejects_bad_overlap_and_offset() {
        let tuning = GameTuning {
            hit_overlap: -0.5,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::HitOverlap)));

        let tuning = GameTuning {
            hit_overlap: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::HitOverlap)));

        assert!(matches!(
            GameTuning::from_json(r#"{ "launcher_offset": 0 }"#),
            Err(TuningError::LauncherOffset)
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            GameTuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut tuning = GameTuning::default();
        tuning.drone.interval_ms = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Interval(ThreatKind::Drone))
        ));
        assert_eq!(
            TuningError::Interval(ThreatKind::Drone).to_string(),
            "drone spawn interval must be positive"
        );
    }

    #[test]
    fn test_rejects_empty_mission() {
        let mut tuning = GameTuning::default();
        tuning.drone.count = 0;
        tuning.cruise.count = 0;
        tuning.ballistic.count = 0;
        assert!(matches!(tuning.validate(), Err(TuningError::NoThreats)));
    }

    #[test]
    fn test_rejects_zero_max_hits() {
        let tuning = GameTuning {
            max_hits: 0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::MaxHits)));
    }
}
