//! Sustained-exercise detection from accelerometer magnitude.
//!
//! Movement counts once the gravity-adjusted magnitude stays above the
//! threshold continuously for the minimum duration. After a detection the
//! classifier latches until the cooldown window has passed, then re-arms on
//! its own; the original platform implementation did this with a delayed
//! handler, here it is plain timestamp arithmetic so replays are
//! deterministic.

use crate::sensors::types::{AccelSample, SensorSignal};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Approximate gravity subtracted from the raw magnitude, in m/s².
const GRAVITY: f64 = 9.8;

/// Tuning for the exercise classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExerciseTuning {
    /// Gravity-adjusted magnitude above which a sample counts as movement.
    pub movement_threshold: f64,
    /// How long movement must be continuous before it qualifies.
    pub min_duration_ms: i64,
    /// Minimum spacing between two detections.
    pub cooldown_ms: i64,
}

impl Default for ExerciseTuning {
    fn default() -> Self {
        Self {
            movement_threshold: 12.0,
            min_duration_ms: 3000,
            cooldown_ms: 5000,
        }
    }
}

/// Detects sustained exercise-like movement.
#[derive(Debug, Clone)]
pub struct ExerciseClassifier {
    tuning: ExerciseTuning,
    moving_since: Option<DateTime<Utc>>,
    last_detection: Option<DateTime<Utc>>,
    latched: bool,
}

impl ExerciseClassifier {
    pub fn new(tuning: ExerciseTuning) -> Self {
        Self {
            tuning,
            moving_since: None,
            last_detection: None,
            latched: false,
        }
    }

    /// Feed one sample. Emits at most once per cooldown window.
    pub fn process(&mut self, sample: &AccelSample) -> Option<SensorSignal> {
        let now = sample.timestamp;

        // Re-arm once the cooldown has fully elapsed.
        if self.latched {
            match self.last_detection {
                Some(last) if now - last >= Duration::milliseconds(self.tuning.cooldown_ms) => {
                    self.latched = false;
                    self.moving_since = None;
                }
                _ => return None,
            }
        }

        let deviation = (sample.magnitude() - GRAVITY).abs();
        if deviation <= self.tuning.movement_threshold {
            // Movement stopped; the continuous-duration clock restarts.
            self.moving_since = None;
            return None;
        }

        let start = match self.moving_since {
            Some(start) => start,
            None => {
                self.moving_since = Some(now);
                return None;
            }
        };

        if now - start < Duration::milliseconds(self.tuning.min_duration_ms) {
            return None;
        }

        let cooled_down = match self.last_detection {
            Some(last) => now - last >= Duration::milliseconds(self.tuning.cooldown_ms),
            None => true,
        };
        if !cooled_down {
            return None;
        }

        self.latched = true;
        self.last_detection = Some(now);
        Some(SensorSignal::ExerciseDetected)
    }

    /// Drop all movement state, e.g. when the source restarts.
    pub fn reset(&mut self) {
        self.moving_since = None;
        self.latched = false;
    }
}

impl Default for ExerciseClassifier {
    fn default() -> Self {
        Self::new(ExerciseTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Magnitude 22.0 on the z axis gives a deviation of 12.2, above threshold.
    fn moving_at(base: DateTime<Utc>, offset_ms: i64) -> AccelSample {
        AccelSample {
            timestamp: base + Duration::milliseconds(offset_ms),
            x: 0.0,
            y: 0.0,
            z: 22.0,
        }
    }

    fn still_at(base: DateTime<Utc>, offset_ms: i64) -> AccelSample {
        AccelSample {
            timestamp: base + Duration::milliseconds(offset_ms),
            x: 0.0,
            y: 0.0,
            z: 9.8,
        }
    }

    #[test]
    fn test_sustained_movement_fires_once() {
        let base = Utc::now();
        let mut classifier = ExerciseClassifier::default();

        assert_eq!(classifier.process(&moving_at(base, 0)), None);
        assert_eq!(classifier.process(&moving_at(base, 1000)), None);
        assert_eq!(classifier.process(&moving_at(base, 2999)), None);
        assert_eq!(
            classifier.process(&moving_at(base, 3000)),
            Some(SensorSignal::ExerciseDetected)
        );
        // Still moving, but latched until the cooldown elapses
        assert_eq!(classifier.process(&moving_at(base, 4000)), None);
        assert_eq!(classifier.process(&moving_at(base, 7000)), None);
    }

    #[test]
    fn test_interrupted_movement_restarts_the_clock() {
        let base = Utc::now();
        let mut classifier = ExerciseClassifier::default();

        classifier.process(&moving_at(base, 0));
        classifier.process(&moving_at(base, 2000));
        // Break in movement just before qualifying
        classifier.process(&still_at(base, 2500));
        // 3000ms of total elapsed time, but continuity was lost
        assert_eq!(classifier.process(&moving_at(base, 3000)), None);
        assert_eq!(classifier.process(&moving_at(base, 5999)), None);
        assert_eq!(
            classifier.process(&moving_at(base, 6000)),
            Some(SensorSignal::ExerciseDetected)
        );
    }

    #[test]
    fn test_no_second_detection_within_cooldown() {
        let base = Utc::now();
        let mut classifier = ExerciseClassifier::default();

        classifier.process(&moving_at(base, 0));
        assert_eq!(
            classifier.process(&moving_at(base, 3000)),
            Some(SensorSignal::ExerciseDetected)
        );

        // Continuous movement straight through the cooldown. The classifier
        // re-arms at 8000ms, restarts its duration clock, and fires again
        // only after another full qualifying stretch.
        for offset in (3500..8000).step_by(500) {
            assert_eq!(classifier.process(&moving_at(base, offset)), None);
        }
        assert_eq!(classifier.process(&moving_at(base, 8000)), None);
        assert_eq!(classifier.process(&moving_at(base, 10_999)), None);
        assert_eq!(
            classifier.process(&moving_at(base, 11_000)),
            Some(SensorSignal::ExerciseDetected)
        );
    }
}
