//! Step-like movement detection from consecutive accelerometer samples.
//!
//! A sliding two-sample comparison: the summed per-axis delta between the
//! current sample and the last accepted one, scaled by the elapsed interval.
//! Samples closer together than the minimum interval are discarded without
//! updating the reference, so a burst of fast callbacks can never fire.

use crate::sensors::types::{AccelSample, SensorSignal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scale factor applied to the per-millisecond delta.
const SPEED_SCALE: f64 = 10_000.0;

/// Tuning for the step classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepTuning {
    /// Minimum spacing between the two compared samples.
    pub min_interval_ms: i64,
    /// Scaled delta above which movement counts as a step.
    pub speed_threshold: f64,
}

impl Default for StepTuning {
    fn default() -> Self {
        Self {
            min_interval_ms: 500,
            speed_threshold: 800.0,
        }
    }
}

/// Detects step-like movement from accelerometer samples.
#[derive(Debug, Clone)]
pub struct StepClassifier {
    tuning: StepTuning,
    last_update: Option<DateTime<Utc>>,
    last_x: f64,
    last_y: f64,
    last_z: f64,
}

impl StepClassifier {
    pub fn new(tuning: StepTuning) -> Self {
        Self {
            tuning,
            last_update: None,
            last_x: 0.0,
            last_y: 0.0,
            last_z: 0.0,
        }
    }

    /// Feed one sample. The first sample only seeds the reference.
    pub fn process(&mut self, sample: &AccelSample) -> Option<SensorSignal> {
        let now = sample.timestamp;

        let Some(last) = self.last_update else {
            self.accept(sample, now);
            return None;
        };

        let elapsed_ms = (now - last).num_milliseconds();
        if elapsed_ms < self.tuning.min_interval_ms {
            return None;
        }

        let delta = (sample.x + sample.y + sample.z - self.last_x - self.last_y - self.last_z)
            .abs();
        let speed = delta / elapsed_ms as f64 * SPEED_SCALE;
        self.accept(sample, now);

        if speed > self.tuning.speed_threshold {
            Some(SensorSignal::StepDetected)
        } else {
            None
        }
    }

    /// Forget the reference sample, e.g. when the source restarts.
    pub fn reset(&mut self) {
        self.last_update = None;
        self.last_x = 0.0;
        self.last_y = 0.0;
        self.last_z = 0.0;
    }

    fn accept(&mut self, sample: &AccelSample, now: DateTime<Utc>) {
        self.last_update = Some(now);
        self.last_x = sample.x;
        self.last_y = sample.y;
        self.last_z = sample.z;
    }
}

impl Default for StepClassifier {
    fn default() -> Self {
        Self::new(StepTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_at(base: DateTime<Utc>, offset_ms: i64, x: f64, y: f64, z: f64) -> AccelSample {
        AccelSample {
            timestamp: base + Duration::milliseconds(offset_ms),
            x,
            y,
            z,
        }
    }

    #[test]
    fn test_large_delta_after_interval_fires() {
        let base = Utc::now();
        let mut classifier = StepClassifier::default();

        assert_eq!(classifier.process(&sample_at(base, 0, 0.0, 0.0, 9.8)), None);
        // Delta 60 over 600ms: 60 / 600 * 10000 = 1000 > 800
        let signal = classifier.process(&sample_at(base, 600, 20.0, 20.0, 29.8));
        assert_eq!(signal, Some(SensorSignal::StepDetected));
    }

    #[test]
    fn test_close_samples_never_fire() {
        let base = Utc::now();
        let mut classifier = StepClassifier::default();

        assert_eq!(classifier.process(&sample_at(base, 0, 0.0, 0.0, 9.8)), None);
        // Huge magnitude, but only 400ms apart
        assert_eq!(
            classifier.process(&sample_at(base, 400, 500.0, 500.0, 500.0)),
            None
        );
        // The reference did not move, so the next spaced sample still compares
        // against the seed and fires.
        let signal = classifier.process(&sample_at(base, 700, 60.0, 0.0, 9.8));
        assert_eq!(signal, Some(SensorSignal::StepDetected));
    }

    #[test]
    fn test_slow_drift_stays_quiet() {
        let base = Utc::now();
        let mut classifier = StepClassifier::default();

        classifier.process(&sample_at(base, 0, 0.0, 0.0, 9.8));
        // Delta 3 over 600ms: 3 / 600 * 10000 = 50, well under the threshold
        assert_eq!(
            classifier.process(&sample_at(base, 600, 1.0, 1.0, 10.8)),
            None
        );
    }

    #[test]
    fn test_reset_reseeds_reference() {
        let base = Utc::now();
        let mut classifier = StepClassifier::default();

        classifier.process(&sample_at(base, 0, 0.0, 0.0, 9.8));
        classifier.reset();
        // First sample after reset only seeds again
        assert_eq!(
            classifier.process(&sample_at(base, 600, 60.0, 0.0, 9.8)),
            None
        );
    }
}
