//! Light classification: illuminance to a binary day/night signal.
//!
//! The band between the two thresholds emits nothing, so small fluctuations
//! around either edge cannot flip the state back and forth. Flicker
//! suppression over time (debounce, startup grace) is the consumer's job.

use crate::sensors::types::{LightSample, SensorSignal};
use serde::{Deserialize, Serialize};

/// Tuning for the light classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightTuning {
    /// Below this many lux the environment counts as dark.
    pub low_lux: f64,
    /// Above this many lux the environment counts as lit.
    pub normal_lux: f64,
}

impl Default for LightTuning {
    fn default() -> Self {
        Self {
            low_lux: 10.0,
            normal_lux: 500.0,
        }
    }
}

/// Maps illuminance samples to low/normal light signals.
#[derive(Debug, Clone)]
pub struct LightClassifier {
    tuning: LightTuning,
}

impl LightClassifier {
    pub fn new(tuning: LightTuning) -> Self {
        Self { tuning }
    }

    /// Classify one sample. Readings inside the dead band emit nothing.
    pub fn process(&mut self, sample: &LightSample) -> Option<SensorSignal> {
        if sample.lux < self.tuning.low_lux {
            Some(SensorSignal::LowLight)
        } else if sample.lux > self.tuning.normal_lux {
            Some(SensorSignal::NormalLight)
        } else {
            None
        }
    }
}

impl Default for LightClassifier {
    fn default() -> Self {
        Self::new(LightTuning::default())
    }
}
