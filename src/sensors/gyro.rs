//! Gyroscope classification: rotational motion toggles focus mode.
//!
//! A trigger requires the summed angular speed to cross the threshold and the
//! re-trigger interval to have passed. When focus mode turns on it schedules
//! its own expiry; `tick` surfaces the expiry once its deadline passes.

use crate::sensors::types::{GyroSample, SensorSignal};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tuning for the gyroscope classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GyroTuning {
    /// Summed angular speed above which a trigger fires.
    pub rotation_threshold: f64,
    /// Minimum spacing between two triggers.
    pub retrigger_ms: i64,
    /// How long focus mode stays on before reverting by itself.
    pub focus_duration_ms: i64,
}

impl Default for GyroTuning {
    fn default() -> Self {
        Self {
            rotation_threshold: 5.0,
            retrigger_ms: 2000,
            focus_duration_ms: 15_000,
        }
    }
}

/// Toggles focus mode on sustained rotational motion.
#[derive(Debug, Clone)]
pub struct GyroClassifier {
    tuning: GyroTuning,
    focus_active: bool,
    last_trigger: Option<DateTime<Utc>>,
    focus_expires: Option<DateTime<Utc>>,
}

impl GyroClassifier {
    pub fn new(tuning: GyroTuning) -> Self {
        Self {
            tuning,
            focus_active: false,
            last_trigger: None,
            focus_expires: None,
        }
    }

    /// Whether focus mode is currently on.
    pub fn focus_active(&self) -> bool {
        self.focus_active
    }

    /// Feed one sample. A pending expiry is surfaced before any new trigger.
    pub fn process(&mut self, sample: &GyroSample) -> Option<SensorSignal> {
        let now = sample.timestamp;

        if let Some(signal) = self.tick(now) {
            return Some(signal);
        }

        if sample.angular_speed() <= self.tuning.rotation_threshold {
            return None;
        }

        let ready = match self.last_trigger {
            Some(last) => now - last >= Duration::milliseconds(self.tuning.retrigger_ms),
            None => true,
        };
        if !ready {
            return None;
        }

        self.last_trigger = Some(now);
        self.focus_active = !self.focus_active;
        self.focus_expires = if self.focus_active {
            Some(now + Duration::milliseconds(self.tuning.focus_duration_ms))
        } else {
            None
        };

        Some(SensorSignal::FocusToggled {
            active: self.focus_active,
        })
    }

    /// Check the auto-revert deadline against the given time.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<SensorSignal> {
        match self.focus_expires {
            Some(deadline) if self.focus_active && now >= deadline => {
                self.focus_active = false;
                self.focus_expires = None;
                Some(SensorSignal::FocusExpired)
            }
            _ => None,
        }
    }

    /// Drop trigger state, e.g. when the source restarts.
    pub fn reset(&mut self) {
        self.focus_active = false;
        self.last_trigger = None;
        self.focus_expires = None;
    }
}

impl Default for GyroClassifier {
    fn default() -> Self {
        Self::new(GyroTuning::default())
    }
}
