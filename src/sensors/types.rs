//! Sample and signal types for the Habitus sensor pipeline.
//!
//! Samples are timestamped at the source so that classifier behavior depends
//! only on the trace, never on the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single 3-axis accelerometer sample in m/s².
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccelSample {
    /// Timestamp when the sample was taken
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            x,
            y,
            z,
        }
    }

    /// Vector magnitude of the sample, gravity included.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A single 3-axis gyroscope sample in rad/s.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GyroSample {
    /// Timestamp when the sample was taken
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GyroSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            x,
            y,
            z,
        }
    }

    /// Sum of absolute angular velocities across the three axes.
    pub fn angular_speed(&self) -> f64 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

/// A single ambient light sample in lux.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightSample {
    /// Timestamp when the sample was taken
    pub timestamp: DateTime<Utc>,
    pub lux: f64,
}

impl LightSample {
    pub fn new(lux: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            lux,
        }
    }
}

/// Unified reading type produced by a sensor source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "sensor", rename_all = "snake_case")]
pub enum SensorReading {
    Accel(AccelSample),
    Gyro(GyroSample),
    Light(LightSample),
}

impl SensorReading {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SensorReading::Accel(s) => s.timestamp,
            SensorReading::Gyro(s) => s.timestamp,
            SensorReading::Light(s) => s.timestamp,
        }
    }
}

/// A classifier output: a discrete event derived from raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorSignal {
    /// Step-like movement crossed the speed threshold.
    StepDetected,
    /// Sustained above-threshold movement qualified as exercise.
    ExerciseDetected,
    /// Illuminance dropped below the low-light threshold.
    LowLight,
    /// Illuminance rose above the normal-light threshold.
    NormalLight,
    /// Rotational motion toggled focus mode.
    FocusToggled { active: bool },
    /// Focus mode timed out and reverted on its own.
    FocusExpired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accel_magnitude() {
        let sample = AccelSample::new(3.0, 4.0, 0.0);
        assert!((sample.magnitude() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_speed_sums_absolute_values() {
        let sample = GyroSample::new(-1.5, 2.0, -0.5);
        assert!((sample.angular_speed() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_reading_roundtrip() {
        let reading = SensorReading::Light(LightSample::new(42.0));
        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"sensor\":\"light\""));
        let back: SensorReading = serde_json::from_str(&json).unwrap();
        match back {
            SensorReading::Light(s) => assert!((s.lux - 42.0).abs() < 1e-9),
            other => panic!("unexpected reading: {other:?}"),
        }
    }
}
