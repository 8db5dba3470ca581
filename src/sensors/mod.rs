//! Sensor classification for the Habitus engine.
//!
//! Each classifier is an independent state machine over timestamped samples:
//! it keeps a few timestamps and flags, and on a threshold crossing emits a
//! discrete [`SensorSignal`]. There is no ordering dependency between
//! classifiers.

pub mod exercise;
pub mod gyro;
pub mod light;
pub mod source;
pub mod step;
pub mod types;

// Re-export commonly used types
pub use exercise::{ExerciseClassifier, ExerciseTuning};
pub use gyro::{GyroClassifier, GyroTuning};
pub use light::{LightClassifier, LightTuning};
pub use source::{check_available, NoopSource, ReplaySource, SensorHandle, SourceError};
pub use step::{StepClassifier, StepTuning};
pub use types::{AccelSample, GyroSample, LightSample, SensorReading, SensorSignal};
