//! Habitus - sensor-driven habit tracking engine.
//!
//! Habits auto-complete when the device detects walking, sustained exercise
//! motion, a page of text being read, or rotational motion toggling a focus
//! session; ambient light drives a day/night theme. Each detector is a small
//! threshold/debounce state machine over timestamped samples, so recorded
//! traces replay deterministically.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Habitus                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌─────────────────────┐   ┌──────────────┐  │
//! │  │  Source  │──▶│     Classifiers     │──▶│  Dashboard   │  │
//! │  │ (replay/ │   │ light · step · gyro │   │ (completion, │  │
//! │  │   noop)  │   │      exercise       │   │    theme)    │  │
//! │  └──────────┘   └─────────────────────┘   └──────┬───────┘  │
//! │  ┌──────────┐   ┌─────────────────────┐          │          │
//! │  │  Frames  │──▶│   Reading worker    │──────────┤          │
//! │  └──────────┘   └─────────────────────┘          ▼          │
//! │                              ┌───────────┐ ┌───────────┐    │
//! │                              │ Event log │ │ Pref file │    │
//! │                              └───────────┘ └───────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use habitus::dashboard::{Dashboard, DashboardTuning};
//! use habitus::events::create_shared_log;
//! use habitus::location::NoLocation;
//! use habitus::sensors::{LightClassifier, LightSample};
//! use habitus::store::HabitStore;
//!
//! let store = HabitStore::open_in(std::path::Path::new("."));
//! let mut dashboard = Dashboard::new(
//!     store,
//!     create_shared_log(),
//!     Box::new(NoLocation),
//!     DashboardTuning::default(),
//!     Utc::now(),
//! );
//!
//! let mut light = LightClassifier::default();
//! let sample = LightSample::new(3.0);
//! if let Some(signal) = light.process(&sample) {
//!     dashboard.apply_signal(signal, sample.timestamp).unwrap();
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod events;
pub mod location;
pub mod reading;
pub mod sensors;
pub mod store;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use dashboard::{Dashboard, DashboardTuning, ToggleOutcome};
pub use events::{create_shared_log, HabitEvent, HabitEventLog, SharedHabitEventLog};
pub use location::{FixedLocation, GeoPoint, LocationProvider, NoLocation};
pub use reading::{ReadingDetector, ReadingWorker, TextDetection};
pub use sensors::{
    check_available, AccelSample, ExerciseClassifier, GyroClassifier, GyroSample, LightClassifier,
    LightSample, NoopSource, ReplaySource, SensorHandle, SensorReading, SensorSignal, SourceError,
    StepClassifier,
};
pub use store::{Habit, HabitKind, HabitStore, PrefStore, StoreError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
