//! Process-lifetime habit event log.
//!
//! Each completion is recorded with a location and label so a map screen can
//! render it. The log lives in memory only: it is created explicitly by the
//! application, shared via `Arc`, cleared on demand, and never persisted.

use crate::store::habit::HabitKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A point-in-time record of a habit completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub kind: HabitKind,
}

impl HabitEvent {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>, kind: HabitKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            latitude,
            longitude,
            label: label.into(),
            kind,
        }
    }
}

/// In-memory event log with an explicit init/clear lifecycle.
#[derive(Debug, Default)]
pub struct HabitEventLog {
    events: Mutex<Vec<HabitEvent>>,
}

impl HabitEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn add(&self, event: HabitEvent) {
        self.events.lock().expect("event log poisoned").push(event);
    }

    /// Snapshot of all events in insertion order.
    pub fn all(&self) -> Vec<HabitEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().expect("event log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Explicit reset; the only way entries ever leave the log.
    pub fn clear(&self) {
        self.events.lock().expect("event log poisoned").clear();
    }
}

/// Thread-safe shared event log.
pub type SharedHabitEventLog = Arc<HabitEventLog>;

/// Create a new shared event log.
pub fn create_shared_log() -> SharedHabitEventLog {
    Arc::new(HabitEventLog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_insertion_order() {
        let log = HabitEventLog::new();
        log.add(HabitEvent::new(1.0, 2.0, "Walk completed", HabitKind::Walk));
        log.add(HabitEvent::new(3.0, 4.0, "Focus mode on", HabitKind::Focus));

        let events = log.all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, HabitKind::Walk);
        assert_eq!(events[1].label, "Focus mode on");
    }

    #[test]
    fn test_clear_empties_the_log() {
        let log = HabitEventLog::new();
        log.add(HabitEvent::new(0.0, 0.0, "Read completed", HabitKind::Read));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_shared_log_is_visible_across_clones() {
        let log = create_shared_log();
        let other = log.clone();
        other.add(HabitEvent::new(0.0, 0.0, "Demo completed", HabitKind::Demo));
        assert_eq!(log.len(), 1);
    }
}
