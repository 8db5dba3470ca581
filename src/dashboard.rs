//! The dashboard engine: classifier signals in, habit and theme state out.
//!
//! Sensor-triggered completions flip the first matching incomplete habit,
//! append an event at the last known location and persist the whole list.
//! Theme handling applies the startup grace and light debounce the raw light
//! classifier deliberately does not: sensors can be noisy right after start,
//! and a flickering lamp must not strobe the UI between day and night.

use crate::events::{HabitEvent, SharedHabitEventLog};
use crate::location::LocationProvider;
use crate::sensors::types::SensorSignal;
use crate::store::habit::{Habit, HabitKind};
use crate::store::prefs::{HabitStore, StoreError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tuning for signal handling at the dashboard layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DashboardTuning {
    /// Light signals inside this window after start are ignored.
    pub startup_grace_ms: i64,
    /// Minimum spacing between two theme changes from the light sensor.
    pub light_debounce_ms: i64,
}

impl Default for DashboardTuning {
    fn default() -> Self {
        Self {
            startup_grace_ms: 3000,
            light_debounce_ms: 2500,
        }
    }
}

/// Result of a manual tap on a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The habit was completed and is now unmarked.
    Unmarked,
    /// The habit was marked complete by hand.
    Completed,
    /// The habit completes via sensors only; nothing changed.
    SensorOnly,
    /// No habit with that name exists.
    NotFound,
}

/// Engine state tying classifiers, the habit list and the theme together.
pub struct Dashboard {
    store: HabitStore,
    habits: Vec<Habit>,
    events: SharedHabitEventLog,
    location: Box<dyn LocationProvider>,
    tuning: DashboardTuning,
    night_mode: bool,
    focus_mode: bool,
    started_at: DateTime<Utc>,
    last_light_change: Option<DateTime<Utc>>,
}

impl Dashboard {
    /// Build the engine. Restores the habit list and theme flags from the
    /// store; an empty store is seeded with the default habits (in memory,
    /// persisted on first mutation).
    pub fn new(
        store: HabitStore,
        events: SharedHabitEventLog,
        location: Box<dyn LocationProvider>,
        tuning: DashboardTuning,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut habits = store.load();
        if habits.is_empty() {
            habits = Habit::default_habits();
        }
        let night_mode = store.night_mode();
        let focus_mode = store.focus_mode();

        Self {
            store,
            habits,
            events,
            location,
            tuning,
            night_mode,
            focus_mode,
            started_at,
            last_light_change: None,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    /// Append a habit and persist the full list.
    pub fn add_habit(&mut self, habit: Habit) -> Result<(), StoreError> {
        self.habits.push(habit);
        self.store.save(&self.habits)
    }

    /// Apply one classifier signal observed at `at`.
    pub fn apply_signal(&mut self, signal: SensorSignal, at: DateTime<Utc>) -> Result<(), StoreError> {
        match signal {
            SensorSignal::StepDetected => {
                self.complete_by_kind(HabitKind::Walk)?;
            }
            SensorSignal::ExerciseDetected => {
                self.complete_by_kind(HabitKind::Exercise)?;
            }
            SensorSignal::LowLight => self.handle_light(true, at)?,
            SensorSignal::NormalLight => self.handle_light(false, at)?,
            SensorSignal::FocusToggled { active } => self.set_focus(active)?,
            SensorSignal::FocusExpired => self.set_focus(false)?,
        }
        Ok(())
    }

    /// Complete the reading habit after a qualifying page detection.
    pub fn complete_reading(&mut self) -> Result<bool, StoreError> {
        self.complete_by_kind(HabitKind::Read)
    }

    /// Handle a manual tap on the named habit.
    ///
    /// Completed habits can always be unmarked; marking by hand is reserved
    /// for demo habits, every other kind completes through its sensor.
    pub fn toggle_manual(&mut self, name: &str) -> Result<ToggleOutcome, StoreError> {
        let Some(idx) = self.habits.iter().position(|h| h.name == name) else {
            return Ok(ToggleOutcome::NotFound);
        };

        if self.habits[idx].completed {
            self.habits[idx].completed = false;
            self.store.save(&self.habits)?;
            log::info!("habit unmarked: {name}");
            return Ok(ToggleOutcome::Unmarked);
        }

        match self.habits[idx].kind {
            HabitKind::Demo => {
                self.habits[idx].completed = true;
                self.store.save(&self.habits)?;
                self.record_event(format!("{name} completed"), HabitKind::Demo);
                log::info!("habit completed manually: {name}");
                Ok(ToggleOutcome::Completed)
            }
            HabitKind::Walk | HabitKind::Exercise | HabitKind::Read | HabitKind::Focus => {
                Ok(ToggleOutcome::SensorOnly)
            }
        }
    }

    /// Complete the first incomplete habit of the given kind, persist, and
    /// log an event. Returns whether anything changed.
    fn complete_by_kind(&mut self, kind: HabitKind) -> Result<bool, StoreError> {
        let Some(habit) = self
            .habits
            .iter_mut()
            .find(|h| h.kind == kind && !h.completed)
        else {
            return Ok(false);
        };

        habit.completed = true;
        let name = habit.name.clone();
        self.store.save(&self.habits)?;
        self.record_event(format!("{} completed", kind.label()), kind);
        log::info!("habit completed by sensor: {name}");
        Ok(true)
    }

    /// Theme change from the light classifier, with grace and debounce.
    fn handle_light(&mut self, low_light: bool, at: DateTime<Utc>) -> Result<(), StoreError> {
        if at - self.started_at < Duration::milliseconds(self.tuning.startup_grace_ms) {
            log::debug!("ignoring light change inside startup grace");
            return Ok(());
        }
        if let Some(last) = self.last_light_change {
            if at - last < Duration::milliseconds(self.tuning.light_debounce_ms) {
                log::debug!("ignoring light change inside debounce window");
                return Ok(());
            }
        }
        if low_light == self.night_mode {
            return Ok(());
        }

        self.last_light_change = Some(at);

        // A real ambient change overrides a running focus session.
        if self.focus_mode {
            self.focus_mode = false;
            self.store.set_focus_mode(false)?;
        }

        self.night_mode = low_light;
        self.store.set_night_mode(low_light)?;
        log::info!(
            "night mode {}",
            if low_light { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Focus mode change from the gyroscope classifier.
    fn set_focus(&mut self, active: bool) -> Result<(), StoreError> {
        if active == self.focus_mode {
            return Ok(());
        }
        self.focus_mode = active;
        self.store.set_focus_mode(active)?;
        if active {
            self.record_event("Focus mode on".to_string(), HabitKind::Focus);
        }
        log::info!("focus mode {}", if active { "on" } else { "off" });
        Ok(())
    }

    fn record_event(&self, label: String, kind: HabitKind) {
        let point = self.location.last_known();
        let (latitude, longitude) = match point {
            Some(p) => (p.latitude, p.longitude),
            None => (0.0, 0.0),
        };
        self.events
            .add(HabitEvent::new(latitude, longitude, label, kind));
    }
}
