//! Habit records and their persistence.

pub mod habit;
pub mod prefs;

pub use habit::{Habit, HabitKind};
pub use prefs::{HabitStore, PrefStore, StoreError, PREFS_FILE};
