//! Habit records.

use serde::{Deserialize, Serialize};

/// How a habit gets completed.
///
/// Closed set: completion logic matches on this exhaustively, so adding a
/// variant forces every branch point to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HabitKind {
    /// Completed by step-like movement.
    Walk,
    /// Completed by sustained exercise motion.
    Exercise,
    /// Completed by recognizing a page of text.
    Read,
    /// Completed by a focus-mode session.
    Focus,
    /// Completed by a manual tap.
    Demo,
}

impl HabitKind {
    /// Human-readable label used in event log entries.
    pub fn label(&self) -> &'static str {
        match self {
            HabitKind::Walk => "Walk",
            HabitKind::Exercise => "Exercise",
            HabitKind::Read => "Read",
            HabitKind::Focus => "Focus",
            HabitKind::Demo => "Demo",
        }
    }
}

/// A user-defined recurring goal.
///
/// Identity is by name; the system does not enforce uniqueness. Habits are
/// created, mutated (completed flag) and persisted, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub goal: String,
    pub period: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    pub completed: bool,
}

impl Habit {
    pub fn new(
        name: impl Into<String>,
        goal: impl Into<String>,
        period: impl Into<String>,
        kind: HabitKind,
    ) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            period: period.into(),
            kind,
            completed: false,
        }
    }

    /// The seeded list shown on a fresh dashboard.
    pub fn default_habits() -> Vec<Habit> {
        vec![
            Habit::new("Morning walk", "Walk for 10 minutes", "Everyday", HabitKind::Walk),
            Habit::new("Exercise", "Move for 3 minutes", "Everyday", HabitKind::Exercise),
            Habit::new("Read", "Read one page", "Everyday", HabitKind::Read),
            Habit::new("Focus session", "One focus session", "Everyday", HabitKind::Focus),
            Habit::new("Drink water", "Eight glasses", "Everyday", HabitKind::Demo),
        ]
    }
}
