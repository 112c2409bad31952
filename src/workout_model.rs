//! Workout session records.
//!
//! A [`Workout`] is created by the UI when a session finishes, appended to
//! the [`crate::workout_store::WorkoutStore`] and never changed afterwards.
//! It is only removed when the user deletes it, matched by [`Workout::id`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Muscle groups a session can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Glutes,
    Core,
    Cardio,
    FullBody,
}

/// A completed workout session.
///
/// # Examples
///
/// ```rust
/// use chrono::Local;
/// use fitness_log_core::workout_model::{MuscleGroup, Workout};
/// use serde_json::json;
///
/// let workout = Workout::new(Local::now(), 45, vec![MuscleGroup::Chest, MuscleGroup::Triceps])
///     .with_exercises(json!([
///         {"name": "Bench press", "sets": 4, "reps": 8, "weight_kg": 80},
///         {"name": "Dips", "sets": 3, "reps": 12}
///     ]));
///
/// assert_eq!(workout.duration_minutes, 45);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Generated at creation; the only thing `remove` matches on.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// When the session took place.
    pub timestamp: DateTime<Local>,

    pub duration_minutes: u32,

    /// Should be non-empty. The store doesn't check; producers do.
    pub muscle_groups: Vec<MuscleGroup>,

    /// Free-form exercise details recorded by the UI.
    #[serde(default)]
    pub exercises: JsonValue,
}

impl Workout {
    pub fn new(timestamp: DateTime<Local>, duration_minutes: u32, muscle_groups: Vec<MuscleGroup>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            duration_minutes,
            muscle_groups,
            exercises: JsonValue::Null,
        }
    }

    pub fn with_exercises(mut self, exercises: JsonValue) -> Self {
        self.exercises = exercises;
        self
    }
}

/// Per-day workout statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutStats {
    /// Estimated sets: [`SETS_PER_WORKOUT`] per session, not a logged count.
    pub sets: u32,
    pub total_duration: u32,
    pub exercises: u32,
}

/// Placeholder multiplier behind [`WorkoutStats::sets`].
pub const SETS_PER_WORKOUT: u32 = 3;
