//! The workout log.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

use crate::calendar::LocalDay;
use crate::observable::Observable;
use crate::persistence::SlotPersistence;
use crate::workout_model::{MuscleGroup, Workout, WorkoutStats, SETS_PER_WORKOUT};

/// Snapshot handed to subscribers after every change.
pub type WorkoutSnapshot = Arc<Vec<Workout>>;

/// Owns every [`Workout`] for the lifetime of the session and keeps the
/// durable slot in step with it.
///
/// All mutations are serialized through one lock that is held across the
/// in-memory update, the slot rewrite and the notification, so subscribers
/// and the slot observe changes in the order they were made. Nothing here
/// returns an error: persistence is best-effort and misses are no-ops.
pub struct WorkoutStore {
    workouts: Mutex<Vec<Workout>>,
    persistence: SlotPersistence<Vec<Workout>>,
    changes: Observable<WorkoutSnapshot>,
}

impl WorkoutStore {
    /// Loads the stored collection, or starts empty on first run.
    pub fn open(persistence: SlotPersistence<Vec<Workout>>) -> Self {
        let workouts = persistence.load();
        info!("Loaded {} workouts from slot '{}'", workouts.len(), persistence.key());

        Self {
            changes: Observable::new(Arc::new(workouts.clone())),
            workouts: Mutex::new(workouts),
            persistence,
        }
    }

    /// Appends `workout`. A workout already holding the same id is replaced
    /// in place, so ids stay unique and a resubmitted record isn't counted
    /// twice.
    pub fn add(&self, workout: Workout) {
        let mut workouts = self.workouts.lock();
        match workouts.iter_mut().find(|existing| existing.id == workout.id) {
            Some(existing) => {
                debug!("Replacing workout {} at {}", workout.id, workout.timestamp);
                *existing = workout;
            }
            None => {
                debug!("Adding workout {} at {}", workout.id, workout.timestamp);
                workouts.push(workout);
            }
        }
        self.commit(&workouts);
    }

    /// Removes the workout with `id`, returning whether one was there.
    /// Unknown ids are ignored.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut workouts = self.workouts.lock();
        let Some(index) = workouts.iter().position(|workout| workout.id == id) else {
            debug!("No workout with id {id}; nothing to remove");
            return false;
        };
        workouts.remove(index);
        self.commit(&workouts);
        true
    }

    /// Workouts on the local day `day`, most recent first.
    pub fn records_on_date(&self, day: impl Into<LocalDay>) -> Vec<Workout> {
        let day = day.into();
        let mut records: Vec<Workout> = self
            .workouts
            .lock()
            .iter()
            .filter(|workout| day.contains(&workout.timestamp))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Muscle groups of every workout on `day`, repeats included, in
    /// [`WorkoutStore::records_on_date`] order.
    pub fn muscle_groups_on_date(&self, day: impl Into<LocalDay>) -> Vec<MuscleGroup> {
        self.records_on_date(day)
            .into_iter()
            .flat_map(|workout| workout.muscle_groups)
            .collect()
    }

    pub fn stats_for_date(&self, day: impl Into<LocalDay>) -> WorkoutStats {
        let records = self.records_on_date(day);
        let exercises = records.len() as u32;
        let total_duration = records
            .iter()
            .fold(0u32, |total, workout| total.saturating_add(workout.duration_minutes));

        WorkoutStats {
            sets: exercises.saturating_mul(SETS_PER_WORKOUT),
            total_duration,
            exercises,
        }
    }

    pub fn todays_records(&self) -> Vec<Workout> {
        self.records_on_date(LocalDay::today())
    }

    /// Every workout, in insertion order.
    pub fn all(&self) -> Vec<Workout> {
        self.workouts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.workouts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.lock().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkoutSnapshot> {
        self.changes.subscribe()
    }

    fn commit(&self, workouts: &MutexGuard<'_, Vec<Workout>>) {
        self.persistence.save(workouts);
        self.changes.publish(Arc::new(workouts.to_vec()));
    }
}
