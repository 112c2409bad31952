//! The nutrition log: one [`DailyNutrition`] bucket per local day.

use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

use crate::calendar::LocalDay;
use crate::nutrition_model::{DailyNutrition, Meal};
use crate::observable::Observable;
use crate::persistence::SlotPersistence;

pub type NutritionSnapshot = Arc<Vec<DailyNutrition>>;

/// Owns the daily buckets and keeps the durable slot in step with them.
///
/// Uses the same single-writer discipline as
/// [`crate::workout_store::WorkoutStore`]. Buckets are created lazily by
/// [`NutritionStore::add_meal`] and never deleted; a day never has more than
/// one bucket.
pub struct NutritionStore {
    days: Mutex<Vec<DailyNutrition>>,
    persistence: SlotPersistence<Vec<DailyNutrition>>,
    changes: Observable<NutritionSnapshot>,
}

impl NutritionStore {
    pub fn open(persistence: SlotPersistence<Vec<DailyNutrition>>) -> Self {
        let days = merge_duplicate_days(persistence.load());
        info!("Loaded {} nutrition days from slot '{}'", days.len(), persistence.key());

        Self {
            changes: Observable::new(Arc::new(days.clone())),
            days: Mutex::new(days),
            persistence,
        }
    }

    /// Logs `meal` on `day`, creating the day's bucket if needed.
    ///
    /// A meal already logged under the same id is taken out of its bucket
    /// first, so each id appears once and a resubmitted meal isn't counted
    /// twice.
    pub fn add_meal(&self, meal: Meal, day: impl Into<LocalDay>) {
        let day = day.into();
        let mut days = self.days.lock();
        if days.iter_mut().find_map(|bucket| bucket.remove_meal(meal.id)).is_some() {
            debug!("Replacing meal {} on {day}", meal.id);
        } else {
            debug!("Adding meal {} on {day}", meal.id);
        }

        match days.iter_mut().find(|bucket| bucket.day() == day) {
            Some(bucket) => bucket.push_meal(meal),
            None => days.push(DailyNutrition::with_meal(day, meal)),
        }
        self.commit(&days);
    }

    /// Removes the meal with `id` from whichever day holds it. The bucket
    /// stays, with its totals recomputed. Returns whether a meal was removed;
    /// unknown ids are ignored.
    pub fn remove_meal(&self, id: Uuid) -> bool {
        let mut days = self.days.lock();
        let removed = days.iter_mut().find_map(|bucket| bucket.remove_meal(id));
        if removed.is_none() {
            debug!("No meal with id {id}; nothing to remove");
            return false;
        }
        self.commit(&days);
        true
    }

    /// The bucket for `day`, or an unsaved zero-valued bucket.
    pub fn nutrition_for(&self, day: impl Into<LocalDay>) -> DailyNutrition {
        let day = day.into();
        self.days
            .lock()
            .iter()
            .find(|bucket| bucket.day() == day)
            .cloned()
            .unwrap_or_else(|| DailyNutrition::empty(day))
    }

    pub fn meals_for(&self, day: impl Into<LocalDay>) -> Vec<Meal> {
        let day = day.into();
        self.days
            .lock()
            .iter()
            .find(|bucket| bucket.day() == day)
            .map(|bucket| bucket.meals().to_vec())
            .unwrap_or_default()
    }

    pub fn total_calories_for_date(&self, day: impl Into<LocalDay>) -> u32 {
        self.nutrition_for(day).total_calories()
    }

    pub fn todays_total_calories(&self) -> u32 {
        self.nutrition_for(LocalDay::today()).total_calories()
    }

    pub fn todays_total_protein(&self) -> u32 {
        self.nutrition_for(LocalDay::today()).total_protein()
    }

    pub fn todays_total_carbs(&self) -> u32 {
        self.nutrition_for(LocalDay::today()).total_carbs()
    }

    pub fn todays_total_fat(&self) -> u32 {
        self.nutrition_for(LocalDay::today()).total_fat()
    }

    /// Every bucket, in the order the days were first logged.
    pub fn all(&self) -> Vec<DailyNutrition> {
        self.days.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NutritionSnapshot> {
        self.changes.subscribe()
    }

    fn commit(&self, days: &MutexGuard<'_, Vec<DailyNutrition>>) {
        self.persistence.save(days);
        self.changes.publish(Arc::new(days.to_vec()));
    }
}

/// Folds buckets that share a day into the first one seen, so data written
/// by anything that broke the one-bucket-per-day rule still loads cleanly.
fn merge_duplicate_days(stored: Vec<DailyNutrition>) -> Vec<DailyNutrition> {
    let mut days: Vec<DailyNutrition> = Vec::with_capacity(stored.len());
    for bucket in stored {
        match days.iter_mut().find(|existing| existing.day() == bucket.day()) {
            Some(existing) => {
                warn!("Merging duplicate nutrition bucket for {}", bucket.day());
                for meal in bucket.meals() {
                    existing.push_meal(meal.clone());
                }
            }
            None => days.push(bucket),
        }
    }
    days
}
