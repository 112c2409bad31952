//! Meal records and the per-day buckets that aggregate them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::LocalDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

/// A logged meal. Macros are whole grams, calories whole kcal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub kind: MealKind,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl Meal {
    pub fn new(name: impl Into<String>, calories: u32, protein: u32, carbs: u32, fat: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: MealKind::default(),
            calories,
            protein,
            carbs,
            fat,
        }
    }

    pub fn with_kind(mut self, kind: MealKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Everything eaten on one local calendar day.
///
/// The four totals are a materialized view over `meals`. They are private
/// and only ever written by recomputing them from scratch, which every
/// mutation (and decoding from storage) runs, so they always equal the sums
/// over the current meals.
///
/// ```rust
/// use chrono::NaiveDate;
/// use fitness_log_core::nutrition_model::{DailyNutrition, Meal};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut bucket = DailyNutrition::empty(day.into());
/// bucket.push_meal(Meal::new("Oats", 500, 30, 50, 10));
/// bucket.push_meal(Meal::new("Salad", 300, 20, 20, 5));
///
/// assert_eq!(bucket.total_calories(), 800);
/// assert_eq!(bucket.meals().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDailyNutrition")]
pub struct DailyNutrition {
    id: Uuid,
    date: NaiveDate,
    meals: Vec<Meal>,
    total_calories: u32,
    total_protein: u32,
    total_carbs: u32,
    total_fat: u32,
}

impl DailyNutrition {
    /// A zero-valued bucket for `day` holding no meals.
    pub fn empty(day: LocalDay) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: day.date(),
            meals: Vec::new(),
            total_calories: 0,
            total_protein: 0,
            total_carbs: 0,
            total_fat: 0,
        }
    }

    /// A new bucket for `day` holding only `meal`.
    pub fn with_meal(day: LocalDay, meal: Meal) -> Self {
        let mut bucket = Self::empty(day);
        bucket.push_meal(meal);
        bucket
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn day(&self) -> LocalDay {
        LocalDay::new(self.date)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Meals in the order they were logged.
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn total_calories(&self) -> u32 {
        self.total_calories
    }

    pub fn total_protein(&self) -> u32 {
        self.total_protein
    }

    pub fn total_carbs(&self) -> u32 {
        self.total_carbs
    }

    pub fn total_fat(&self) -> u32 {
        self.total_fat
    }

    pub fn push_meal(&mut self, meal: Meal) {
        self.meals.push(meal);
        self.recompute_totals();
    }

    /// Removes the meal with `id`, returning it if it was in this bucket.
    pub fn remove_meal(&mut self, id: Uuid) -> Option<Meal> {
        let index = self.meals.iter().position(|meal| meal.id == id)?;
        let removed = self.meals.remove(index);
        self.recompute_totals();
        Some(removed)
    }

    /// Rebuilds every total from the meal list. Never adjusted incrementally.
    fn recompute_totals(&mut self) {
        let (calories, protein, carbs, fat) = self.meals.iter().fold((0u32, 0u32, 0u32, 0u32), |acc, meal| {
            (
                acc.0.saturating_add(meal.calories),
                acc.1.saturating_add(meal.protein),
                acc.2.saturating_add(meal.carbs),
                acc.3.saturating_add(meal.fat),
            )
        });
        self.total_calories = calories;
        self.total_protein = protein;
        self.total_carbs = carbs;
        self.total_fat = fat;
    }
}

/// On-disk shape of a bucket. Stored totals are accepted for compatibility
/// but recomputed from the meals.
#[derive(Deserialize)]
struct StoredDailyNutrition {
    id: Uuid,
    date: NaiveDate,
    #[serde(default)]
    meals: Vec<Meal>,
}

impl From<StoredDailyNutrition> for DailyNutrition {
    fn from(stored: StoredDailyNutrition) -> Self {
        let mut bucket = Self {
            id: stored.id,
            date: stored.date,
            meals: stored.meals,
            total_calories: 0,
            total_protein: 0,
            total_carbs: 0,
            total_fat: 0,
        };
        bucket.recompute_totals();
        bucket
    }
}
