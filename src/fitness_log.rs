use std::sync::Arc;

use log::info;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::local_db_state::AppDbState;
use crate::nutrition_store::NutritionStore;
use crate::persistence::{KeyValueSlots, SlotPersistence};
use crate::workout_store::WorkoutStore;

/// Both logs, opened together over one durable area.
///
/// Constructed once at startup and shared with the UI layer (directly, or
/// through the C ABI in the crate root).
pub struct FitnessLog {
    db: Option<Arc<AppDbState>>,
    pub workouts: WorkoutStore,
    pub nutrition: NutritionStore,
}

impl FitnessLog {
    /// Opens (or creates) the LMDB environment described by `config` and
    /// loads both logs from it.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let db = Arc::new(AppDbState::init(config)?);
        let slots: Arc<dyn KeyValueSlots> = db.clone();
        let mut log = Self::with_slots(slots, config);
        log.db = Some(db);
        info!("Fitness log ready at {}", config.path.display());
        Ok(log)
    }

    /// Loads both logs from any slot implementation, using the keys in
    /// `config`.
    pub fn with_slots(slots: Arc<dyn KeyValueSlots>, config: &StoreConfig) -> Self {
        Self {
            db: None,
            workouts: WorkoutStore::open(SlotPersistence::new(slots.clone(), config.workouts_key.as_str())),
            nutrition: NutritionStore::open(SlotPersistence::new(slots, config.nutrition_key.as_str())),
        }
    }

    /// Flushes the durable area, if there is one.
    pub fn close(&self) -> StoreResult<()> {
        match &self.db {
            Some(db) => db.close_database(),
            None => Ok(()),
        }
    }
}
