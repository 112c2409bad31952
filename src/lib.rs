//! # Fitness Log Core
//!
//! Local data layer for a fitness-tracking app: a workout log and a daily
//! nutrition log, each an in-memory collection indexed by local calendar day
//! and rewritten in full to an LMDB slot on every change. Designed to be
//! embedded in a mobile app through a C ABI, or used directly from Rust.
//!
//! ## Features
//!
//! - **Day-indexed queries**: workouts and meals per local calendar day
//! - **Derived totals**: per-day calories and macros, always recomputed from the meals
//! - **Best-effort persistence**: a failed write never fails the caller; the next change rewrites everything
//! - **Change subscriptions**: every store publishes its latest snapshot on a watch channel
//! - **FFI-optimized**: JSON in, JSON envelope out
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::{Local, NaiveDate};
//! use fitness_log_core::config::StoreConfig;
//! use fitness_log_core::fitness_log::FitnessLog;
//! use fitness_log_core::nutrition_model::Meal;
//! use fitness_log_core::workout_model::{MuscleGroup, Workout};
//!
//! let log = FitnessLog::open(&StoreConfig::named("athlete"))?;
//!
//! log.workouts.add(Workout::new(Local::now(), 30, vec![MuscleGroup::Legs]));
//! let today = log.workouts.todays_records();
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! log.nutrition.add_meal(Meal::new("Oats", 500, 30, 50, 10), day);
//! assert_eq!(log.nutrition.total_calories_for_date(day), 500);
//! # Ok::<(), fitness_log_core::error::StoreError>(())
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_db`] / [`close_database`] / [`destroy_db`] - Lifecycle
//! - [`add_workout`], [`remove_workout`] - Workout writes
//! - [`workouts_on_date`], [`muscle_groups_on_date`], [`workout_stats_for_date`], [`get_all_workouts`] - Workout reads
//! - [`add_meal`], [`remove_meal`] - Nutrition writes
//! - [`nutrition_for_date`], [`meals_for_date`], [`total_calories_for_date`] - Nutrition reads
//! - [`free_response`] - Release a string returned by any of the above

pub mod app_response;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fitness_log;
pub mod local_db_state;
pub mod nutrition_model;
pub mod nutrition_store;
pub mod observable;
pub mod persistence;
pub mod workout_model;
pub mod workout_store;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use uuid::Uuid;

use crate::app_response::AppResponse;
use crate::calendar::LocalDay;
use crate::config::StoreConfig;
use crate::fitness_log::FitnessLog;
use crate::nutrition_model::Meal;
use crate::workout_model::Workout;

/// Opens (or creates) the fitness log database with the specified name.
///
/// The database lives in a directory called `<name>.lmdb`. Both logs are
/// loaded before this returns; an empty or unreadable slot loads as an
/// empty log.
///
/// # Returns
///
/// A pointer to the [`FitnessLog`] on success, or null on failure. Release
/// it with [`destroy_db`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use fitness_log_core::create_db;
///
/// let name = CString::new("athlete").unwrap();
/// let log = create_db(name.as_ptr());
///
/// if !log.is_null() {
///     // Database opened successfully
/// }
/// ```
///
/// # Errors
///
/// Returns null pointer if:
/// - Input name pointer is null
/// - Input string contains invalid UTF-8
/// - The LMDB environment cannot be opened
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db(name: *const c_char) -> *mut FitnessLog {
    if name.is_null() {
        warn!("Null name pointer passed to create_db");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    let config = StoreConfig::named(name_str);
    info!("Attempting to open fitness log at: {}", config.path.display());

    match FitnessLog::open(&config) {
        Ok(log) => {
            info!("✅ Fitness log initialized successfully");
            Box::into_raw(Box::new(log))
        }
        Err(e) => {
            warn!("❌ Failed to initialize fitness log: {e}");
            warn!("Attempted path: {}", config.path.display());
            std::ptr::null_mut()
        }
    }
}

/// Logs a completed workout.
///
/// # JSON Format
///
/// ```json
/// {
///   "timestamp": "2024-01-01T08:00:00+01:00",
///   "duration_minutes": 30,
///   "muscle_groups": ["legs"],
///   "exercises": [{"name": "Squat", "sets": 5, "reps": 5}]
/// }
/// ```
///
/// `id` may be supplied; otherwise one is generated. Submitting an id that
/// is already logged replaces that workout. The response carries the stored
/// workout, including its id.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn add_workout(log: *mut FitnessLog, json_ptr: *const c_char) -> *const c_char {
    let log = match log_ref(log, "add_workout") {
        Ok(log) => log,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let workout: Workout = match serde_json::from_str(&json_str) {
        Ok(w) => w,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid workout JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let response = AppResponse::json(&workout);
    log.workouts.add(workout);
    response_to_c_string(&response)
}

/// Deletes the workout with the given id.
///
/// An id that matches nothing is not an error: the log is left unchanged
/// and the call still succeeds. Only a malformed id is rejected.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn remove_workout(log: *mut FitnessLog, id: *const c_char) -> *const c_char {
    let log = match log_ref(log, "remove_workout") {
        Ok(log) => log,
        Err(err) => return err,
    };

    let id = match parse_id(id) {
        Ok(id) => id,
        Err(err) => return err,
    };

    let message = if log.workouts.remove(id) {
        format!("Workout {id} removed")
    } else {
        format!("No workout with id {id}; nothing removed")
    };
    response_to_c_string(&AppResponse::success(message))
}

/// Workouts on a local day, most recent first, as a JSON array.
///
/// `date` is `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// ```no_run
/// use std::ffi::CString;
/// use fitness_log_core::{create_db, workouts_on_date};
///
/// let name = CString::new("athlete").unwrap();
/// let log = create_db(name.as_ptr());
///
/// let date = CString::new("2024-01-01").unwrap();
/// let result = workouts_on_date(log, date.as_ptr());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn workouts_on_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "workouts_on_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.workouts.records_on_date(day)))
}

/// Muscle groups worked on a local day, repeats included.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn muscle_groups_on_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "muscle_groups_on_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.workouts.muscle_groups_on_date(day)))
}

/// `{"sets": .., "total_duration": .., "exercises": ..}` for a local day.
///
/// `sets` is an estimate (three per workout), not a logged count.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn workout_stats_for_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "workout_stats_for_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.workouts.stats_for_date(day)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_all_workouts(log: *mut FitnessLog) -> *const c_char {
    let log = match log_ref(log, "get_all_workouts") {
        Ok(log) => log,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.workouts.all()))
}

/// Logs a meal on a local day and returns that day's updated nutrition.
///
/// # JSON Format
///
/// ```json
/// {
///   "name": "Chicken and rice",
///   "kind": "lunch",
///   "calories": 650,
///   "protein": 45,
///   "carbs": 70,
///   "fat": 15
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn add_meal(log: *mut FitnessLog, json_ptr: *const c_char, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "add_meal") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let meal: Meal = match serde_json::from_str(&json_str) {
        Ok(m) => m,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid meal JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    log.nutrition.add_meal(meal, day);
    response_to_c_string(&AppResponse::json(&log.nutrition.nutrition_for(day)))
}

/// Deletes a meal by id. Unknown ids are a successful no-op.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn remove_meal(log: *mut FitnessLog, id: *const c_char) -> *const c_char {
    let log = match log_ref(log, "remove_meal") {
        Ok(log) => log,
        Err(err) => return err,
    };

    let id = match parse_id(id) {
        Ok(id) => id,
        Err(err) => return err,
    };

    let message = if log.nutrition.remove_meal(id) {
        format!("Meal {id} removed")
    } else {
        format!("No meal with id {id}; nothing removed")
    };
    response_to_c_string(&AppResponse::success(message))
}

/// The nutrition bucket for a local day. Days with nothing logged come back
/// as a zero-valued bucket, never as `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn nutrition_for_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "nutrition_for_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.nutrition.nutrition_for(day)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn meals_for_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "meals_for_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.nutrition.meals_for(day)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn total_calories_for_date(log: *mut FitnessLog, date: *const c_char) -> *const c_char {
    let (log, day) = match log_and_day(log, date, "total_calories_for_date") {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    response_to_c_string(&AppResponse::json(&log.nutrition.total_calories_for_date(day)))
}

/// Flushes the database to disk.
///
/// Useful before a Flutter hot restart or app shutdown. The handle stays
/// valid; free it with [`destroy_db`] when done.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_database(log: *mut FitnessLog) -> *const c_char {
    let log = match log_ref(log, "close_database") {
        Ok(log) => log,
        Err(err) => return err,
    };

    match log.close() {
        Ok(()) => response_to_c_string(&AppResponse::success("Database connection closed successfully")),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Releases a handle returned by [`create_db`]. Null is ignored.
///
/// # Safety
///
/// `log` must come from [`create_db`] and must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn destroy_db(log: *mut FitnessLog) {
    if log.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(log) });
    info!("Fitness log handle released");
}

/// Releases a string returned by any function in this module. Null is
/// ignored.
///
/// # Safety
///
/// `ptr` must come from this library and must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

/// Converts an [`AppResponse`] to a C-compatible string.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String.
///
/// On failure the `Err` side already holds the error envelope, ready to be
/// returned to the FFI caller.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn log_ref<'a>(log: *mut FitnessLog, fn_name: &str) -> Result<&'a FitnessLog, *const c_char> {
    match unsafe { log.as_ref() } {
        Some(log) => Ok(log),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn log_and_day<'a>(
    log: *mut FitnessLog,
    date: *const c_char,
    fn_name: &str,
) -> Result<(&'a FitnessLog, LocalDay), *const c_char> {
    let log = log_ref(log, fn_name)?;
    let date_str = c_ptr_to_string(date, "date")?;
    match LocalDay::parse(&date_str) {
        Ok(day) => Ok((log, day)),
        Err(e) => Err(response_to_c_string(&AppResponse::from(e))),
    }
}

fn parse_id(id: *const c_char) -> Result<Uuid, *const c_char> {
    let id_str = c_ptr_to_string(id, "id")?;
    Uuid::parse_str(id_str.trim()).map_err(|e| {
        let error = AppResponse::BadRequest(format!("Invalid id '{id_str}': {e}"));
        response_to_c_string(&error)
    })
}
