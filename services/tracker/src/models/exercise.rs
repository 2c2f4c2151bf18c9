//! Exercise models for the tracker service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use super::{User, text_or_number};
use crate::{
    dates,
    error::{ApiError, ApiResult},
};

/// Exercise log entry as stored
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    /// Minutes; stored as given, fractional, zero and negative included
    pub duration: f64,
    pub date: NaiveDate,
}

/// Exercise creation payload handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub user_id: Uuid,
    pub description: String,
    pub duration: f64,
    pub date: NaiveDate,
}

/// Request body for exercise creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateExerciseRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub date: Option<String>,
}

impl CreateExerciseRequest {
    /// Turn the raw body into a storable exercise for `user_id`
    ///
    /// A missing or blank date falls back to `today`; a date that is present
    /// but unparseable is rejected with `Invalid Date`.
    pub fn into_new_exercise(self, user_id: Uuid, today: NaiveDate) -> ApiResult<NewExercise> {
        let duration = match self.duration.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_duration(raw)?,
            _ => return Err(ApiError::Validation("duration is required".to_string())),
        };

        let date = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => dates::parse_date(raw)
                .ok_or_else(|| ApiError::Validation("Invalid Date".to_string()))?,
            _ => today,
        };

        Ok(NewExercise {
            user_id,
            description: self.description.unwrap_or_default(),
            duration,
            date,
        })
    }
}

/// Minutes as a finite number; `inf`, `NaN` and overflowing text are rejected
fn parse_duration(raw: &str) -> ApiResult<f64> {
    match raw.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() => Ok(minutes),
        _ => Err(ApiError::Validation(format!(
            "duration must be a number of minutes, got {raw:?}"
        ))),
    }
}

/// Integral minutes go out as JSON integers (`30`, not `30.0`)
fn serialize_minutes<S>(minutes: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const EXACT: f64 = 9_007_199_254_740_992.0;

    if minutes.fract() == 0.0 && minutes.abs() <= EXACT {
        serializer.serialize_i64(*minutes as i64)
    } else {
        serializer.serialize_f64(*minutes)
    }
}

/// Response for exercise creation
///
/// `_id` echoes the owning user's id, not the new exercise's.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseResponse {
    pub username: String,
    pub description: String,
    #[serde(serialize_with = "serialize_minutes")]
    pub duration: f64,
    pub date: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

impl ExerciseResponse {
    pub fn new(user: &User, exercise: &Exercise) -> Self {
        Self {
            username: user.username.clone(),
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: dates::to_calendar_string(exercise.date),
            id: user.id,
        }
    }
}

/// One line of a user's log
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub description: String,
    #[serde(serialize_with = "serialize_minutes")]
    pub duration: f64,
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: dates::to_calendar_string(exercise.date),
        }
    }
}

/// Response for log queries
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub log: Vec<LogEntry>,
}

impl LogResponse {
    pub fn new(user: &User, exercises: Vec<Exercise>) -> Self {
        let log: Vec<LogEntry> = exercises.into_iter().map(LogEntry::from).collect();
        Self {
            username: user.username.clone(),
            count: log.len(),
            id: user.id,
            log,
        }
    }
}
