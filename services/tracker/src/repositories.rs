//! Repositories for database operations
//!
//! Handlers only ever see [`TrackerStore`]; which backend sits behind it is
//! decided once at startup by [`open_store`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{
    database::{DatabaseConfig, bootstrap_schema, init_pool},
    error::{DatabaseError, DatabaseResult},
};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    User,
    exercise::{Exercise, NewExercise},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryTrackerStore;
pub use postgres::PgTrackerStore;

/// Conjunction of conditions selecting a user's exercises
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub user_id: Uuid,
    /// Inclusive lower bound on `date`
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `date`
    pub to: Option<NaiveDate>,
    /// Maximum number of entries returned
    pub limit: Option<u64>,
    /// Set when a bound could not be parsed: nothing can match
    pub impossible: bool,
}

impl ExerciseFilter {
    /// Every exercise of `user_id`, uncapped
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            limit: None,
            impossible: false,
        }
    }

    /// Whether a single exercise satisfies the filter, ignoring `limit`
    pub fn matches(&self, exercise: &Exercise) -> bool {
        !self.impossible
            && exercise.user_id == self.user_id
            && self.from.is_none_or(|from| exercise.date >= from)
            && self.to.is_none_or(|to| exercise.date <= to)
    }
}

/// Persistence gateway over the user and exercise collections
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Insert a user; blank usernames are rejected
    async fn create_user(&self, username: &str) -> DatabaseResult<User>;

    /// All users in store order
    async fn list_users(&self) -> DatabaseResult<Vec<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Insert an exercise; blank descriptions are rejected
    async fn create_exercise(&self, exercise: &NewExercise) -> DatabaseResult<Exercise>;

    /// Exercises matching `filter`, in insertion order
    async fn find_exercises(&self, filter: &ExerciseFilter) -> DatabaseResult<Vec<Exercise>>;

    async fn health_check(&self) -> DatabaseResult<bool>;

    /// Release connections on shutdown
    async fn close(&self) {}
}

/// Open the store named by `config`
///
/// `memory:` URLs give a fresh in-process store; anything else is treated as a
/// PostgreSQL URL, connected and brought up to the current schema.
pub async fn open_store(config: &DatabaseConfig) -> DatabaseResult<Arc<dyn TrackerStore>> {
    if config.is_in_memory() {
        info!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryTrackerStore::new()));
    }

    let pool = init_pool(config).await?;
    bootstrap_schema(&pool, postgres::SCHEMA).await?;
    info!("Using PostgreSQL store");

    Ok(Arc::new(PgTrackerStore::new(pool)))
}

/// Shared write-side check mirroring a required-field constraint
pub(crate) fn require_text(field: &str, value: &str) -> DatabaseResult<()> {
    if value.trim().is_empty() {
        return Err(DatabaseError::Rejected(format!("{field} is required")));
    }
    Ok(())
}
