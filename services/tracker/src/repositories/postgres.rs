//! PostgreSQL store

use async_trait::async_trait;
use common::{database, error::DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{ExerciseFilter, TrackerStore, require_text};
use crate::models::{
    User,
    exercise::{Exercise, NewExercise},
};

/// Idempotent schema for the tracker tables
///
/// `seq` keeps insertion order, which is the order logs are returned in.
/// `exercises.user_id` deliberately has no foreign key. The `ALTER` upgrades
/// tables created while `duration` was still `BIGINT`.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        username TEXT NOT NULL CHECK (username <> '')
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exercises (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        user_id UUID NOT NULL,
        description TEXT NOT NULL CHECK (description <> ''),
        duration DOUBLE PRECISION NOT NULL,
        date DATE NOT NULL
    )
    "#,
    "ALTER TABLE exercises ALTER COLUMN duration TYPE DOUBLE PRECISION",
    "CREATE INDEX IF NOT EXISTS exercises_user_date_idx ON exercises (user_id, date)",
];

/// Tracker store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgTrackerStore {
    pool: PgPool,
}

impl PgTrackerStore {
    /// Create a new store over an initialised pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the log query for `filter`
    fn exercise_query(filter: &ExerciseFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT id, user_id, description, duration, date FROM exercises WHERE user_id = ",
        );
        builder.push_bind(filter.user_id);

        if let Some(from) = filter.from {
            builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            builder.push(" AND date <= ").push_bind(to);
        }

        builder.push(" ORDER BY seq");

        if let Some(limit) = filter.limit {
            builder
                .push(" LIMIT ")
                .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        builder
    }
}

#[async_trait]
impl TrackerStore for PgTrackerStore {
    async fn create_user(&self, username: &str) -> DatabaseResult<User> {
        require_text("username", username)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            RETURNING id, username
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted user {}", user.id);
        Ok(user)
    }

    async fn list_users(&self) -> DatabaseResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, username FROM users ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn find_user_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_exercise(&self, exercise: &NewExercise) -> DatabaseResult<Exercise> {
        require_text("description", &exercise.description)?;

        let stored = sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (id, user_id, description, duration, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, description, duration, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(exercise.user_id)
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted exercise {} for user {}", stored.id, stored.user_id);
        Ok(stored)
    }

    async fn find_exercises(&self, filter: &ExerciseFilter) -> DatabaseResult<Vec<Exercise>> {
        if filter.impossible {
            return Ok(Vec::new());
        }

        let mut query = Self::exercise_query(filter);
        let exercises = query
            .build_query_as::<Exercise>()
            .fetch_all(&self.pool)
            .await?;

        Ok(exercises)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        database::health_check(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_exercise_query_without_bounds() {
        let query = PgTrackerStore::exercise_query(&ExerciseFilter::for_user(Uuid::new_v4()));

        assert_eq!(
            query.sql(),
            "SELECT id, user_id, description, duration, date FROM exercises WHERE user_id = $1 ORDER BY seq"
        );
    }

    #[test]
    fn test_exercise_query_with_every_condition() {
        let filter = ExerciseFilter {
            from: NaiveDate::from_ymd_opt(2023, 1, 1),
            to: NaiveDate::from_ymd_opt(2023, 1, 31),
            limit: Some(5),
            ..ExerciseFilter::for_user(Uuid::new_v4())
        };
        let query = PgTrackerStore::exercise_query(&filter);

        assert!(query.sql().ends_with(
            "WHERE user_id = $1 AND date >= $2 AND date <= $3 ORDER BY seq LIMIT $4"
        ));
    }

    #[test]
    fn test_exercise_query_upper_bound_only() {
        let filter = ExerciseFilter {
            to: NaiveDate::from_ymd_opt(2023, 1, 31),
            ..ExerciseFilter::for_user(Uuid::new_v4())
        };
        let query = PgTrackerStore::exercise_query(&filter);

        assert!(query.sql().ends_with("WHERE user_id = $1 AND date <= $2 ORDER BY seq"));
    }
}
