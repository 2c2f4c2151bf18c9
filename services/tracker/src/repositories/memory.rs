//! In-process store
//!
//! Keeps users and exercises in insertion order behind a single lock. Used
//! when `DATABASE_URL` is `memory://` and by the test suite.

use async_trait::async_trait;
use common::error::DatabaseResult;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{ExerciseFilter, TrackerStore, require_text};
use crate::models::{
    User,
    exercise::{Exercise, NewExercise},
};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    exercises: Vec<Exercise>,
}

/// Tracker store that lives and dies with the process
#[derive(Default)]
pub struct MemoryTrackerStore {
    state: RwLock<MemoryState>,
}

impl MemoryTrackerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackerStore for MemoryTrackerStore {
    async fn create_user(&self, username: &str) -> DatabaseResult<User> {
        require_text("username", username)?;

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
        };
        self.state.write().await.users.push(user.clone());

        debug!("Inserted user {}", user.id);
        Ok(user)
    }

    async fn list_users(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn find_user_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn create_exercise(&self, exercise: &NewExercise) -> DatabaseResult<Exercise> {
        require_text("description", &exercise.description)?;

        let stored = Exercise {
            id: Uuid::new_v4(),
            user_id: exercise.user_id,
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: exercise.date,
        };
        self.state.write().await.exercises.push(stored.clone());

        debug!("Inserted exercise {} for user {}", stored.id, stored.user_id);
        Ok(stored)
    }

    async fn find_exercises(&self, filter: &ExerciseFilter) -> DatabaseResult<Vec<Exercise>> {
        let state = self.state.read().await;
        let cap = filter
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(state
            .exercises
            .iter()
            .filter(|exercise| filter.matches(exercise))
            .take(cap)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(true)
    }
}
