//! Tracker service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dates,
    error::{ApiError, ApiResult},
    extract::JsonOrForm,
    log_query::{self, LogQueryParams},
    models::{
        CreateUserRequest, User, UserResponse,
        exercise::{CreateExerciseRequest, ExerciseResponse, LogResponse},
    },
    repositories::TrackerStore,
    state::AppState,
};

/// Create the router for the tracker service
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let api_routes = Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id/exercises", post(create_exercise))
        .route("/users/:id/logs", get(get_logs));

    Router::new()
        .route_service("/", ServeFile::new(&config.index_file))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            error!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_ok { "ok" } else { "degraded" },
            "service": "tracker",
        })),
    )
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let username = payload.username.unwrap_or_default();
    let user = state.store.create_user(username.trim()).await?;

    info!("Created user {} ({})", user.username, user.id);
    Ok(Json(UserResponse::from(user)))
}

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Record an exercise for a user
pub async fn create_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(payload): JsonOrForm<CreateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    let user = find_user(state.store.as_ref(), &id).await?;

    let new_exercise = payload.into_new_exercise(user.id, dates::today())?;
    let exercise = state.store.create_exercise(&new_exercise).await?;

    info!(
        "Recorded exercise {} for user {} on {}",
        exercise.id, user.id, exercise.date
    );
    Ok(Json(ExerciseResponse::new(&user, &exercise)))
}

/// Get a user's exercise log
pub async fn get_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LogQueryParams>,
) -> ApiResult<Json<LogResponse>> {
    let user = find_user(state.store.as_ref(), &id).await?;
    let log = log_query::fetch_log(state.store.as_ref(), &user, &params).await?;

    Ok(Json(log))
}

/// Resolve the `:id` path segment to an existing user
async fn find_user(store: &dyn TrackerStore, raw_id: &str) -> ApiResult<User> {
    let id = Uuid::parse_str(raw_id.trim()).map_err(|_| ApiError::InvalidId(raw_id.to_string()))?;

    store.find_user_by_id(id).await?.ok_or(ApiError::NotFound)
}
