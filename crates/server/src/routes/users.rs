//! Administrative user management endpoints. The whole group sits behind
//! the admin gate in the router.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use service::users::{self, NewUser, UserStats, UserUpdate};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<models::user::Model>>, ApiError> {
    Ok(Json(users::list(&state.db).await?))
}

pub async fn stats(State(state): State<ServerState>) -> Result<Json<UserStats>, ApiError> {
    Ok(Json(users::stats(&state.db).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::user::Model>, ApiError> {
    Ok(Json(users::get(&state.db, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<models::user::Model>), ApiError> {
    let created = users::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UserUpdate>,
) -> Result<Json<models::user::Model>, ApiError> {
    Ok(Json(users::update(&state.db, current.id, id, input).await?))
}

pub async fn toggle_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<models::user::Model>, ApiError> {
    Ok(Json(users::toggle_status(&state.db, current.id, id).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    users::remove(&state.db, current.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
