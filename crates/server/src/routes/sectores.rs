use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use service::hierarchy::{self, CascadeReport, SectorDetail};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct SectorPayload {
    pub nombre: String,
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<models::sector::Model>>, ApiError> {
    Ok(Json(hierarchy::list_sectores(&state.db).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(input): Json<SectorPayload>,
) -> Result<(StatusCode, Json<models::sector::Model>), ApiError> {
    current.ensure_can_write()?;
    let created = hierarchy::create_sector(&state.db, &input.nombre, Some(current.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SectorDetail>, ApiError> {
    Ok(Json(hierarchy::get_sector_with_children(&state.db, id).await?))
}

pub async fn rename(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<SectorPayload>,
) -> Result<Json<models::sector::Model>, ApiError> {
    current.ensure_can_write()?;
    Ok(Json(hierarchy::rename_sector(&state.db, id, &input.nombre).await?))
}

/// Deletes the sector and everything underneath it in one transaction.
pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CascadeReport>, ApiError> {
    current.ensure_can_write()?;
    Ok(Json(hierarchy::delete_sector(&state.db, id).await?))
}
