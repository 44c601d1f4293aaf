use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use service::hierarchy::{self, CascadeReport, SubsectorDetail};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct NewSubsector {
    pub nombre: String,
    pub sector_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RenameSubsector {
    pub nombre: String,
}

#[derive(Debug, Deserialize)]
pub struct SubsectorFilter {
    pub sector_id: Option<Uuid>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<SubsectorFilter>,
) -> Result<Json<Vec<models::subsector::Model>>, ApiError> {
    Ok(Json(hierarchy::list_subsectores(&state.db, filter.sector_id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(input): Json<NewSubsector>,
) -> Result<(StatusCode, Json<models::subsector::Model>), ApiError> {
    current.ensure_can_write()?;
    let created = hierarchy::create_subsector(&state.db, &input.nombre, input.sector_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubsectorDetail>, ApiError> {
    Ok(Json(hierarchy::get_subsector_with_children(&state.db, id).await?))
}

pub async fn rename(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<RenameSubsector>,
) -> Result<Json<models::subsector::Model>, ApiError> {
    current.ensure_can_write()?;
    Ok(Json(hierarchy::rename_subsector(&state.db, id, &input.nombre).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CascadeReport>, ApiError> {
    current.ensure_can_write()?;
    Ok(Json(hierarchy::delete_subsector(&state.db, id).await?))
}
