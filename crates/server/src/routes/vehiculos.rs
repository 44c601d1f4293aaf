use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use service::vehiculos::{self, NewVehiculo, VehiculoUpdate};

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct VehiculoFilter {
    pub subsector_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVehiculo {
    pub subsector_id: Uuid,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<VehiculoFilter>,
) -> Result<Json<Vec<models::vehiculo::Model>>, ApiError> {
    Ok(Json(vehiculos::list(&state.db, filter.subsector_id).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::vehiculo::Model>, ApiError> {
    Ok(Json(vehiculos::get(&state.db, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(input): Json<CreateVehiculo>,
) -> Result<(StatusCode, Json<models::vehiculo::Model>), ApiError> {
    current.ensure_can_write()?;
    let created = vehiculos::create(
        &state.db,
        input.subsector_id,
        NewVehiculo { placa: input.placa, marca: input.marca, modelo: input.modelo },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<VehiculoUpdate>,
) -> Result<Json<models::vehiculo::Model>, ApiError> {
    current.ensure_can_write()?;
    Ok(Json(vehiculos::update(&state.db, id, input).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    current.ensure_can_write()?;
    vehiculos::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
