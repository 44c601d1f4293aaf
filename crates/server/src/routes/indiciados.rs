//! Indiciado endpoints. Create and update accept multipart form data so
//! the record fields and the photo travel in one request.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use models::indiciado::NewIndiciado;
use service::indiciados::{self, IndiciadoUpdate};
use service::pagination::PageRequest;

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};
use crate::uploads;

#[derive(Debug, Deserialize)]
pub struct IndiciadoFilter {
    pub subsector_id: Option<Uuid>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Multipart fields shared by create and update.
#[derive(Default)]
struct IndiciadoForm {
    nombres: Option<String>,
    apellidos: Option<String>,
    cedula: Option<String>,
    alias: Option<String>,
    observaciones: Option<String>,
    subsector_id: Option<Uuid>,
    foto_url: Option<String>,
}

async fn read_form(state: &ServerState, mut multipart: Multipart) -> Result<IndiciadoForm, ApiError> {
    let mut form = IndiciadoForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "foto" => {
                let original = field.file_name().unwrap_or("foto").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("cannot read foto field: {e}")))?;
                let stored = uploads::store(&state.uploads_dir, &original, &bytes).await?;
                form.foto_url = Some(stored.url);
            }
            "subsector_id" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("cannot read field {name}: {e}")))?;
                let id = Uuid::parse_str(raw.trim())
                    .map_err(|_| ApiError::Validation("subsector_id must be a uuid".into()))?;
                form.subsector_id = Some(id);
            }
            "nombres" | "apellidos" | "cedula" | "alias" | "observaciones" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("cannot read field {name}: {e}")))?;
                match name.as_str() {
                    "nombres" => form.nombres = Some(value),
                    "apellidos" => form.apellidos = Some(value),
                    "cedula" => form.cedula = Some(value),
                    "alias" => form.alias = Some(value),
                    _ => form.observaciones = Some(value),
                }
            }
            // unknown fields are ignored so clients can evolve first
            _ => {}
        }
    }
    Ok(form)
}

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<IndiciadoFilter>,
) -> Result<Json<Vec<models::indiciado::Model>>, ApiError> {
    let page = PageRequest { offset: filter.offset, limit: filter.limit };
    Ok(Json(indiciados::list(&state.db, filter.subsector_id, page).await?))
}

pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<models::indiciado::Model>>, ApiError> {
    let page = PageRequest { offset: query.offset, limit: query.limit };
    Ok(Json(indiciados::search(&state.db, &query.q, page).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::indiciado::Model>, ApiError> {
    Ok(Json(indiciados::get(&state.db, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<models::indiciado::Model>), ApiError> {
    current.ensure_can_write()?;
    let form = read_form(&state, multipart).await?;
    let subsector_id = form
        .subsector_id
        .ok_or_else(|| ApiError::Validation("subsector_id is required".into()))?;
    let input = NewIndiciado {
        nombres: form.nombres.unwrap_or_default(),
        apellidos: form.apellidos.unwrap_or_default(),
        cedula: form.cedula.unwrap_or_default(),
        alias: form.alias.filter(|s| !s.trim().is_empty()),
        foto_url: form.foto_url,
        observaciones: form.observaciones.filter(|s| !s.trim().is_empty()),
    };
    let created = indiciados::create(&state.db, subsector_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<models::indiciado::Model>, ApiError> {
    current.ensure_can_write()?;
    let previous = indiciados::get(&state.db, id).await?;
    let form = read_form(&state, multipart).await?;

    let replacing_photo = form.foto_url.is_some();
    let update = IndiciadoUpdate {
        nombres: form.nombres,
        apellidos: form.apellidos,
        cedula: form.cedula,
        alias: form.alias,
        observaciones: form.observaciones,
        foto_url: form.foto_url,
        subsector_id: form.subsector_id,
    };
    let updated = indiciados::update(&state.db, id, update).await?;

    if replacing_photo {
        if let Some(old) = previous.foto_url {
            uploads::unlink(&state.uploads_dir, &old).await;
        }
    }
    Ok(Json(updated))
}

/// Soft delete: the record disappears from reads but keeps its documents.
pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    current.ensure_can_write()?;
    indiciados::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
