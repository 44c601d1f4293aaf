//! Document attachments for an indiciado. Upload is multipart; the file
//! lands under the uploads directory and only metadata hits the database.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use service::documentos;

use crate::errors::ApiError;
use crate::routes::auth::{CurrentUser, ServerState};
use crate::uploads;

pub async fn upload(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(indiciado_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<models::documento::Model>), ApiError> {
    current.ensure_can_write()?;

    let mut stored = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original = field.file_name().unwrap_or("documento").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("cannot read file field: {e}")))?;
        stored = Some((original.clone(), uploads::store(&state.uploads_dir, &original, &bytes).await?));
        break;
    }
    let (original, file) =
        stored.ok_or_else(|| ApiError::Validation("multipart field 'file' is required".into()))?;

    match documentos::attach(&state.db, indiciado_id, &original, &file.url).await {
        Ok(doc) => Ok((StatusCode::CREATED, Json(doc))),
        Err(e) => {
            // metadata insert failed; do not leave the file orphaned
            uploads::unlink(&state.uploads_dir, &file.url).await;
            Err(e.into())
        }
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Path(indiciado_id): Path<Uuid>,
) -> Result<Json<Vec<models::documento::Model>>, ApiError> {
    Ok(Json(documentos::list(&state.db, indiciado_id).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    current.ensure_can_write()?;
    let removed = documentos::remove(&state.db, id).await?;
    uploads::unlink(&state.uploads_dir, &removed.url).await;
    Ok(StatusCode::NO_CONTENT)
}
