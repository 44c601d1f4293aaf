//! Indiciado records. Removal is a soft delete: the row keeps its
//! documents and history but drops out of every read path.

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::indiciado::{self, NewIndiciado};
use models::subsector;

use crate::errors::ServiceError;
use crate::pagination::PageRequest;

/// Partial update payload. `None` leaves a field untouched; the
/// optional text columns can be cleared by sending an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndiciadoUpdate {
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub cedula: Option<String>,
    pub alias: Option<String>,
    pub observaciones: Option<String>,
    pub foto_url: Option<String>,
    pub subsector_id: Option<Uuid>,
}

pub async fn create(
    db: &DatabaseConnection,
    subsector_id: Uuid,
    input: NewIndiciado,
) -> Result<indiciado::Model, ServiceError> {
    if subsector::find_by_id(db, subsector_id).await?.is_none() {
        return Err(ServiceError::not_found("subsector"));
    }
    let created = indiciado::create(db, subsector_id, input).await?;
    info!(indiciado_id = %created.id, subsector_id = %subsector_id, "indiciado_created");
    Ok(created)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<indiciado::Model, ServiceError> {
    indiciado::find_active(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("indiciado"))
}

pub async fn list(
    db: &DatabaseConnection,
    subsector_id: Option<Uuid>,
    page: PageRequest,
) -> Result<Vec<indiciado::Model>, ServiceError> {
    let (offset, limit) = page.resolve();
    Ok(indiciado::list_active_page(db, subsector_id, offset, limit).await?)
}

pub async fn search(
    db: &DatabaseConnection,
    query: &str,
    page: PageRequest,
) -> Result<Vec<indiciado::Model>, ServiceError> {
    let (offset, limit) = page.resolve();
    if query.trim().is_empty() {
        return Ok(indiciado::list_active_page(db, None, offset, limit).await?);
    }
    Ok(indiciado::search_active(db, query, offset, limit).await?)
}

fn clearable(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[instrument(skip(db, update))]
pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    update: IndiciadoUpdate,
) -> Result<indiciado::Model, ServiceError> {
    let current = indiciado::find_active(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("indiciado"))?;

    if let Some(sid) = update.subsector_id {
        if subsector::find_by_id(db, sid).await?.is_none() {
            return Err(ServiceError::not_found("subsector"));
        }
    }
    for required in [&update.nombres, &update.apellidos, &update.cedula] {
        if let Some(v) = required {
            if v.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "nombres, apellidos and cedula cannot be blank".into(),
                ));
            }
        }
    }

    let mut am: indiciado::ActiveModel = current.into();
    if let Some(v) = update.nombres {
        am.nombres = Set(v.trim().to_string());
    }
    if let Some(v) = update.apellidos {
        am.apellidos = Set(v.trim().to_string());
    }
    if let Some(v) = update.cedula {
        am.cedula = Set(v.trim().to_string());
    }
    if let Some(v) = update.alias {
        am.alias = Set(clearable(v));
    }
    if let Some(v) = update.observaciones {
        am.observaciones = Set(clearable(v));
    }
    if let Some(v) = update.foto_url {
        am.foto_url = Set(clearable(v));
    }
    if let Some(sid) = update.subsector_id {
        am.subsector_id = Set(sid);
    }
    am.updated_at = Set(chrono::Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Soft delete. Returns NotFound for unknown or already-removed ids.
pub async fn remove(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if indiciado::find_active(db, id).await?.is_none() {
        return Err(ServiceError::not_found("indiciado"));
    }
    indiciado::soft_delete(db, id).await?;
    info!(indiciado_id = %id, "indiciado_soft_deleted");
    Ok(())
}
