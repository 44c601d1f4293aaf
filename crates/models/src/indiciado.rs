use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::{documento, subsector};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "indiciados")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nombres: String,
    pub apellidos: String,
    pub cedula: String,
    pub alias: Option<String>,
    pub foto_url: Option<String>,
    pub observaciones: Option<String>,
    pub subsector_id: Uuid,
    pub activo: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Subsector,
    Documentos,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subsector => Entity::belongs_to(subsector::Entity)
                .from(Column::SubsectorId)
                .to(subsector::Column::Id)
                .into(),
            Relation::Documentos => Entity::has_many(documento::Entity).into(),
        }
    }
}

impl Related<documento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documentos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted at creation time. Photo handling happens at the HTTP
/// layer; only the resulting URL lands here.
#[derive(Debug, Clone, Default)]
pub struct NewIndiciado {
    pub nombres: String,
    pub apellidos: String,
    pub cedula: String,
    pub alias: Option<String>,
    pub foto_url: Option<String>,
    pub observaciones: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    subsector_id: Uuid,
    input: NewIndiciado,
) -> Result<Model, errors::ModelError> {
    if input.nombres.trim().is_empty() || input.apellidos.trim().is_empty() {
        return Err(errors::ModelError::Validation("nombres and apellidos required".into()));
    }
    if input.cedula.trim().is_empty() {
        return Err(errors::ModelError::Validation("cedula required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        nombres: Set(input.nombres.trim().to_string()),
        apellidos: Set(input.apellidos.trim().to_string()),
        cedula: Set(input.cedula.trim().to_string()),
        alias: Set(input.alias),
        foto_url: Set(input.foto_url),
        observaciones: Set(input.observaciones),
        subsector_id: Set(subsector_id),
        activo: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Lookup that hides soft-deleted rows.
pub async fn find_active(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .filter(Column::Activo.eq(true))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_active_by_subsector(
    db: &DatabaseConnection,
    subsector_id: Uuid,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::SubsectorId.eq(subsector_id))
        .filter(Column::Activo.eq(true))
        .order_by_asc(Column::Apellidos)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Flat paged listing, optionally scoped to one subsector.
pub async fn list_active_page(
    db: &DatabaseConnection,
    subsector_id: Option<Uuid>,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    let mut query = Entity::find().filter(Column::Activo.eq(true));
    if let Some(sid) = subsector_id {
        query = query.filter(Column::SubsectorId.eq(sid));
    }
    query
        .order_by_asc(Column::Apellidos)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Case-insensitive substring search over nombres/apellidos/alias.
/// Implemented as lower(col) LIKE %lower(q)% to stay driver-portable.
pub async fn search_active(
    db: &DatabaseConnection,
    query: &str,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    let pattern = format!("%{}%", query.trim().to_lowercase());
    let matches = Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(Column::Nombres))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(Column::Apellidos))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(Column::Alias))).like(pattern));
    Entity::find()
        .filter(Column::Activo.eq(true))
        .filter(matches)
        .order_by_asc(Column::Apellidos)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Soft delete: flips the flag, row stays in place.
pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    let found = find_active(db, id)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("indiciado not found".into()))?;
    let mut am: ActiveModel = found.into();
    am.activo = Set(false);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
