use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::subsector;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sectores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nombre: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Subsectores,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subsectores => Entity::has_many(subsector::Entity).into(),
        }
    }
}

impl Related<subsector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subsectores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_nombre(nombre: &str) -> Result<(), errors::ModelError> {
    if nombre.trim().is_empty() {
        return Err(errors::ModelError::Validation("nombre required".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, nombre: &str, owner_id: Option<Uuid>) -> Result<Model, errors::ModelError> {
    validate_nombre(nombre)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        nombre: Set(nombre.trim().to_string()),
        owner_id: Set(owner_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_nombre(db: &DatabaseConnection, nombre: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Nombre.eq(nombre.trim()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Nombre)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
