use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::sector;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subsectores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nombre: String,
    pub sector_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Sector,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Sector => Entity::belongs_to(sector::Entity)
                .from(Column::SectorId)
                .to(sector::Column::Id)
                .into(),
        }
    }
}

impl Related<sector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sector.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, nombre: &str, sector_id: Uuid) -> Result<Model, errors::ModelError> {
    sector::validate_nombre(nombre)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        nombre: Set(nombre.trim().to_string()),
        sector_id: Set(sector_id),
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

pub async fn find_in_sector_by_nombre(
    db: &DatabaseConnection,
    sector_id: Uuid,
    nombre: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::SectorId.eq(sector_id))
        .filter(Column::Nombre.eq(nombre.trim()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_by_sector(db: &DatabaseConnection, sector_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::SectorId.eq(sector_id))
        .order_by_asc(Column::Nombre)
        .all(db)
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
