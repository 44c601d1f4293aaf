use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::subsector;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehiculos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub placa: String,
    pub marca: String,
    pub modelo: String,
    pub subsector_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Subsector,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subsector => Entity::belongs_to(subsector::Entity)
                .from(Column::SubsectorId)
                .to(subsector::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    subsector_id: Uuid,
    placa: &str,
    marca: &str,
    modelo: &str,
) -> Result<Model, errors::ModelError> {
    if placa.trim().is_empty() {
        return Err(errors::ModelError::Validation("placa required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        placa: Set(placa.trim().to_uppercase()),
        marca: Set(marca.trim().to_string()),
        modelo: Set(modelo.trim().to_string()),
        subsector_id: Set(subsector_id),
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

pub async fn list_by_subsector(db: &DatabaseConnection, subsector_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::SubsectorId.eq(subsector_id))
        .order_by_asc(Column::Placa)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Placa)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
