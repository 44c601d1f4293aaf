use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::indiciado;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documentos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    pub indiciado_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Indiciado,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Indiciado => Entity::belongs_to(indiciado::Entity)
                .from(Column::IndiciadoId)
                .to(indiciado::Column::Id)
                .into(),
        }
    }
}

impl Related<indiciado::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Indiciado.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    indiciado_id: Uuid,
    filename: &str,
    url: &str,
) -> Result<Model, errors::ModelError> {
    if filename.trim().is_empty() {
        return Err(errors::ModelError::Validation("filename required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        filename: Set(filename.trim().to_string()),
        url: Set(url.to_string()),
        indiciado_id: Set(indiciado_id),
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

pub async fn list_by_indiciado(db: &DatabaseConnection, indiciado_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::IndiciadoId.eq(indiciado_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
