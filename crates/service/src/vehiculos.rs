//! Vehicle records attached to a subsector.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::{subsector, vehiculo};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewVehiculo {
    pub placa: String,
    pub marca: String,
    pub modelo: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehiculoUpdate {
    pub placa: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    subsector_id: Uuid,
    input: NewVehiculo,
) -> Result<vehiculo::Model, ServiceError> {
    if subsector::find_by_id(db, subsector_id).await?.is_none() {
        return Err(ServiceError::not_found("subsector"));
    }
    let created = vehiculo::create(db, subsector_id, &input.placa, &input.marca, &input.modelo).await?;
    info!(vehiculo_id = %created.id, placa = %created.placa, "vehiculo_created");
    Ok(created)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<vehiculo::Model, ServiceError> {
    vehiculo::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("vehiculo"))
}

pub async fn list(
    db: &DatabaseConnection,
    subsector_id: Option<Uuid>,
) -> Result<Vec<vehiculo::Model>, ServiceError> {
    Ok(match subsector_id {
        Some(sid) => vehiculo::list_by_subsector(db, sid).await?,
        None => vehiculo::list(db).await?,
    })
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    update: VehiculoUpdate,
) -> Result<vehiculo::Model, ServiceError> {
    let current = vehiculo::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("vehiculo"))?;

    if let Some(placa) = &update.placa {
        if placa.trim().is_empty() {
            return Err(ServiceError::Validation("placa cannot be blank".into()));
        }
    }

    let mut am: vehiculo::ActiveModel = current.into();
    if let Some(v) = update.placa {
        am.placa = Set(v.trim().to_uppercase());
    }
    if let Some(v) = update.marca {
        am.marca = Set(v.trim().to_string());
    }
    if let Some(v) = update.modelo {
        am.modelo = Set(v.trim().to_string());
    }
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn remove(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if vehiculo::find_by_id(db, id).await?.is_none() {
        return Err(ServiceError::not_found("vehiculo"));
    }
    vehiculo::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(vehiculo_id = %id, "vehiculo_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy;
    use crate::test_support::try_db;

    #[tokio::test]
    async fn placa_is_normalized_to_uppercase() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let s = hierarchy::create_sector(&db, &format!("Sector {}", Uuid::new_v4()), None).await?;
        let sub = hierarchy::create_subsector(&db, "Oeste", s.id).await?;

        let v = create(
            &db,
            sub.id,
            NewVehiculo { placa: "abc-123".into(), marca: "Toyota".into(), modelo: "Hilux".into() },
        )
        .await?;
        assert_eq!(v.placa, "ABC-123");

        let v = update(&db, v.id, VehiculoUpdate { placa: Some("xyz-999".into()), ..Default::default() }).await?;
        assert_eq!(v.placa, "XYZ-999");
        assert_eq!(v.marca, "Toyota");

        remove(&db, v.id).await?;
        assert!(matches!(get(&db, v.id).await.unwrap_err(), ServiceError::NotFound(_)));

        hierarchy::delete_sector(&db, s.id).await?;
        Ok(())
    }
}
