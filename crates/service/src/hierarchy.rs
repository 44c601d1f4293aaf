//! Sector/subsector tree management.
//!
//! Deletes are transactional and bottom-up (documentos → indiciados/
//! vehiculos → subsectores → sector) so a mid-cascade failure rolls the
//! whole subtree back. The schema carries matching ON DELETE CASCADE
//! constraints as a second line of defense.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{documento, indiciado, sector, subsector, vehiculo};

use crate::errors::ServiceError;

/// Row counts removed by a cascade delete.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CascadeReport {
    pub subsectores: u64,
    pub indiciados: u64,
    pub vehiculos: u64,
    pub documentos: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubsectorSummary {
    pub id: Uuid,
    pub nombre: String,
    pub indiciados: u64,
    pub vehiculos: u64,
}

/// A sector with one level of children and their leaf counts.
#[derive(Debug, Clone, Serialize)]
pub struct SectorDetail {
    #[serde(flatten)]
    pub sector: sector::Model,
    pub subsectores: Vec<SubsectorSummary>,
}

/// A subsector with its leaf entities.
#[derive(Debug, Clone, Serialize)]
pub struct SubsectorDetail {
    #[serde(flatten)]
    pub subsector: subsector::Model,
    pub indiciados: Vec<indiciado::Model>,
    pub vehiculos: Vec<vehiculo::Model>,
}

pub async fn create_sector(
    db: &DatabaseConnection,
    nombre: &str,
    owner_id: Option<Uuid>,
) -> Result<sector::Model, ServiceError> {
    sector::validate_nombre(nombre)?;
    if sector::find_by_nombre(db, nombre).await?.is_some() {
        return Err(ServiceError::Conflict(format!("sector '{}' already exists", nombre.trim())));
    }
    let created = sector::create(db, nombre, owner_id).await?;
    info!(sector_id = %created.id, nombre = %created.nombre, "sector_created");
    Ok(created)
}

pub async fn rename_sector(
    db: &DatabaseConnection,
    id: Uuid,
    nombre: &str,
) -> Result<sector::Model, ServiceError> {
    use sea_orm::{ActiveModelTrait, Set};
    sector::validate_nombre(nombre)?;
    if let Some(existing) = sector::find_by_nombre(db, nombre).await? {
        if existing.id != id {
            return Err(ServiceError::Conflict(format!("sector '{}' already exists", nombre.trim())));
        }
    }
    let mut am: sector::ActiveModel = sector::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("sector"))?
        .into();
    am.nombre = Set(nombre.trim().to_string());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn list_sectores(db: &DatabaseConnection) -> Result<Vec<sector::Model>, ServiceError> {
    Ok(sector::list(db).await?)
}

pub async fn get_sector_with_children(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<SectorDetail, ServiceError> {
    let sector = sector::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("sector"))?;
    let children = subsector::list_by_sector(db, id).await?;

    let mut subsectores = Vec::with_capacity(children.len());
    for child in children {
        let indiciados = indiciado::Entity::find()
            .filter(indiciado::Column::SubsectorId.eq(child.id))
            .filter(indiciado::Column::Activo.eq(true))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let vehiculos = vehiculo::Entity::find()
            .filter(vehiculo::Column::SubsectorId.eq(child.id))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        subsectores.push(SubsectorSummary {
            id: child.id,
            nombre: child.nombre,
            indiciados,
            vehiculos,
        });
    }
    Ok(SectorDetail { sector, subsectores })
}

pub async fn create_subsector(
    db: &DatabaseConnection,
    nombre: &str,
    sector_id: Uuid,
) -> Result<subsector::Model, ServiceError> {
    sector::validate_nombre(nombre)?;
    if sector::find_by_id(db, sector_id).await?.is_none() {
        return Err(ServiceError::not_found("sector"));
    }
    if subsector::find_in_sector_by_nombre(db, sector_id, nombre).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "subsector '{}' already exists in this sector",
            nombre.trim()
        )));
    }
    let created = subsector::create(db, nombre, sector_id).await?;
    info!(subsector_id = %created.id, sector_id = %sector_id, "subsector_created");
    Ok(created)
}

pub async fn rename_subsector(
    db: &DatabaseConnection,
    id: Uuid,
    nombre: &str,
) -> Result<subsector::Model, ServiceError> {
    use sea_orm::{ActiveModelTrait, Set};
    sector::validate_nombre(nombre)?;
    let current = subsector::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("subsector"))?;
    if let Some(existing) = subsector::find_in_sector_by_nombre(db, current.sector_id, nombre).await? {
        if existing.id != id {
            return Err(ServiceError::Conflict(format!(
                "subsector '{}' already exists in this sector",
                nombre.trim()
            )));
        }
    }
    let mut am: subsector::ActiveModel = current.into();
    am.nombre = Set(nombre.trim().to_string());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn list_subsectores(
    db: &DatabaseConnection,
    sector_id: Option<Uuid>,
) -> Result<Vec<subsector::Model>, ServiceError> {
    Ok(match sector_id {
        Some(sid) => subsector::list_by_sector(db, sid).await?,
        None => subsector::list(db).await?,
    })
}

pub async fn get_subsector_with_children(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<SubsectorDetail, ServiceError> {
    let subsector = subsector::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("subsector"))?;
    let indiciados = indiciado::list_active_by_subsector(db, id).await?;
    let vehiculos = vehiculo::list_by_subsector(db, id).await?;
    Ok(SubsectorDetail { subsector, indiciados, vehiculos })
}

/// Remove everything reachable from the given subsector ids.
/// Runs inside the caller's transaction.
async fn delete_subtrees(
    txn: &DatabaseTransaction,
    subsector_ids: Vec<Uuid>,
) -> Result<CascadeReport, ServiceError> {
    let mut report = CascadeReport::default();
    if subsector_ids.is_empty() {
        return Ok(report);
    }

    let indiciado_ids: Vec<Uuid> = indiciado::Entity::find()
        .filter(indiciado::Column::SubsectorId.is_in(subsector_ids.clone()))
        .all(txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|i| i.id)
        .collect();

    if !indiciado_ids.is_empty() {
        report.documentos = documento::Entity::delete_many()
            .filter(documento::Column::IndiciadoId.is_in(indiciado_ids.clone()))
            .exec(txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .rows_affected;
        report.indiciados = indiciado::Entity::delete_many()
            .filter(indiciado::Column::Id.is_in(indiciado_ids))
            .exec(txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .rows_affected;
    }

    report.vehiculos = vehiculo::Entity::delete_many()
        .filter(vehiculo::Column::SubsectorId.is_in(subsector_ids.clone()))
        .exec(txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .rows_affected;

    report.subsectores = subsector::Entity::delete_many()
        .filter(subsector::Column::Id.is_in(subsector_ids))
        .exec(txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .rows_affected;

    Ok(report)
}

/// Delete a sector and its whole subtree atomically.
#[instrument(skip(db))]
pub async fn delete_sector(db: &DatabaseConnection, id: Uuid) -> Result<CascadeReport, ServiceError> {
    if sector::find_by_id(db, id).await?.is_none() {
        return Err(ServiceError::not_found("sector"));
    }

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let subsector_ids: Vec<Uuid> = subsector::Entity::find()
        .filter(subsector::Column::SectorId.eq(id))
        .all(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let report = delete_subtrees(&txn, subsector_ids).await?;

    sector::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(sector_id = %id, ?report, "sector_cascade_deleted");
    Ok(report)
}

/// Delete a subsector and its leaf entities atomically.
#[instrument(skip(db))]
pub async fn delete_subsector(db: &DatabaseConnection, id: Uuid) -> Result<CascadeReport, ServiceError> {
    if subsector::find_by_id(db, id).await?.is_none() {
        return Err(ServiceError::not_found("subsector"));
    }

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let report = delete_subtrees(&txn, vec![id]).await?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(subsector_id = %id, ?report, "subsector_cascade_deleted");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_db;
    use models::indiciado::NewIndiciado;

    #[tokio::test]
    async fn cascade_delete_removes_whole_subtree() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let suffix = Uuid::new_v4();
        let s = create_sector(&db, &format!("Sector {suffix}"), None).await?;
        let sub = create_subsector(&db, "Norte", s.id).await?;
        let ind = indiciado::create(
            &db,
            sub.id,
            NewIndiciado {
                nombres: "Juan".into(),
                apellidos: "Pérez".into(),
                cedula: "123456".into(),
                ..Default::default()
            },
        )
        .await?;
        let veh = vehiculo::create(&db, sub.id, "abc123", "Mazda", "3").await?;
        let doc = documento::create(&db, ind.id, "informe.pdf", "/uploads/informe.pdf").await?;

        let report = delete_sector(&db, s.id).await?;
        assert_eq!(report.subsectores, 1);
        assert_eq!(report.indiciados, 1);
        assert_eq!(report.vehiculos, 1);
        assert_eq!(report.documentos, 1);

        assert!(sector::find_by_id(&db, s.id).await?.is_none());
        assert!(subsector::find_by_id(&db, sub.id).await?.is_none());
        assert!(indiciado::find_active(&db, ind.id).await?.is_none());
        assert!(vehiculo::find_by_id(&db, veh.id).await?.is_none());
        assert!(documento::find_by_id(&db, doc.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sector_name_conflicts() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let nombre = format!("Sector {}", Uuid::new_v4());
        let s = create_sector(&db, &nombre, None).await?;
        let err = create_sector(&db, &nombre, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        delete_sector(&db, s.id).await?;
        Ok(())
    }
}
