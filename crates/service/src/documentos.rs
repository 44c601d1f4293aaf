//! Documents attached to an indiciado. The file itself is stored by the
//! HTTP layer; this module only tracks the metadata row.

use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use models::{documento, indiciado};

use crate::errors::ServiceError;

async fn require_active_indiciado(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    indiciado::find_active(db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("indiciado"))
}

pub async fn attach(
    db: &DatabaseConnection,
    indiciado_id: Uuid,
    filename: &str,
    url: &str,
) -> Result<documento::Model, ServiceError> {
    require_active_indiciado(db, indiciado_id).await?;
    let created = documento::create(db, indiciado_id, filename, url).await?;
    info!(documento_id = %created.id, indiciado_id = %indiciado_id, "documento_attached");
    Ok(created)
}

pub async fn list(
    db: &DatabaseConnection,
    indiciado_id: Uuid,
) -> Result<Vec<documento::Model>, ServiceError> {
    require_active_indiciado(db, indiciado_id).await?;
    Ok(documento::list_by_indiciado(db, indiciado_id).await?)
}

/// Delete the metadata row. Returns the removed model so the caller can
/// unlink the stored file afterwards.
pub async fn remove(db: &DatabaseConnection, id: Uuid) -> Result<documento::Model, ServiceError> {
    let found = documento::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("documento"))?;
    documento::hard_delete(db, id).await?;
    info!(documento_id = %id, "documento_deleted");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_db;
    use crate::{hierarchy, indiciados};
    use models::indiciado::NewIndiciado;

    #[tokio::test]
    async fn attach_rejects_soft_deleted_indiciado() -> Result<(), anyhow::Error> {
        let Some(db) = try_db().await else {
            eprintln!("skip: database unreachable");
            return Ok(());
        };

        let s = hierarchy::create_sector(&db, &format!("Sector {}", Uuid::new_v4()), None).await?;
        let sub = hierarchy::create_subsector(&db, "Centro", s.id).await?;
        let ind = indiciados::create(
            &db,
            sub.id,
            NewIndiciado {
                nombres: "Pedro".into(),
                apellidos: "Lara".into(),
                cedula: "112233".into(),
                ..Default::default()
            },
        )
        .await?;

        let doc = attach(&db, ind.id, "acta.pdf", "/uploads/acta.pdf").await?;
        assert_eq!(list(&db, ind.id).await?.len(), 1);

        indiciados::remove(&db, ind.id).await?;
        let err = attach(&db, ind.id, "otro.pdf", "/uploads/otro.pdf").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let removed = remove(&db, doc.id).await?;
        assert_eq!(removed.filename, "acta.pdf");
        assert!(matches!(remove(&db, doc.id).await.unwrap_err(), ServiceError::NotFound(_)));

        hierarchy::delete_sector(&db, s.id).await?;
        Ok(())
    }
}
