//! Shared test helpers. Database-backed tests connect to DATABASE_URL
//! and skip themselves when no server is reachable.

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

pub async fn try_db() -> Option<DatabaseConnection> {
    let db = models::db::connect().await.ok()?;
    Migrator::up(&db, None).await.ok()?;
    Some(db)
}
