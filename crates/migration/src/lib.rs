//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users;
mod m20240301_000002_create_invitations;
mod m20240301_000003_create_sectores;
mod m20240301_000004_create_subsectores;
mod m20240301_000005_create_indiciados;
mod m20240301_000006_create_vehiculos;
mod m20240301_000007_create_documentos;
mod m20240301_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users::Migration),
            Box::new(m20240301_000002_create_invitations::Migration),
            Box::new(m20240301_000003_create_sectores::Migration),
            Box::new(m20240301_000004_create_subsectores::Migration),
            Box::new(m20240301_000005_create_indiciados::Migration),
            Box::new(m20240301_000006_create_vehiculos::Migration),
            Box::new(m20240301_000007_create_documentos::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000008_add_indexes::Migration),
        ]
    }
}
