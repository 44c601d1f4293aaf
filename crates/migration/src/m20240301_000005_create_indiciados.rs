//! Create `indiciados` table with FK to `subsectores`.
//!
//! Rows are soft-deleted via the `activo` flag; only subtree cascades
//! remove them physically.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Indiciados::Table)
                    .if_not_exists()
                    .col(uuid(Indiciados::Id).primary_key())
                    .col(string_len(Indiciados::Nombres, 255).not_null())
                    .col(string_len(Indiciados::Apellidos, 255).not_null())
                    .col(string_len(Indiciados::Cedula, 32).not_null())
                    .col(ColumnDef::new(Indiciados::Alias).string_len(255).null())
                    .col(ColumnDef::new(Indiciados::FotoUrl).string_len(512).null())
                    .col(ColumnDef::new(Indiciados::Observaciones).text().null())
                    .col(uuid(Indiciados::SubsectorId).not_null())
                    .col(boolean(Indiciados::Activo).not_null().default(true))
                    .col(timestamp_with_time_zone(Indiciados::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Indiciados::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_indiciados_subsector")
                            .from(Indiciados::Table, Indiciados::SubsectorId)
                            .to(Subsectores::Table, Subsectores::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Indiciados::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Indiciados { Table, Id, Nombres, Apellidos, Cedula, Alias, FotoUrl, Observaciones, SubsectorId, Activo, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Subsectores { Table, Id }
