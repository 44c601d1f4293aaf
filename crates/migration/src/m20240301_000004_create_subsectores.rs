//! Create `subsectores` table with FK to `sectores`.
//!
//! ON DELETE CASCADE backs the subtree-removal invariant at the schema
//! level; the service layer still deletes bottom-up inside a transaction.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subsectores::Table)
                    .if_not_exists()
                    .col(uuid(Subsectores::Id).primary_key())
                    .col(string_len(Subsectores::Nombre, 255).not_null())
                    .col(uuid(Subsectores::SectorId).not_null())
                    .col(timestamp_with_time_zone(Subsectores::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subsectores_sector")
                            .from(Subsectores::Table, Subsectores::SectorId)
                            .to(Sectores::Table, Sectores::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subsectores::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subsectores { Table, Id, Nombre, SectorId, CreatedAt }

#[derive(DeriveIden)]
enum Sectores { Table, Id }
