//! Create `documentos` table with FK to `indiciados`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documentos::Table)
                    .if_not_exists()
                    .col(uuid(Documentos::Id).primary_key())
                    .col(string_len(Documentos::Filename, 255).not_null())
                    .col(string_len(Documentos::Url, 512).not_null())
                    .col(uuid(Documentos::IndiciadoId).not_null())
                    .col(timestamp_with_time_zone(Documentos::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documentos_indiciado")
                            .from(Documentos::Table, Documentos::IndiciadoId)
                            .to(Indiciados::Table, Indiciados::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Documentos::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Documentos { Table, Id, Filename, Url, IndiciadoId, CreatedAt }

#[derive(DeriveIden)]
enum Indiciados { Table, Id }
