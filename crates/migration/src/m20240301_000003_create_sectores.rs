//! Create `sectores` table, root of the investigation hierarchy.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sectores::Table)
                    .if_not_exists()
                    .col(uuid(Sectores::Id).primary_key())
                    .col(string_len(Sectores::Nombre, 255).unique_key().not_null())
                    .col(ColumnDef::new(Sectores::OwnerId).uuid().null())
                    .col(timestamp_with_time_zone(Sectores::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sectores_owner")
                            .from(Sectores::Table, Sectores::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Sectores::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Sectores { Table, Id, Nombre, OwnerId, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
