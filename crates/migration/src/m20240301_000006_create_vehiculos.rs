//! Create `vehiculos` table with FK to `subsectores`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehiculos::Table)
                    .if_not_exists()
                    .col(uuid(Vehiculos::Id).primary_key())
                    .col(string_len(Vehiculos::Placa, 32).not_null())
                    .col(string_len(Vehiculos::Marca, 128).not_null())
                    .col(string_len(Vehiculos::Modelo, 128).not_null())
                    .col(uuid(Vehiculos::SubsectorId).not_null())
                    .col(timestamp_with_time_zone(Vehiculos::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehiculos_subsector")
                            .from(Vehiculos::Table, Vehiculos::SubsectorId)
                            .to(Subsectores::Table, Subsectores::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Vehiculos::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vehiculos { Table, Id, Placa, Marca, Modelo, SubsectorId, CreatedAt }

#[derive(DeriveIden)]
enum Subsectores { Table, Id }
