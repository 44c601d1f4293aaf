use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Invitations: lookups by email when checking for pending duplicates
        manager
            .create_index(
                Index::create()
                    .name("idx_invitations_email")
                    .table(Invitations::Table)
                    .col(Invitations::Email)
                    .to_owned(),
            )
            .await?;

        // Subsectores: composite unique (sector_id, nombre); duplicate
        // names are only a conflict within the same sector
        manager
            .create_index(
                Index::create()
                    .name("uniq_subsectores_sector_nombre")
                    .table(Subsectores::Table)
                    .col(Subsectores::SectorId)
                    .col(Subsectores::Nombre)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Child tables: index on parent id for scoped listings
        manager
            .create_index(
                Index::create()
                    .name("idx_indiciados_subsector")
                    .table(Indiciados::Table)
                    .col(Indiciados::SubsectorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_vehiculos_subsector")
                    .table(Vehiculos::Table)
                    .col(Vehiculos::SubsectorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_documentos_indiciado")
                    .table(Documentos::Table)
                    .col(Documentos::IndiciadoId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_invitations_email").table(Invitations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_subsectores_sector_nombre").table(Subsectores::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_indiciados_subsector").table(Indiciados::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_vehiculos_subsector").table(Vehiculos::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_documentos_indiciado").table(Documentos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Invitations { Table, Email }

#[derive(DeriveIden)]
enum Subsectores { Table, SectorId, Nombre }

#[derive(DeriveIden)]
enum Indiciados { Table, SubsectorId }

#[derive(DeriveIden)]
enum Vehiculos { Table, SubsectorId }

#[derive(DeriveIden)]
enum Documentos { Table, IndiciadoId }
