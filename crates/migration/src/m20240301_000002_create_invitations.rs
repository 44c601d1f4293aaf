//! Create `invitations` table.
//!
//! Single-use, time-limited registration codes bound to an email and a
//! target role. Status (pending/used/expired) is derived, never stored.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(uuid(Invitations::Id).primary_key())
                    .col(string_len(Invitations::Email, 255).not_null())
                    .col(string_len(Invitations::Code, 64).unique_key().not_null())
                    .col(string_len(Invitations::Role, 16).not_null())
                    .col(boolean(Invitations::IsUsed).not_null().default(false))
                    .col(ColumnDef::new(Invitations::InvitedBy).uuid().null())
                    .col(timestamp_with_time_zone(Invitations::ExpiresAt).not_null())
                    .col(ColumnDef::new(Invitations::UsedAt).timestamp_with_time_zone().null())
                    .col(timestamp_with_time_zone(Invitations::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitations_invited_by")
                            .from(Invitations::Table, Invitations::InvitedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Invitations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Invitations { Table, Id, Email, Code, Role, IsUsed, InvitedBy, ExpiresAt, UsedAt, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
