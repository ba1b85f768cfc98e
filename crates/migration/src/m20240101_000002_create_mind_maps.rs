//! Create `mind_maps` table with FK to `users`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MindMaps::Table)
                    .if_not_exists()
                    .col(pk_auto(MindMaps::Id))
                    .col(string_len(MindMaps::Title, 255).not_null())
                    .col(integer(MindMaps::UserId).not_null())
                    .col(timestamp_with_time_zone(MindMaps::CreatedAt).default(Expr::current_timestamp()).not_null())
                    .col(timestamp_with_time_zone(MindMaps::UpdatedAt).default(Expr::current_timestamp()).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mind_maps_user")
                            .from(MindMaps::Table, MindMaps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MindMaps::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MindMaps { Table, Id, Title, UserId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
