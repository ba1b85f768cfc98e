//! Create `nodes` table with FK to `mind_maps`.
//!
//! `parent_id` is a weak reference to another node and carries no FK;
//! `position` is an opaque client-defined string.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(pk_auto(Nodes::Id))
                    .col(integer(Nodes::MapId).not_null())
                    .col(text(Nodes::Text).not_null())
                    .col(integer_null(Nodes::ParentId))
                    .col(text(Nodes::Position).not_null())
                    .col(timestamp_with_time_zone(Nodes::CreatedAt).default(Expr::current_timestamp()).not_null())
                    .col(timestamp_with_time_zone(Nodes::UpdatedAt).default(Expr::current_timestamp()).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nodes_mind_map")
                            .from(Nodes::Table, Nodes::MapId)
                            .to(MindMaps::Table, MindMaps::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Nodes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Nodes { Table, Id, MapId, Text, ParentId, Position, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum MindMaps { Table, Id }
