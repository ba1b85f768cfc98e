//! Create `node_connections` table: directed, optionally labelled edges
//! between two nodes, with FKs on both endpoints.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NodeConnections::Table)
                    .if_not_exists()
                    .col(pk_auto(NodeConnections::Id))
                    .col(integer(NodeConnections::FromNodeId).not_null())
                    .col(integer(NodeConnections::ToNodeId).not_null())
                    .col(text_null(NodeConnections::Label))
                    .col(timestamp_with_time_zone(NodeConnections::CreatedAt).default(Expr::current_timestamp()).not_null())
                    .col(timestamp_with_time_zone(NodeConnections::UpdatedAt).default(Expr::current_timestamp()).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_connections_from")
                            .from(NodeConnections::Table, NodeConnections::FromNodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_connections_to")
                            .from(NodeConnections::Table, NodeConnections::ToNodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(NodeConnections::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum NodeConnections { Table, Id, FromNodeId, ToNodeId, Label, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Nodes { Table, Id }
