use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // MindMaps: index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_mind_maps_user")
                    .table(MindMaps::Table)
                    .col(MindMaps::UserId)
                    .to_owned(),
            )
            .await?;

        // Nodes: map lookups drive the deep fetch and the cascade delete
        manager
            .create_index(
                Index::create()
                    .name("idx_nodes_map")
                    .table(Nodes::Table)
                    .col(Nodes::MapId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_nodes_parent")
                    .table(Nodes::Table)
                    .col(Nodes::ParentId)
                    .to_owned(),
            )
            .await?;

        // NodeConnections: both endpoints
        manager
            .create_index(
                Index::create()
                    .name("idx_node_connections_from")
                    .table(NodeConnections::Table)
                    .col(NodeConnections::FromNodeId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_node_connections_to")
                    .table(NodeConnections::Table)
                    .col(NodeConnections::ToNodeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_mind_maps_user").table(MindMaps::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_nodes_map").table(Nodes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_nodes_parent").table(Nodes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_node_connections_from").table(NodeConnections::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_node_connections_to").table(NodeConnections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MindMaps { Table, UserId }

#[derive(DeriveIden)]
enum Nodes { Table, MapId, ParentId }

#[derive(DeriveIden)]
enum NodeConnections { Table, FromNodeId, ToNodeId }
