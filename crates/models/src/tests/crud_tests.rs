use crate::db::connect;
use crate::{mind_map, node, node_connection, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use anyhow::Result;
use migration::MigratorTrait;

/// Connect and migrate, or `None` when no database is reachable.
async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn test_user_create_sets_timestamps_and_hides_hash() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, &unique("models_user"), "$argon2id$placeholder".into()).await?;
    assert!(u.id > 0);
    assert_eq!(u.created_at, u.updated_at);

    let json = serde_json::to_value(&u)?;
    assert!(json.get("password_hash").is_none());

    let found = user::find_by_username(&db, &u.username).await?.expect("user by name");
    assert_eq!(found, u);

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_user_validation() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    assert!(user::create(&db, "  ", "hash".into()).await.is_err());
    assert!(user::create(&db, &unique("models_user"), " ".into()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_update_advances_updated_at() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, &unique("models_owner"), "hash".into()).await?;
    let m = mind_map::ActiveModel { title: Set("before".into()), user_id: Set(u.id), ..Default::default() }
        .insert(&db)
        .await?;

    let mut am: mind_map::ActiveModel = m.clone().into();
    am.title = Set("after".into());
    let updated = am.update(&db).await?;

    assert_eq!(updated.title, "after");
    assert_eq!(updated.created_at, m.created_at);
    assert!(updated.updated_at > m.updated_at);

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_relations_and_fk_cascade() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, &unique("models_graph"), "hash".into()).await?;
    let m = mind_map::ActiveModel { title: Set("graph".into()), user_id: Set(u.id), ..Default::default() }
        .insert(&db)
        .await?;
    let a = node::ActiveModel { map_id: Set(m.id), text: Set("a".into()), parent_id: Set(None), position: Set("0,0".into()), ..Default::default() }
        .insert(&db)
        .await?;
    let b = node::ActiveModel { map_id: Set(m.id), text: Set("b".into()), parent_id: Set(Some(a.id)), position: Set("10,0".into()), ..Default::default() }
        .insert(&db)
        .await?;
    let c = node_connection::ActiveModel { from_node_id: Set(a.id), to_node_id: Set(b.id), label: Set(Some("next".into())), ..Default::default() }
        .insert(&db)
        .await?;

    let nodes = m.find_related(node::Entity).all(&db).await?;
    assert_eq!(nodes.len(), 2);
    let owner = m.find_related(user::Entity).one(&db).await?.expect("owner");
    assert_eq!(owner.id, u.id);

    let outgoing = outgoing_connections(&db, a.id).await?;
    assert_eq!(outgoing, vec![c.clone()]);

    // Dropping the owner removes the whole graph through ON DELETE CASCADE.
    user::Entity::delete_by_id(u.id).exec(&db).await?;
    assert!(mind_map::Entity::find_by_id(m.id).one(&db).await?.is_none());
    assert!(node::Entity::find_by_id(a.id).one(&db).await?.is_none());
    assert!(node_connection::Entity::find_by_id(c.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_dangling_map_reference_rejected_by_schema() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let res = node::ActiveModel { map_id: Set(i32::MAX), text: Set("orphan".into()), parent_id: Set(None), position: Set(String::new()), ..Default::default() }
        .insert(&db)
        .await;
    assert!(res.is_err());
    Ok(())
}

async fn outgoing_connections(db: &DatabaseConnection, node_id: i32) -> Result<Vec<node_connection::Model>, sea_orm::DbErr> {
    use sea_orm::{ColumnTrait, QueryFilter};
    node_connection::Entity::find()
        .filter(node_connection::Column::FromNodeId.eq(node_id))
        .all(db)
        .await
}
