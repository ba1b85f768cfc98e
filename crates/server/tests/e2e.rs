use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use configs::WebConfig;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::SeaOrmResourceStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, state::ServerState};

struct TestApp {
    base_url: String,
    user_id: i32,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Ensure models prefer env over config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    // Connect DB and run migrations
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let state = ServerState::new(Arc::new(SeaOrmResourceStore::new(db)));
    let user = state
        .resources
        .register_user(&format!("e2e_{}", Uuid::new_v4().simple()), "S3curePass!")
        .await?;

    let app: Router = routes::build_router(state, CorsLayer::very_permissive(), &WebConfig::default());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, user_id: user.id })
}

async fn post(c: &reqwest::Client, url: String, body: Value) -> anyhow::Result<Value> {
    let res = c.post(url).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_mind_map_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();
    let base = &app.base_url;

    let map = post(&c, format!("{base}/api/mindmaps"), json!({"title": "e2e", "user_id": app.user_id})).await?;
    let map_id = map["id"].as_i64().unwrap();
    let a = post(&c, format!("{base}/api/nodes"), json!({"map_id": map_id, "text": "A"})).await?;
    let b = post(&c, format!("{base}/api/nodes"), json!({"map_id": map_id, "text": "B", "parent_id": a["id"]})).await?;
    let edge = post(
        &c,
        format!("{base}/api/connections"),
        json!({"from_node_id": a["id"], "to_node_id": b["id"], "label": "next"}),
    )
    .await?;

    let tree = c.get(format!("{base}/api/mindmaps/{map_id}")).send().await?.json::<Value>().await?;
    let nodes = tree["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    let a_view = nodes.iter().find(|n| n["id"] == a["id"]).unwrap();
    assert_eq!(a_view["from_connections"][0]["id"], edge["id"]);

    let res = c
        .put(format!("{base}/api/nodes/{}", b["id"]))
        .json(&json!({"text": "B2"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["text"], "B2");
    assert_eq!(updated["parent_id"], a["id"]);

    let res = c.delete(format!("{base}/api/mindmaps/{map_id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{base}/api/nodes/{}", a["id"])).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.get(format!("{base}/api/connections/{}", edge["id"])).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_dangling_connection_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = reqwest::Client::new()
        .post(format!("{}/api/connections", app.base_url))
        .json(&json!({"from_node_id": i32::MAX - 1, "to_node_id": i32::MAX}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
