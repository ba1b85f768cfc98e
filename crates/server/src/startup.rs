use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::{env::ensure_env, utils::logging::init_logging_from_env};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use service::SeaOrmResourceStore;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: load configuration and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    let cfg = AppConfig::load()?;
    run_with_config(cfg).await
}

/// Build the app from an already validated configuration and serve it until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    ensure_env(&cfg.web.static_dir, &cfg.web.index_template).await?;

    // DB connection
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!("database migrations applied");
    }

    let state = ServerState::new(Arc::new(SeaOrmResourceStore::new(db)));

    if let Some(seed) = &cfg.seed {
        let user = state.resources.ensure_user(&seed.username, &seed.password).await?;
        info!(user_id = user.id, username = %user.username, "seed user ready");
    }

    // Build router
    let app: Router = routes::build_router(state, build_cors(), &cfg.web);

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting mind map server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9000;
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }
}
