use std::sync::Arc;

use anyhow::Context;
use axum::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axum_todo_users_api::{config::ServerConfig, db, route::create_router, AppState};

// Entry point of the application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "axum_todo_users_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    tracing::info!("connection to the database is successful");

    db::init_schema(&pool)
        .await
        .context("failed to create tables")?;
    tracing::info!("database schema ready");

    let app_state = Arc::new(AppState { db: pool.clone() });
    let app = create_router(app_state, config.cors_origins.clone());

    let addr = config.addr();
    tracing::info!("server running on {addr}");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
