use anyhow::Context;
use std::sync::Arc;

use healthtrack_api::config::Config;
use healthtrack_api::gateway::{Backend, InMemoryRecordStore, PgRecordStore};
use healthtrack_api::{app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthtrack_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let store = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections)
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Backend::Postgres(PgRecordStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            Backend::Memory(InMemoryRecordStore::new())
        }
    };

    let backend = store.name();
    let state = AppState {
        store,
        config: config.clone(),
    };

    let addr = config.listen_addr();
    tracing::info!(backend, "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
