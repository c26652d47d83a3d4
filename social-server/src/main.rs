use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::user_service::AdminSeed;
use data::post_repository::DynPostRepository;
use data::repositories::memory::post_repository::MemoryPostRepository;
use data::repositories::memory::user_repository::MemoryUserRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use data::user_repository::DynUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::{Settings, StorageBackend};
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let (posts, users) = build_repositories(&settings).await?;
    let jwt = Arc::new(JwtService::new(
        &settings.jwt_secret,
        settings.jwt_ttl_seconds,
    ));
    let seed = AdminSeed {
        secret: settings.admin_seed_secret.clone(),
        password: settings.admin_seed_password.clone(),
    };
    if seed.secret.is_none() {
        info!("ADMIN_SEED_SECRET not set, admin seeding disabled");
    }

    let state = AppState::new(posts, users, jwt, seed);
    server::run_http(&settings, state).await
}

async fn build_repositories(
    settings: &Settings,
) -> Result<(DynPostRepository, DynUserRepository)> {
    match settings.storage_backend {
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = create_pool(database_url, settings.database_max_connections).await?;
            run_migrations(&pool).await?;
            info!("using postgres storage");

            Ok((
                Arc::new(PostgresPostRepository::new(pool.clone())),
                Arc::new(PostgresUserRepository::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage, data is lost on restart");
            Ok((
                Arc::new(MemoryPostRepository::new()),
                Arc::new(MemoryUserRepository::new()),
            ))
        }
    }
}
