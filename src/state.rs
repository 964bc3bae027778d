use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{
        jwt::JwtKeys,
        memory::MemoryUserRepo,
        password::PasswordHasher,
        repo::{PgUserRepo, UserRepo},
        store::CredentialStore,
    },
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub users: CredentialStore,
    pub keys: Arc<JwtKeys>,
}

impl FromRef<AppState> for CredentialStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl AppState {
    /// Connects to Postgres and applies pending migrations.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = connect(&config.database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        Self::from_parts(config, Arc::new(PgUserRepo::new(db)))
    }

    pub fn from_parts(config: &AppConfig, repo: Arc<dyn UserRepo>) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(&config.password)?;
        Ok(Self {
            users: CredentialStore::new(repo, hasher)?,
            keys: Arc::new(JwtKeys::new(&config.jwt)?),
        })
    }

    /// State backed by [`MemoryUserRepo`]; nothing survives the process.
    pub fn in_memory(config: &AppConfig) -> anyhow::Result<Self> {
        Self::from_parts(config, Arc::new(MemoryUserRepo::new()))
    }
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}
