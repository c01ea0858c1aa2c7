use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod error;
pub mod models;
pub mod query_builder;
pub mod repositories;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Connection settings for [`create_pool`].
#[derive(Debug, Clone)]
pub struct PoolSettings<'a> {
    pub database_url: &'a str,
    pub max_connections: u32,
    /// Schema placed first on the connection `search_path`.
    pub schema: Option<&'a str>,
}

impl<'a> PoolSettings<'a> {
    pub fn new(database_url: &'a str) -> Self {
        Self {
            database_url,
            max_connections: 10,
            schema: None,
        }
    }

    fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = PgConnectOptions::from_str(self.database_url)?;
        Ok(match self.schema.filter(|s| !s.is_empty()) {
            Some(schema) => options.options([("search_path", schema)]),
            None => options,
        })
    }
}

/// Create a connection pool.
pub async fn create_pool(settings: &PoolSettings<'_>) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(settings.connect_options()?)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
