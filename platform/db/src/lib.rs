//! Database primitives: connection settings, pool setup and the sea-orm
//! implementations of the HR store traits.

mod compensations;
mod employees;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use thiserror::Error;
use tracing::info;

pub use compensations::DbCompensationStore;
pub use employees::DbEmployeeStore;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

pub const DEFAULT_DATABASE_URL: &str = "postgres://hr:hr@localhost:5432/hr";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database")]
    Connect(#[source] sea_orm::DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub connect_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: None,
            connect_timeout: Duration::from_secs(8),
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Read `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = std::env::var("DATABASE_URL")
            .map(Self::new)
            .unwrap_or_default();
        if let Ok(raw) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            let parsed = raw.trim().parse().map_err(|_| DbError::InvalidSetting {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw.clone(),
            })?;
            settings.max_connections = Some(parsed);
        }
        Ok(settings)
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .connect_timeout(settings.connect_timeout)
        .sqlx_logging(false);
    if let Some(max) = settings.max_connections {
        options.max_connections(max);
    }
    let pool = Database::connect(options).await.map_err(DbError::Connect)?;
    info!(backend = ?pool.get_database_backend(), "database pool ready");
    Ok(pool)
}

fn backend(err: sea_orm::DbErr) -> products_hr::StoreError {
    products_hr::StoreError::Backend(err.into())
}
