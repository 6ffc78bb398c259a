//! PostgreSQL plumbing shared by the services: pool configuration,
//! connect-with-retry, migrations and a `SELECT 1` health probe.
//!
//! # Features
//!
//! - `postgres` (default): SeaORM connector
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry, run_migrations};
//! use database::common::RetryConfig;
//!
//! let db = connect_from_config_with_retry(config, Some(RetryConfig::new().with_max_retries(5))).await?;
//! run_migrations::<migration::Migrator>(&db, "events_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, RetryConfig, retry_with_backoff};
