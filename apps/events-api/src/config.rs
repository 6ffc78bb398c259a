//! Configuration for the Events API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_flag, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default `true`)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?, // Required - will fail if not set
            server: ServerConfig::from_env()?,     // HOST=0.0.0.0, PORT=8080 by default
            environment: Environment::from_env(),
            run_migrations: env_flag("RUN_MIGRATIONS", true)?,
        })
    }
}
