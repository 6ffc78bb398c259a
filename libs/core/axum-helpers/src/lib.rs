//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services:
//!
//! - **[`errors`]**: [`AppError`] and the [`ErrorResponse`] body every failure renders as
//! - **[`extractors`]**: [`IdPath`], [`ValidatedJson`], [`ValidatedQuery`]
//! - **[`server`]**: router assembly with OpenAPI docs, `/health`, graceful shutdown
//! - **[`http`]**: security headers middleware
//!
//! ```ignore
//! use axum_helpers::{create_router, create_app, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes).await?.merge(health_router(app_info!()));
//! create_app(router, &ServerConfig::default()).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, ValidatedJson, ValidatedQuery};
pub use http::security_headers;
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
