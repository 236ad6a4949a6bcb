//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog snapshot store, resolvers, request handler
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ServiceConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ServiceConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config)?);

    Ok(routes::router(&config.region_path_segment)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context_middleware)),
        ))
}
