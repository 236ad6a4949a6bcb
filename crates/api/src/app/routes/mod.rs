use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for all endpoints. `region_segment` is the path prefix of the
/// region-scoped routes (`countries` in `/countries/FR/products`).
pub fn router(region_segment: &str) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/products", products::router())
        .nest(&format!("/{region_segment}"), products::region_scoped_router())
}
