use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::dto::HealthResponse;
use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        products: services.catalog.current().len(),
        published_at: services.catalog.published_at(),
    })
}
