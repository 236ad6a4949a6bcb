use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_catalog::CatalogError;
use storefront_negotiation::LocalizationError;

use crate::app::dto::ProductResponse;
use crate::context::RequestContext;
use crate::handler::{Axis, HandlerError};

/// Map a pipeline failure to its HTTP response, keeping the error code and
/// the responsible axis.
pub fn handler_error_to_response(err: HandlerError, ctx: &RequestContext) -> axum::response::Response {
    let axis = err.axis();
    let message = err.to_string();
    tracing::info!(request_id = %ctx.request_id(), axis = axis.as_str(), %message, "request rejected");

    match err {
        HandlerError::Region(LocalizationError::MissingParameter { .. }) => {
            json_error(StatusCode::BAD_REQUEST, "missing_parameter", axis, message, ctx)
        }
        HandlerError::Region(LocalizationError::UnknownRegion { .. }) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown_region", axis, message, ctx)
        }
        HandlerError::Catalog {
            error: CatalogError::NotFound { .. },
            ..
        } => json_error(StatusCode::NOT_FOUND, "not_found", axis, message, ctx),
        HandlerError::Catalog {
            error: CatalogError::NotAvailableInRegion { id, .. },
            label,
        } => {
            let product = label.map(|label| ProductResponse {
                id: id.to_string(),
                label: label.text().to_string(),
                price: None,
            });
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({
                    "error": "not_available_in_region",
                    "axis": axis,
                    "message": message,
                    "request_id": ctx.request_id(),
                    "product": product,
                })),
            )
                .into_response()
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    axis: Axis,
    message: impl Into<String>,
    ctx: &RequestContext,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "axis": axis,
            "message": message.into(),
            "request_id": ctx.request_id(),
        })),
    )
        .into_response()
}
