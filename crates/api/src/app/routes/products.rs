use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use storefront_core::{LocaleTag, ProductId};

use crate::app::{dto::ProductResponse, errors};
use crate::app::services::AppServices;
use crate::context::RequestContext;
use crate::handler::{Axis, ProductQuery};

/// `/products` routes: the region comes from the query string.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

/// `/{segment}/:region/products` routes: the region comes from the path.
pub fn region_scoped_router() -> Router {
    Router::new()
        .route("/:region/products", get(list_region_products))
        .route("/:region/products/:id", get(get_region_product))
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
}

/// `Content-Language` is omitted when no label language applies.
fn negotiated<T: IntoResponse>(locale: Option<&LocaleTag>, body: T) -> axum::response::Response {
    let mut response = (
        StatusCode::OK,
        [(header::VARY, header::ACCEPT_LANGUAGE.to_string())],
        body,
    )
        .into_response();
    if let Some(value) = locale.and_then(|l| HeaderValue::from_str(&l.to_string()).ok()) {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    response
}

fn parse_product_id(raw: &str, ctx: &RequestContext) -> Result<ProductId, axum::response::Response> {
    ProductId::new(raw).map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", Axis::Catalog, e.to_string(), ctx)
    })
}

fn list(services: &AppServices, ctx: &RequestContext, query: ProductQuery<'_>) -> axum::response::Response {
    match services.handler.list(query) {
        Ok(resolved) => {
            let items = resolved
                .value
                .into_iter()
                .map(ProductResponse::from)
                .collect::<Vec<_>>();
            negotiated(Some(&resolved.context.locale), Json(items))
        }
        Err(e) => errors::handler_error_to_response(e, ctx),
    }
}

fn get_one(
    services: &AppServices,
    ctx: &RequestContext,
    raw_id: &str,
    query: ProductQuery<'_>,
) -> axum::response::Response {
    let id = match parse_product_id(raw_id, ctx) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.handler.get(&id, query) {
        Ok(resolved) => {
            // the label may come from the default language, not the negotiated one
            let locale = resolved.value.label.locale().cloned();
            negotiated(locale.as_ref(), Json(ProductResponse::from(resolved.value)))
        }
        Err(e) => errors::handler_error_to_response(e, ctx),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let query = ProductQuery {
        accept_language: accept_language(&headers),
        region: params.get(&services.region_param).map(String::as_str),
    };
    list(&services, &ctx, query)
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let query = ProductQuery {
        accept_language: accept_language(&headers),
        region: params.get(&services.region_param).map(String::as_str),
    };
    get_one(&services, &ctx, &id, query)
}

pub async fn list_region_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(region): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    let query = ProductQuery {
        accept_language: accept_language(&headers),
        region: Some(region.as_str()),
    };
    list(&services, &ctx, query)
}

pub async fn get_region_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path((region, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    let query = ProductQuery {
        accept_language: accept_language(&headers),
        region: Some(region.as_str()),
    };
    get_one(&services, &ctx, &id, query)
}
