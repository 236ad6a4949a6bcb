//! Service wiring: catalog snapshot store, resolvers and request handler.

use std::sync::{Arc, RwLock};

use anyhow::Context;
use chrono::{DateTime, Utc};

use storefront_catalog::{CatalogDocument, ProductCatalog};
use storefront_negotiation::{LanguageResolver, LocalizationResolver};

use crate::config::ServiceConfig;
use crate::handler::RequestHandler;

/// Demo catalog used when no import document is configured.
pub const DEMO_CATALOG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.json"));

#[derive(Debug, Clone)]
struct Snapshot {
    catalog: Arc<ProductCatalog>,
    published_at: DateTime<Utc>,
}

/// Holder of the current catalog snapshot.
///
/// Readers clone the `Arc` and keep one complete catalog for the whole
/// request; `publish` swaps the whole catalog at once.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<RwLock<Snapshot>>,
}

impl CatalogStore {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                catalog: Arc::new(catalog),
                published_at: Utc::now(),
            })),
        }
    }

    fn snapshot(&self) -> Snapshot {
        // The lock only guards an Arc swap, so a poisoned lock still holds a whole snapshot.
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn current(&self) -> Arc<ProductCatalog> {
        self.snapshot().catalog
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.snapshot().published_at
    }

    /// Replace the catalog; requests already running keep their snapshot.
    pub fn publish(&self, catalog: ProductCatalog) {
        let next = Snapshot {
            catalog: Arc::new(catalog),
            published_at: Utc::now(),
        };
        let products = next.catalog.len();
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        tracing::info!(products, "catalog snapshot published");
    }
}

/// Everything the routes need.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub handler: RequestHandler,
    pub catalog: CatalogStore,
    pub region_param: String,
}

fn load_document(config: &ServiceConfig) -> anyhow::Result<CatalogDocument> {
    let raw = match &config.catalog_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?,
        None => {
            tracing::warn!("STOREFRONT_CATALOG not set; using bundled demo catalog");
            DEMO_CATALOG.to_string()
        }
    };
    Ok(CatalogDocument::from_json(&raw)?)
}

pub fn build_services(config: &ServiceConfig) -> anyhow::Result<AppServices> {
    let document = load_document(config)?;

    let valid_regions = match &config.valid_regions {
        Some(regions) => regions.clone(),
        None => document.region_ids(),
    };
    if valid_regions.is_empty() {
        tracing::warn!("no valid regions configured; every region-scoped request will be rejected");
    }
    for region in &valid_regions {
        match document.region_name(region) {
            Some(name) => tracing::info!(%region, name, "valid region"),
            None => tracing::info!(%region, "valid region (not in catalog enumeration)"),
        }
    }

    let catalog = document
        .into_catalog(config.default_locale.clone())
        .context("invalid catalog document")?;
    let store = CatalogStore::new(catalog);

    let language = LanguageResolver::new(
        config.default_locale.clone(),
        config.supported_locales.iter().cloned(),
        config.locale_matching,
    );
    let localization = match &config.default_region {
        None => LocalizationResolver::required(&config.region_param, valid_regions),
        Some(default) => LocalizationResolver::optional(&config.region_param, valid_regions, default.clone())
            .context("invalid default region")?,
    }
    .with_case(config.region_case);

    tracing::info!(
        default_locale = %config.default_locale,
        region_param = %config.region_param,
        region_required = config.region_required(),
        valid_regions = localization.valid_regions().len(),
        "services ready"
    );

    Ok(AppServices {
        handler: RequestHandler::new(language, localization, store.clone()),
        catalog: store,
        region_param: config.region_param.clone(),
    })
}
