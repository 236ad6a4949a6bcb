//! Request pipeline: locale, then region, then catalog.
//!
//! Framework-free so the HTTP routes stay thin and the pipeline can be tested
//! directly.

use serde::Serialize;
use thiserror::Error;

use storefront_catalog::{CatalogError, Label, ProductView};
use storefront_core::{LocaleTag, ProductId, RegionId};
use storefront_negotiation::{LanguageResolver, LocalizationError, LocalizationResolver};

use crate::app::services::CatalogStore;

/// Raw adaptation inputs of one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductQuery<'a> {
    /// `Accept-Language` header value.
    pub accept_language: Option<&'a str>,
    /// Region parameter, from the query string or a path segment.
    pub region: Option<&'a str>,
}

/// Request-scoped outcome of both resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub locale: LocaleTag,
    pub region: RegionId,
}

/// A result together with the context it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub context: ResolvedContext,
    pub value: T,
}

/// Which adaptation axis a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Region,
    Catalog,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Region => "region",
            Axis::Catalog => "catalog",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error(transparent)]
    Region(#[from] LocalizationError),

    /// `label` is set when the product exists but is not sold in the region.
    #[error("{error}")]
    Catalog {
        error: CatalogError,
        label: Option<Label>,
    },
}

impl HandlerError {
    pub fn axis(&self) -> Axis {
        match self {
            HandlerError::Region(_) => Axis::Region,
            HandlerError::Catalog { .. } => Axis::Catalog,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestHandler {
    language: LanguageResolver,
    localization: LocalizationResolver,
    catalog: CatalogStore,
}

impl RequestHandler {
    pub fn new(language: LanguageResolver, localization: LocalizationResolver, catalog: CatalogStore) -> Self {
        Self {
            language,
            localization,
            catalog,
        }
    }

    pub fn localization(&self) -> &LocalizationResolver {
        &self.localization
    }

    pub fn language(&self) -> &LanguageResolver {
        &self.language
    }

    /// Resolve both axes. Only the region can fail.
    pub fn resolve(&self, query: ProductQuery<'_>) -> Result<ResolvedContext, HandlerError> {
        let locale = self.language.resolve(query.accept_language);
        let region = self.localization.resolve(query.region)?;
        tracing::debug!(locale = %locale, region = %region, "request context resolved");
        Ok(ResolvedContext { locale, region })
    }

    /// Products sold in the resolved region, translated.
    pub fn list(&self, query: ProductQuery<'_>) -> Result<Resolved<Vec<ProductView>>, HandlerError> {
        let context = self.resolve(query)?;
        let catalog = self.catalog.current();
        let value = catalog.list(&context.region, &context.locale);
        Ok(Resolved { context, value })
    }

    /// One product in the resolved region, translated.
    pub fn get(&self, id: &ProductId, query: ProductQuery<'_>) -> Result<Resolved<ProductView>, HandlerError> {
        let context = self.resolve(query)?;
        let catalog = self.catalog.current();
        match catalog.get(id, &context.locale, &context.region) {
            Ok(value) => Ok(Resolved { context, value }),
            Err(error @ CatalogError::NotAvailableInRegion { .. }) => Err(HandlerError::Catalog {
                label: catalog.label(id, &context.locale).ok(),
                error,
            }),
            Err(error) => Err(HandlerError::Catalog { error, label: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{Product, ProductCatalog};
    use storefront_core::Money;
    use storefront_negotiation::LocaleMatching;

    fn tag(s: &str) -> LocaleTag {
        s.parse().unwrap()
    }

    fn region(s: &str) -> RegionId {
        RegionId::new(s).unwrap()
    }

    fn handler() -> RequestHandler {
        let p42 = Product::new(ProductId::new("42").unwrap())
            .with_label(tag("en"), "A great product!")
            .unwrap()
            .with_label(tag("fr"), "Un super produit !")
            .unwrap();
        let p43 = Product::new(ProductId::new("43").unwrap())
            .with_label(tag("en"), "Another product")
            .unwrap()
            .with_offer(region("FR"), Money::from_major(10, "EUR".parse().unwrap()).unwrap())
            .with_offer(region("US"), Money::from_major(20, "USD".parse().unwrap()).unwrap());
        let catalog = ProductCatalog::new(tag("en"), vec![p42, p43]).unwrap();

        RequestHandler::new(
            LanguageResolver::new(tag("en"), vec![tag("fr")], LocaleMatching::Language),
            LocalizationResolver::required("country", vec![region("FR"), region("US")]),
            CatalogStore::new(catalog),
        )
    }

    #[test]
    fn no_header_uses_default_locale_and_explicit_region() {
        let resolved = handler()
            .list(ProductQuery {
                accept_language: None,
                region: Some("FR"),
            })
            .unwrap();
        assert_eq!(resolved.context.locale, tag("en"));
        assert_eq!(resolved.context.region, region("FR"));
        assert_eq!(resolved.value.len(), 1);
    }

    #[test]
    fn missing_region_fails_whatever_the_header_says() {
        for header in [None, Some("fr-FR"), Some("en-US"), Some("not a header")] {
            let err = handler()
                .list(ProductQuery {
                    accept_language: header,
                    region: None,
                })
                .unwrap_err();
            assert_eq!(err.axis(), Axis::Region);
            assert!(matches!(
                err,
                HandlerError::Region(LocalizationError::MissingParameter { .. })
            ));
        }
    }

    #[test]
    fn not_available_carries_translated_label() {
        let err = handler()
            .get(
                &ProductId::new("42").unwrap(),
                ProductQuery {
                    accept_language: Some("fr-FR"),
                    region: Some("FR"),
                },
            )
            .unwrap_err();
        assert_eq!(err.axis(), Axis::Catalog);
        match err {
            HandlerError::Catalog {
                error: CatalogError::NotAvailableInRegion { .. },
                label: Some(label),
            } => assert_eq!(label.text(), "Un super produit !"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_product_is_a_catalog_error() {
        let err = handler()
            .get(
                &ProductId::new("1").unwrap(),
                ProductQuery {
                    accept_language: None,
                    region: Some("US"),
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            HandlerError::Catalog {
                error: CatalogError::NotFound {
                    id: ProductId::new("1").unwrap(),
                },
                label: None,
            }
        );
    }

    #[test]
    fn locale_and_region_vary_independently() {
        let h = handler();
        let id = ProductId::new("43").unwrap();
        let us_fr = h
            .get(
                &id,
                ProductQuery {
                    accept_language: Some("fr-FR"),
                    region: Some("US"),
                },
            )
            .unwrap();
        assert_eq!(us_fr.context.locale, tag("fr"));
        assert_eq!(us_fr.value.offer.price.currency().as_str(), "USD");
        assert_eq!(us_fr.value.offer.price.minor(), 2000);
    }
}
