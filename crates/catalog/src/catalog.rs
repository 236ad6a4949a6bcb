use std::collections::HashMap;

use thiserror::Error;

use storefront_core::{DomainError, LocaleTag, ProductId, RegionId};

use crate::product::{Offer, Product};

/// Text rendered when neither the requested nor the default locale has a label.
pub const UNTRANSLATED: &str = "untranslated";

/// Catalog lookup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The product does not exist in any region.
    #[error("product {id} not found")]
    NotFound { id: ProductId },

    /// The product exists but has no offer in the region.
    #[error("product {id} is not available in region {region}")]
    NotAvailableInRegion { id: ProductId, region: RegionId },
}

/// Outcome of the label fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Written in the requested language.
    Translated { locale: LocaleTag, text: String },
    /// Written in the catalog default language.
    Fallback { locale: LocaleTag, text: String },
    /// No label in either language.
    Untranslated,
}

impl Label {
    pub fn text(&self) -> &str {
        match self {
            Label::Translated { text, .. } | Label::Fallback { text, .. } => text,
            Label::Untranslated => UNTRANSLATED,
        }
    }

    /// Locale of the label actually used, if any.
    pub fn locale(&self) -> Option<&LocaleTag> {
        match self {
            Label::Translated { locale, .. } | Label::Fallback { locale, .. } => Some(locale),
            Label::Untranslated => None,
        }
    }
}

/// Translated, region-scoped view of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: ProductId,
    pub label: Label,
    pub offer: Offer,
}

/// Read-optimized product catalog.
///
/// Immutable once built; the API layer swaps whole catalogs instead of
/// mutating one in place.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    default_locale: LocaleTag,
    products: HashMap<ProductId, Product>,
    // ids sorted ascending, used by `list`
    order: Vec<ProductId>,
}

impl ProductCatalog {
    /// Build a catalog. Duplicate product ids are rejected.
    pub fn new(
        default_locale: LocaleTag,
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, DomainError> {
        let mut index = HashMap::new();
        for product in products {
            let id = product.id().clone();
            if index.insert(id.clone(), product).is_some() {
                return Err(DomainError::validation(format!("duplicate product id {id}")));
            }
        }

        let mut order: Vec<ProductId> = index.keys().cloned().collect();
        order.sort();

        Ok(Self {
            default_locale,
            products: index,
            order,
        })
    }

    pub fn empty(default_locale: LocaleTag) -> Self {
        Self {
            default_locale,
            products: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default_locale
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Translated label of a product, independent of any region.
    pub fn label(&self, id: &ProductId, locale: &LocaleTag) -> Result<Label, CatalogError> {
        let product = self.product(id)?;
        Ok(self.translate(product, locale))
    }

    /// Translated product with its offer for `region`.
    pub fn get(
        &self,
        id: &ProductId,
        locale: &LocaleTag,
        region: &RegionId,
    ) -> Result<ProductView, CatalogError> {
        let product = self.product(id)?;
        let offer = product
            .offer(region)
            .ok_or_else(|| CatalogError::NotAvailableInRegion {
                id: id.clone(),
                region: region.clone(),
            })?;

        Ok(ProductView {
            id: id.clone(),
            label: self.translate(product, locale),
            offer,
        })
    }

    /// Products sold in `region`, ordered by id ascending.
    pub fn list(&self, region: &RegionId, locale: &LocaleTag) -> Vec<ProductView> {
        self.order
            .iter()
            .filter_map(|id| self.products.get(id))
            .filter_map(|product| {
                product.offer(region).map(|offer| ProductView {
                    id: product.id().clone(),
                    label: self.translate(product, locale),
                    offer,
                })
            })
            .collect()
    }

    fn product(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.products
            .get(id)
            .ok_or_else(|| CatalogError::NotFound { id: id.clone() })
    }

    fn translate(&self, product: &Product, locale: &LocaleTag) -> Label {
        if let Some((tag, text)) = product.label_for(locale) {
            return Label::Translated {
                locale: tag.clone(),
                text: text.to_string(),
            };
        }
        if let Some((tag, text)) = product.label_for(&self.default_locale) {
            return Label::Fallback {
                locale: tag.clone(),
                text: text.to_string(),
            };
        }
        Label::Untranslated
    }
}
