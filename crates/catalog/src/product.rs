use std::collections::BTreeMap;

use serde::Serialize;

use storefront_core::{DomainError, LocaleTag, Money, ProductId, RegionId};

/// A region-scoped price: the product is sold in `region` for `price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub region: RegionId,
    pub price: Money,
}

/// Product record: per-locale labels plus per-region offers.
///
/// Labels are the translation axis, offers the business axis. A product without
/// an offer for a region is simply not sold there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    labels: BTreeMap<LocaleTag, String>,
    offers: BTreeMap<RegionId, Money>,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            labels: BTreeMap::new(),
            offers: BTreeMap::new(),
        }
    }

    /// Add (or replace) the label for `locale`. Blank labels are rejected.
    pub fn with_label(mut self, locale: LocaleTag, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {}: label for {} must not be empty",
                self.id, locale
            )));
        }
        self.labels.insert(locale, text);
        Ok(self)
    }

    /// Add (or replace) the offer for `region`.
    pub fn with_offer(mut self, region: RegionId, price: Money) -> Self {
        self.offers.insert(region, price);
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn labels(&self) -> &BTreeMap<LocaleTag, String> {
        &self.labels
    }

    pub fn offer(&self, region: &RegionId) -> Option<Offer> {
        self.offers.get(region).map(|price| Offer {
            region: region.clone(),
            price: price.clone(),
        })
    }

    pub fn is_available_in(&self, region: &RegionId) -> bool {
        self.offers.contains_key(region)
    }

    /// Label written in `locale`'s language, if any.
    ///
    /// Tries the full tag, then the language-only tag, then any label sharing
    /// the language (`fr` accepts a `fr-CA` label).
    pub fn label_for(&self, locale: &LocaleTag) -> Option<(&LocaleTag, &str)> {
        if let Some((tag, text)) = self.labels.get_key_value(locale) {
            return Some((tag, text.as_str()));
        }
        if locale.has_region() {
            let language = locale.to_language_only();
            if let Some((tag, text)) = self.labels.get_key_value(&language) {
                return Some((tag, text.as_str()));
            }
        }
        self.labels
            .iter()
            .find(|(tag, _)| tag.language() == locale.language())
            .map(|(tag, text)| (tag, text.as_str()))
    }
}
