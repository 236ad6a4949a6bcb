//! Catalog import document.
//!
//! The administrative process that owns catalog writes publishes a JSON
//! document; the service only reads it:
//!
//! ```json
//! {
//!   "regions": [{ "id": "FR", "name": "France" }],
//!   "products": [{
//!     "id": "43",
//!     "labels": { "en": "Another product" },
//!     "offers": { "FR": { "value": 9.99, "currency": "EUR" } }
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use storefront_core::{DomainError, DomainResult, LocaleTag, Money, ProductId, RegionId};

use crate::catalog::ProductCatalog;
use crate::product::Product;

/// One entry of the region / business-unit enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: RegionId,
    pub name: String,
}

/// JSON object entries in document order, keys as written.
///
/// Keys are only canonicalized by `into_catalog`, so two spellings of one
/// locale or region (`fr-FR` and `fr_fr`) are reported instead of collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntries<V>(pub Vec<(String, V)>);

impl<V> Default for RawEntries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for RawEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = RawEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Parse every key with `parse`, rejecting keys that name the same value.
fn canonical_entries<K, V>(
    product: &ProductId,
    field: &str,
    entries: RawEntries<V>,
    parse: impl Fn(&str) -> DomainResult<K>,
) -> DomainResult<BTreeMap<K, V>>
where
    K: Ord + fmt::Display,
{
    let mut seen: BTreeMap<K, (String, V)> = BTreeMap::new();
    for (raw, value) in entries.0 {
        let key = parse(&raw)?;
        if let Some((first, _)) = seen.get(&key) {
            return Err(DomainError::validation(format!(
                "product {product}: {field} keys {first:?} and {raw:?} both name {key}"
            )));
        }
        seen.insert(key, (raw, value));
    }
    Ok(seen.into_iter().map(|(key, (_, value))| (key, value)).collect())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    #[serde(default)]
    pub labels: RawEntries<String>,
    #[serde(default)]
    pub offers: RawEntries<Money>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl CatalogDocument {
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::validation(format!("catalog document: {e}")))
    }

    /// Identifiers of the enumerated regions, in document order.
    pub fn region_ids(&self) -> Vec<RegionId> {
        self.regions.iter().map(|r| r.id.clone()).collect()
    }

    /// Display name of an enumerated region.
    pub fn region_name(&self, id: &RegionId) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.name.as_str())
    }

    /// Build the read-side catalog from the document.
    pub fn into_catalog(self, default_locale: LocaleTag) -> DomainResult<ProductCatalog> {
        let mut products = Vec::with_capacity(self.products.len());
        let mut offers = 0usize;
        for record in self.products {
            let labels = canonical_entries(&record.id, "label", record.labels, |raw| raw.parse::<LocaleTag>())?;
            let prices = canonical_entries(&record.id, "offer", record.offers, |raw| RegionId::new(raw))?;

            let mut product = Product::new(record.id);
            for (locale, text) in labels {
                product = product.with_label(locale, text)?;
            }
            for (region, price) in prices {
                offers += 1;
                product = product.with_offer(region, price);
            }
            products.push(product);
        }

        let catalog = ProductCatalog::new(default_locale, products)?;
        tracing::info!(
            products = catalog.len(),
            offers,
            default_locale = %catalog.default_locale(),
            "catalog imported"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "regions": [
            { "id": "BU_EUR", "name": "Europe" },
            { "id": "BU_US", "name": "United States" }
        ],
        "products": [
            {
                "id": "43",
                "labels": { "en": "Another product", "fr-FR": "Un autre produit" },
                "offers": { "BU_EUR": { "value": 9.99, "currency": "eur" } }
            },
            { "id": "42", "labels": { "en": "A great product!" } }
        ]
    }"#;

    #[test]
    fn document_builds_catalog_and_enumerates_regions() {
        let doc = CatalogDocument::from_json(DOC).unwrap();
        assert_eq!(
            doc.region_ids(),
            vec![RegionId::new("BU_EUR").unwrap(), RegionId::new("BU_US").unwrap()]
        );

        let catalog = doc.into_catalog("en".parse().unwrap()).unwrap();
        assert_eq!(catalog.len(), 2);

        let views = catalog.list(&RegionId::new("BU_EUR").unwrap(), &"fr-FR".parse().unwrap());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].label.text(), "Un autre produit");
        assert_eq!(views[0].offer.price.currency().as_str(), "EUR");
        assert_eq!(views[0].offer.price.minor(), 999);
    }

    #[test]
    fn region_names_come_from_the_enumeration() {
        let doc = CatalogDocument::from_json(DOC).unwrap();
        assert_eq!(doc.region_name(&RegionId::new("BU_US").unwrap()), Some("United States"));
        assert_eq!(doc.region_name(&RegionId::new("FR").unwrap()), None);
    }

    #[test]
    fn malformed_locale_key_is_rejected() {
        let raw = r#"{ "products": [{ "id": "1", "labels": { "not a tag": "x" } }] }"#;
        let doc = CatalogDocument::from_json(raw).unwrap();
        let err = doc.into_catalog("en".parse().unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidLocale(_)));
    }

    #[test]
    fn fractional_price_is_imported() {
        let raw = r#"{ "products": [{
            "id": "1",
            "labels": { "en": "x" },
            "offers": { "FR": { "amount": 19.99, "currency": "EUR" } }
        }] }"#;
        let catalog = CatalogDocument::from_json(raw)
            .unwrap()
            .into_catalog("en".parse().unwrap())
            .unwrap();
        let views = catalog.list(&RegionId::new("FR").unwrap(), &"en".parse().unwrap());
        assert_eq!(views[0].offer.price.minor(), 1999);
    }

    #[test]
    fn price_with_too_many_decimals_is_rejected() {
        let raw = r#"{ "products": [{ "id": "1", "offers": { "FR": { "value": 1.005, "currency": "EUR" } } }] }"#;
        assert!(CatalogDocument::from_json(raw).is_err());
    }

    #[test]
    fn label_keys_naming_the_same_locale_are_rejected() {
        let raw = r#"{ "products": [{ "id": "1", "labels": { "fr-FR": "premier", "fr_fr": "second" } }] }"#;
        let err = CatalogDocument::from_json(raw)
            .unwrap()
            .into_catalog("en".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("fr_fr")));
    }

    #[test]
    fn offer_keys_naming_the_same_region_are_rejected() {
        let raw = r#"{ "products": [{ "id": "1", "offers": {
            "FR": { "value": 1, "currency": "EUR" },
            " FR": { "value": 2, "currency": "EUR" }
        } }] }"#;
        let err = CatalogDocument::from_json(raw)
            .unwrap()
            .into_catalog("en".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn repeated_literal_key_is_rejected() {
        let raw = r#"{ "products": [{ "id": "1", "labels": { "en": "a", "en": "b" } }] }"#;
        let doc = CatalogDocument::from_json(raw).unwrap();
        assert!(doc.into_catalog("en".parse().unwrap()).is_err());
    }

    #[test]
    fn duplicate_products_are_rejected_on_import() {
        let raw = r#"{ "products": [{ "id": "1" }, { "id": "1" }] }"#;
        let doc = CatalogDocument::from_json(raw).unwrap();
        assert!(doc.into_catalog("en".parse().unwrap()).is_err());
    }
}
