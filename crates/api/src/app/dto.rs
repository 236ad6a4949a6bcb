//! Response DTOs and mapping from domain views.

use serde::{Serialize, Serializer};

use storefront_catalog::ProductView;
use storefront_core::Money;

/// Price as `{"value": 19.99, "currency": "EUR"}`.
///
/// Whole amounts are written as JSON integers (`15`, not `15.0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceResponse {
    #[serde(serialize_with = "serialize_value")]
    pub value: Money,
    pub currency: String,
}

fn serialize_value<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    match money.split() {
        (whole, 0) => serializer.serialize_u64(whole),
        _ => serializer.serialize_f64(money.to_major_f64()),
    }
}

impl From<Money> for PriceResponse {
    fn from(money: Money) -> Self {
        Self {
            currency: money.currency().to_string(),
            value: money,
        }
    }
}

/// One product as returned to clients. `price` is omitted when the product is
/// not sold in the requested region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceResponse>,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        Self {
            id: view.id.to_string(),
            label: view.label.text().to_string(),
            price: Some(PriceResponse::from(view.offer.price)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{Label, Offer};
    use storefront_core::{ProductId, RegionId};

    fn view(price: Money) -> ProductView {
        ProductView {
            id: ProductId::new("43").unwrap(),
            label: Label::Translated {
                locale: "fr".parse().unwrap(),
                text: "Un autre produit".to_string(),
            },
            offer: Offer {
                region: RegionId::new("FR").unwrap(),
                price,
            },
        }
    }

    #[test]
    fn product_view_maps_to_wire_shape() {
        let price = Money::from_major(10, "EUR".parse().unwrap()).unwrap();
        let json = serde_json::to_value(ProductResponse::from(view(price))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "43",
                "label": "Un autre produit",
                "price": { "value": 10, "currency": "EUR" }
            })
        );
    }

    #[test]
    fn fractional_price_is_a_decimal_value() {
        let price = Money::from_minor(1999, "EUR".parse().unwrap());
        let json = serde_json::to_value(ProductResponse::from(view(price))).unwrap();
        assert_eq!(json["price"]["value"].as_f64(), Some(19.99));
        assert_eq!(json["price"]["currency"], "EUR");
    }

    #[test]
    fn missing_price_is_omitted() {
        let dto = ProductResponse {
            id: "42".to_string(),
            label: "A great product!".to_string(),
            price: None,
        };
        let json = serde_json::to_value(dto).unwrap();
        assert!(json.get("price").is_none());
    }
}
