//! `storefront-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage): the
//! identifiers of the two adaptation axes (locale for translation, region for
//! business rules) and the money type used by regional offers.

pub mod error;
pub mod id;
pub mod locale;
pub mod money;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, RegionId};
pub use locale::LocaleTag;
pub use money::{CurrencyCode, Money};
pub use value_object::ValueObject;
