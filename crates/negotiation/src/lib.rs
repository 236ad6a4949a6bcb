//! Request-time resolution of the two adaptation axes.
//!
//! - [`language`]: translation, negotiated through `Accept-Language`. Never fails.
//! - [`localization`]: business rules, read from an explicit request parameter.
//!
//! The resolvers share no input: a locale is never derived from the region
//! parameter, and a region is never derived from the negotiation header.

pub mod language;
pub mod localization;

pub use language::{Candidate, LanguageResolver, LocaleMatching, WeightedLocale, parse_accept_language};
pub use localization::{LocalizationError, LocalizationResolver, RegionCase};
