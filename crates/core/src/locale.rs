//! Locale tags (translation axis).
//!
//! A locale tag only selects the language of labels. It never carries business
//! meaning: the `FR` of `fr-FR` is not a sales region.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Language subtag plus optional region subtag (`fr`, `fr-FR`).
///
/// Stored in canonical case: language lower-case, region upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag {
    language: String,
    region: Option<String>,
}

impl ValueObject for LocaleTag {}

fn is_language(subtag: &str) -> bool {
    (2..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_region(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit()))
}

impl LocaleTag {
    /// Language-only tag (`fr`).
    pub fn language_only(language: &str) -> Result<Self, DomainError> {
        if !is_language(language) {
            return Err(DomainError::invalid_locale(language));
        }
        Ok(Self {
            language: language.to_ascii_lowercase(),
            region: None,
        })
    }

    /// Language plus region tag (`fr-FR`).
    pub fn with_region(language: &str, region: &str) -> Result<Self, DomainError> {
        if !is_region(region) {
            return Err(DomainError::invalid_locale(format!("{language}-{region}")));
        }
        let mut tag = Self::language_only(language)?;
        tag.region = Some(region.to_ascii_uppercase());
        Ok(tag)
    }

    /// Parse a tag as found in an `Accept-Language` header.
    ///
    /// Unlike [`FromStr`], extra subtags (script, variants, extensions) are
    /// tolerated and dropped: `zh-Hant-TW` becomes `zh-TW`.
    pub fn parse_lenient(input: &str) -> Option<Self> {
        let mut parts = input.trim().split(['-', '_']);
        let language = parts.next()?;
        let mut tag = Self::language_only(language).ok()?;
        tag.region = parts
            .find(|subtag| is_region(subtag))
            .map(str::to_ascii_uppercase);
        Some(tag)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same tag with the region subtag removed.
    pub fn to_language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }
}

impl core::fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for LocaleTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Self::language_only(language),
            (Some(region), None) => Self::with_region(language, region),
            (Some(_), Some(_)) => Err(DomainError::invalid_locale(trimmed)),
        }
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LocaleTag> for String {
    fn from(value: LocaleTag) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_region_in_canonical_case() {
        let tag: LocaleTag = "FR_fr".parse().unwrap();
        assert_eq!(tag.language(), "fr");
        assert_eq!(tag.region(), Some("FR"));
        assert_eq!(tag.to_string(), "fr-FR");
    }

    #[test]
    fn numeric_region_is_accepted() {
        let tag: LocaleTag = "es-419".parse().unwrap();
        assert_eq!(tag.region(), Some("419"));
    }

    #[test]
    fn strict_parse_rejects_extra_subtags() {
        assert!("zh-Hant-TW".parse::<LocaleTag>().is_err());
        assert!("".parse::<LocaleTag>().is_err());
        assert!("f".parse::<LocaleTag>().is_err());
        assert!("fr-FRA".parse::<LocaleTag>().is_err());
    }

    #[test]
    fn lenient_parse_keeps_language_and_region() {
        let tag = LocaleTag::parse_lenient("zh-Hant-TW").unwrap();
        assert_eq!(tag.to_string(), "zh-TW");
        assert_eq!(LocaleTag::parse_lenient("en").unwrap().to_string(), "en");
        assert!(LocaleTag::parse_lenient("*").is_none());
    }

    #[test]
    fn language_only_drops_region() {
        let tag: LocaleTag = "en-US".parse().unwrap();
        assert_eq!(tag.to_language_only(), LocaleTag::language_only("en").unwrap());
        assert!(!tag.to_language_only().has_region());
    }
}
