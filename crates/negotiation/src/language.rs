//! Language negotiation (`Accept-Language`).

use core::str::FromStr;

use storefront_core::{DomainError, LocaleTag};

/// Highest quality value, `q=1`, in thousandths.
const MAX_QUALITY: u16 = 1000;

/// What a header entry asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Tag(LocaleTag),
    /// `*`: any language.
    Any,
}

/// One `Accept-Language` entry with its quality, in thousandths (`q=0.8` is 800).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedLocale {
    pub candidate: Candidate,
    pub quality: u16,
}

/// How far a candidate may be degraded to find a supported locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocaleMatching {
    /// Full tag only: `fr-FR` never matches `fr`.
    Exact,
    /// Full tag, then language only: `fr-FR` matches `fr`.
    #[default]
    Language,
    /// As `Language`, then any supported tag of the same language:
    /// `fr` matches `fr-CA`.
    AnyRegion,
}

impl FromStr for LocaleMatching {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "language" => Ok(Self::Language),
            "any-region" | "any_region" => Ok(Self::AnyRegion),
            other => Err(DomainError::validation(format!(
                "locale matching must be one of: exact, language, any-region (got {other:?})"
            ))),
        }
    }
}

fn parse_quality(raw: &str) -> Option<u16> {
    let q: f32 = raw.trim().parse().ok()?;
    if !q.is_finite() {
        return None;
    }
    Some((q.clamp(0.0, 1.0) * MAX_QUALITY as f32).round() as u16)
}

/// Parse an `Accept-Language` value into candidates, most preferred first.
///
/// Entries with `q=0`, malformed tags or malformed weights are dropped. Equal
/// weights keep header order.
pub fn parse_accept_language(header: &str) -> Vec<WeightedLocale> {
    let mut out = Vec::new();

    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() {
            continue;
        }

        let mut quality = Some(MAX_QUALITY);
        for param in parts {
            let param = param.trim();
            if let Some(raw) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
                quality = parse_quality(raw);
            }
        }
        let Some(quality) = quality.filter(|q| *q > 0) else {
            continue;
        };

        let candidate = if tag == "*" {
            Candidate::Any
        } else {
            match LocaleTag::parse_lenient(tag) {
                Some(locale) => Candidate::Tag(locale),
                None => continue,
            }
        };
        out.push(WeightedLocale { candidate, quality });
    }

    // stable: ties keep header order
    out.sort_by(|a, b| b.quality.cmp(&a.quality));
    out
}

/// Picks the response language for a request.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    supported: Vec<LocaleTag>,
    default: LocaleTag,
    matching: LocaleMatching,
}

impl LanguageResolver {
    /// The default locale is always part of the supported set.
    pub fn new(
        default: LocaleTag,
        supported: impl IntoIterator<Item = LocaleTag>,
        matching: LocaleMatching,
    ) -> Self {
        let mut tags: Vec<LocaleTag> = Vec::new();
        for tag in std::iter::once(default.clone()).chain(supported) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self {
            supported: tags,
            default,
            matching,
        }
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default
    }

    pub fn supported(&self) -> &[LocaleTag] {
        &self.supported
    }

    pub fn matching(&self) -> LocaleMatching {
        self.matching
    }

    /// Resolve the response locale. An absent or unusable header yields the
    /// default locale.
    pub fn resolve(&self, header: Option<&str>) -> LocaleTag {
        let Some(header) = header else {
            return self.default.clone();
        };

        for weighted in parse_accept_language(header) {
            let found = match &weighted.candidate {
                Candidate::Any => Some(&self.default),
                Candidate::Tag(tag) => self.match_tag(tag),
            };
            if let Some(locale) = found {
                tracing::debug!(header, locale = %locale, "accept-language matched");
                return locale.clone();
            }
        }

        tracing::debug!(header, locale = %self.default, "accept-language unmatched, using default");
        self.default.clone()
    }

    fn match_tag(&self, tag: &LocaleTag) -> Option<&LocaleTag> {
        if let Some(found) = self.supported.iter().find(|s| *s == tag) {
            return Some(found);
        }
        if self.matching == LocaleMatching::Exact {
            return None;
        }

        if tag.has_region() {
            let language = tag.to_language_only();
            if let Some(found) = self.supported.iter().find(|s| **s == language) {
                return Some(found);
            }
        }
        if self.matching == LocaleMatching::AnyRegion {
            return self
                .supported
                .iter()
                .find(|s| s.language() == tag.language());
        }
        None
    }
}

/// One-shot resolution with [`LocaleMatching::Language`].
pub fn resolve(header: Option<&str>, supported: &[LocaleTag], default: &LocaleTag) -> LocaleTag {
    LanguageResolver::new(default.clone(), supported.iter().cloned(), LocaleMatching::Language)
        .resolve(header)
}
