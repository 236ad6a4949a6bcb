//! Business-rule context (region / business unit) from an explicit parameter.
//!
//! The value comes from a query-string parameter or a path segment and is
//! checked against the enumerated valid regions. It is never guessed from
//! `Accept-Language`.

use std::collections::BTreeSet;
use core::str::FromStr;

use thiserror::Error;

use storefront_core::{DomainError, RegionId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocalizationError {
    /// The business parameter is mandatory and was not sent.
    #[error("missing required parameter `{name}`")]
    MissingParameter { name: String },

    /// The parameter was sent but names no known region.
    #[error("unknown region `{value}` for parameter `{name}`")]
    UnknownRegion { name: String, value: String },
}

/// Case policy applied to the raw parameter before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionCase {
    /// Values are compared as sent.
    #[default]
    CaseSensitive,
    /// ASCII upper-case first (`fr` is read as `FR`).
    AsciiUppercase,
}

impl FromStr for RegionCase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(Self::CaseSensitive),
            "upper" | "uppercase" => Ok(Self::AsciiUppercase),
            other => Err(DomainError::validation(format!(
                "region case must be one of: sensitive, upper (got {other:?})"
            ))),
        }
    }
}

/// Resolves the region of a request.
#[derive(Debug, Clone)]
pub struct LocalizationResolver {
    param: String,
    valid: BTreeSet<RegionId>,
    default: Option<RegionId>,
    case: RegionCase,
}

impl LocalizationResolver {
    /// Resolver for a mandatory parameter.
    pub fn required(param: impl Into<String>, valid: impl IntoIterator<Item = RegionId>) -> Self {
        Self {
            param: param.into(),
            valid: valid.into_iter().collect(),
            default: None,
            case: RegionCase::default(),
        }
    }

    /// Resolver for an optional parameter; `default` must be a valid region.
    pub fn optional(
        param: impl Into<String>,
        valid: impl IntoIterator<Item = RegionId>,
        default: RegionId,
    ) -> Result<Self, DomainError> {
        let mut resolver = Self::required(param, valid);
        if !resolver.valid.contains(&default) {
            return Err(DomainError::validation(format!(
                "default region {default} is not one of the valid regions"
            )));
        }
        resolver.default = Some(default);
        Ok(resolver)
    }

    pub fn with_case(mut self, case: RegionCase) -> Self {
        self.case = case;
        self
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn valid_regions(&self) -> &BTreeSet<RegionId> {
        &self.valid
    }

    /// Resolve the region from the raw parameter value, if one was sent.
    pub fn resolve(&self, value: Option<&str>) -> Result<RegionId, LocalizationError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());

        let Some(raw) = value else {
            return match &self.default {
                Some(default) => {
                    tracing::debug!(param = %self.param, region = %default, "region parameter absent, using default");
                    Ok(default.clone())
                }
                None => Err(LocalizationError::MissingParameter {
                    name: self.param.clone(),
                }),
            };
        };

        let folded = match self.case {
            RegionCase::CaseSensitive => raw.to_string(),
            RegionCase::AsciiUppercase => raw.to_ascii_uppercase(),
        };
        let unknown = || LocalizationError::UnknownRegion {
            name: self.param.clone(),
            value: raw.to_string(),
        };

        let region = RegionId::new(&folded).map_err(|_| unknown())?;
        if !self.valid.contains(&region) {
            return Err(unknown());
        }
        Ok(region)
    }
}

/// One-shot resolution. `default = None` makes the parameter required;
/// otherwise an absent value resolves to `default`, which must itself be
/// one of `valid`.
pub fn resolve(
    value: Option<&str>,
    valid: &BTreeSet<RegionId>,
    default: Option<&RegionId>,
) -> Result<RegionId, LocalizationError> {
    const PARAM: &str = "region";
    match default {
        None => LocalizationResolver::required(PARAM, valid.iter().cloned()).resolve(value),
        Some(default) => LocalizationResolver::optional(PARAM, valid.iter().cloned(), default.clone())
            .map_err(|_| LocalizationError::UnknownRegion {
                name: PARAM.to_string(),
                value: default.to_string(),
            })?
            .resolve(value),
    }
}
