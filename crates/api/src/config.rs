//! Service configuration from environment variables.
//!
//! Every variable has a development default; invalid values fail startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

use storefront_core::{LocaleTag, RegionId};
use storefront_negotiation::{LocaleMatching, RegionCase};

pub const ENV_BIND: &str = "STOREFRONT_BIND";
pub const ENV_CATALOG: &str = "STOREFRONT_CATALOG";
pub const ENV_DEFAULT_LOCALE: &str = "STOREFRONT_DEFAULT_LOCALE";
pub const ENV_SUPPORTED_LOCALES: &str = "STOREFRONT_SUPPORTED_LOCALES";
pub const ENV_LOCALE_MATCHING: &str = "STOREFRONT_LOCALE_MATCHING";
pub const ENV_REGION_PARAM: &str = "STOREFRONT_REGION_PARAM";
pub const ENV_REGION_PATH_SEGMENT: &str = "STOREFRONT_REGION_PATH_SEGMENT";
pub const ENV_REGION_REQUIRED: &str = "STOREFRONT_REGION_REQUIRED";
pub const ENV_DEFAULT_REGION: &str = "STOREFRONT_DEFAULT_REGION";
pub const ENV_REGION_CASE: &str = "STOREFRONT_REGION_CASE";
pub const ENV_VALID_REGIONS: &str = "STOREFRONT_VALID_REGIONS";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_SUPPORTED_LOCALES: &str = "en,fr";
const DEFAULT_REGION_PARAM: &str = "country";
const DEFAULT_REGION_PATH_SEGMENT: &str = "countries";

/// Path segments already taken by fixed routes.
const RESERVED_SEGMENTS: &[&str] = &["health", "products"];

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Catalog import document; `None` uses the bundled demo catalog.
    pub catalog_path: Option<PathBuf>,
    pub default_locale: LocaleTag,
    pub supported_locales: Vec<LocaleTag>,
    pub locale_matching: LocaleMatching,
    /// Query-string parameter carrying the region (`?country=FR`).
    pub region_param: String,
    /// Path prefix of region-scoped routes (`/countries/FR/products`).
    pub region_path_segment: String,
    /// `None` means the region parameter is mandatory.
    pub default_region: Option<RegionId>,
    pub region_case: RegionCase,
    /// `None` takes the enumeration of the catalog document.
    pub valid_regions: Option<Vec<RegionId>>,
}

fn parse_bool(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name}: expected a boolean, got {other:?}"),
    }
}

fn parse_list<T, E>(name: &str, raw: &str, parse: impl Fn(&str) -> Result<T, E>) -> anyhow::Result<Vec<T>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse(item).with_context(|| format!("{name}: invalid entry {item:?}")))
        .collect()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str, default: &str| non_empty(&lookup, name).unwrap_or_else(|| default.to_string());

        let raw = get(ENV_BIND, DEFAULT_BIND);
        let bind_addr: SocketAddr = raw
            .parse()
            .with_context(|| format!("{ENV_BIND}: invalid socket address {raw:?}"))?;

        let catalog_path = non_empty(&lookup, ENV_CATALOG).map(PathBuf::from);

        let raw = get(ENV_DEFAULT_LOCALE, DEFAULT_LOCALE);
        let default_locale: LocaleTag = raw
            .parse()
            .with_context(|| format!("{ENV_DEFAULT_LOCALE}: invalid locale {raw:?}"))?;

        let raw = get(ENV_SUPPORTED_LOCALES, DEFAULT_SUPPORTED_LOCALES);
        let mut supported_locales = parse_list(ENV_SUPPORTED_LOCALES, &raw, |s| s.parse::<LocaleTag>())?;
        if !supported_locales.contains(&default_locale) {
            supported_locales.insert(0, default_locale.clone());
        }

        let locale_matching: LocaleMatching = match non_empty(&lookup, ENV_LOCALE_MATCHING) {
            Some(raw) => raw.parse().context(ENV_LOCALE_MATCHING)?,
            None => LocaleMatching::default(),
        };

        let region_param = get(ENV_REGION_PARAM, DEFAULT_REGION_PARAM);

        let raw = get(ENV_REGION_PATH_SEGMENT, DEFAULT_REGION_PATH_SEGMENT);
        let region_path_segment = raw.trim_matches('/').to_string();
        if region_path_segment.is_empty()
            || region_path_segment.contains('/')
            || RESERVED_SEGMENTS.contains(&region_path_segment.as_str())
        {
            bail!("{ENV_REGION_PATH_SEGMENT}: {raw:?} is not a usable path segment");
        }

        let region_case: RegionCase = match non_empty(&lookup, ENV_REGION_CASE) {
            Some(raw) => raw.parse().context(ENV_REGION_CASE)?,
            None => RegionCase::default(),
        };

        let required = match non_empty(&lookup, ENV_REGION_REQUIRED) {
            Some(raw) => parse_bool(ENV_REGION_REQUIRED, &raw)?,
            None => true,
        };
        let default_region = non_empty(&lookup, ENV_DEFAULT_REGION)
            .map(|raw| RegionId::new(&raw))
            .transpose()
            .context(ENV_DEFAULT_REGION)?;
        let default_region = match (required, default_region) {
            (true, Some(region)) => {
                tracing::warn!(%region, "{ENV_DEFAULT_REGION} ignored: region parameter is required");
                None
            }
            (true, None) => None,
            (false, Some(region)) => Some(region),
            (false, None) => {
                bail!("{ENV_REGION_REQUIRED}=false needs {ENV_DEFAULT_REGION} to be set")
            }
        };

        let valid_regions = non_empty(&lookup, ENV_VALID_REGIONS)
            .map(|raw| parse_list(ENV_VALID_REGIONS, &raw, |s| RegionId::new(s)))
            .transpose()?;

        Ok(Self {
            bind_addr,
            catalog_path,
            default_locale,
            supported_locales,
            locale_matching,
            region_param,
            region_path_segment,
            default_region,
            region_case,
            valid_regions,
        })
    }

    pub fn region_required(&self) -> bool {
        self.default_region.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ServiceConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_require_the_country_parameter() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.region_param, "country");
        assert_eq!(cfg.region_path_segment, "countries");
        assert!(cfg.region_required());
        assert_eq!(cfg.default_locale.to_string(), "en");
        assert_eq!(cfg.locale_matching, LocaleMatching::Language);
        assert!(cfg.valid_regions.is_none());
    }

    #[test]
    fn default_locale_is_always_supported() {
        let cfg = config(&[
            (ENV_DEFAULT_LOCALE, "de-DE"),
            (ENV_SUPPORTED_LOCALES, "fr, en"),
        ])
        .unwrap();
        let tags: Vec<String> = cfg.supported_locales.iter().map(|t| t.to_string()).collect();
        assert_eq!(tags, vec!["de-DE", "fr", "en"]);
    }

    #[test]
    fn optional_region_needs_a_default() {
        assert!(config(&[(ENV_REGION_REQUIRED, "false")]).is_err());

        let cfg = config(&[
            (ENV_REGION_REQUIRED, "false"),
            (ENV_DEFAULT_REGION, "FR"),
            (ENV_VALID_REGIONS, "FR,US"),
        ])
        .unwrap();
        assert!(!cfg.region_required());
        assert_eq!(cfg.default_region, Some(RegionId::new("FR").unwrap()));
        assert_eq!(cfg.valid_regions.unwrap().len(), 2);
    }

    #[test]
    fn business_unit_parameter_and_policies_are_configurable() {
        let cfg = config(&[
            (ENV_REGION_PARAM, "business-unit"),
            (ENV_REGION_PATH_SEGMENT, "/business-units/"),
            (ENV_REGION_CASE, "upper"),
            (ENV_LOCALE_MATCHING, "exact"),
        ])
        .unwrap();
        assert_eq!(cfg.region_param, "business-unit");
        assert_eq!(cfg.region_path_segment, "business-units");
        assert_eq!(cfg.region_case, RegionCase::AsciiUppercase);
        assert_eq!(cfg.locale_matching, LocaleMatching::Exact);
    }

    #[test]
    fn invalid_values_fail() {
        assert!(config(&[(ENV_BIND, "not-an-addr")]).is_err());
        assert!(config(&[(ENV_DEFAULT_LOCALE, "??")]).is_err());
        assert!(config(&[(ENV_REGION_REQUIRED, "maybe")]).is_err());
        assert!(config(&[(ENV_REGION_PATH_SEGMENT, "products")]).is_err());
        assert!(config(&[(ENV_SUPPORTED_LOCALES, "en,xx-YYY")]).is_err());
    }
}
