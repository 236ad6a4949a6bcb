//! Prices attached to regional offers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Three-letter currency code (`EUR`, `USD`), stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl ValueObject for CurrencyCode {}

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(DomainError::invalid_currency(trimmed));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currencies whose amounts carry no minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["CLP", "ISK", "JPY", "KRW", "VND", "XAF", "XOF"];

impl CurrencyCode {
    /// Number of decimal places of the minor unit (`2` for EUR, `0` for JPY).
    pub fn minor_digits(&self) -> u32 {
        if ZERO_DECIMAL_CURRENCIES.contains(&self.0.as_str()) {
            0
        } else {
            2
        }
    }

    /// Minor units per major unit (`100` for EUR, `1` for JPY).
    pub fn minor_scale(&self) -> u64 {
        10u64.pow(self.minor_digits())
    }
}

/// Amount plus currency.
///
/// The amount is stored in the smallest currency unit (cents for EUR), so
/// `19.99 EUR` is `1999`. On the wire it is a decimal number of major units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRecord", into = "MoneyRecord")]
pub struct Money {
    minor: u64,
    currency: CurrencyCode,
}

impl ValueObject for Money {}

impl Money {
    pub fn from_minor(minor: u64, currency: CurrencyCode) -> Self {
        Self { minor, currency }
    }

    /// Whole major units (`Money::from_major(15, eur)` is `15.00 EUR`).
    pub fn from_major(amount: u64, currency: CurrencyCode) -> DomainResult<Self> {
        let minor = amount
            .checked_mul(currency.minor_scale())
            .ok_or_else(|| DomainError::validation(format!("amount {amount} {currency} is out of range")))?;
        Ok(Self { minor, currency })
    }

    /// Decimal amount in major units, as published by the catalog import.
    ///
    /// Rejects negative, non-finite and out-of-range amounts, and amounts with
    /// more decimals than the currency's minor unit.
    pub fn from_decimal(amount: f64, currency: CurrencyCode) -> DomainResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "amount {amount} {currency} must be a non-negative number"
            )));
        }
        let scaled = amount * currency.minor_scale() as f64;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(DomainError::validation(format!(
                "amount {amount} {currency} has more than {} decimal places",
                currency.minor_digits()
            )));
        }
        if rounded >= u64::MAX as f64 {
            return Err(DomainError::validation(format!("amount {amount} {currency} is out of range")));
        }
        Ok(Self {
            minor: rounded as u64,
            currency,
        })
    }

    /// Amount in the smallest currency unit.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Whole major units and the remaining minor units.
    pub fn split(&self) -> (u64, u64) {
        let scale = self.currency.minor_scale();
        (self.minor / scale, self.minor % scale)
    }

    /// Amount in major units as a float, for display and JSON output.
    pub fn to_major_f64(&self) -> f64 {
        self.minor as f64 / self.currency.minor_scale() as f64
    }
}

/// Serialized form: `{"value": 19.99, "currency": "EUR"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoneyRecord {
    #[serde(alias = "amount")]
    value: f64,
    currency: CurrencyCode,
}

impl TryFrom<MoneyRecord> for Money {
    type Error = DomainError;

    fn try_from(record: MoneyRecord) -> Result<Self, Self::Error> {
        Money::from_decimal(record.value, record.currency)
    }
}

impl From<Money> for MoneyRecord {
    fn from(money: Money) -> Self {
        Self {
            value: money.to_major_f64(),
            currency: money.currency,
        }
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (whole, fraction) = self.split();
        match self.currency.minor_digits() {
            0 => write!(f, "{whole} {}", self.currency),
            digits => write!(
                f,
                "{whole}.{fraction:0width$} {}",
                self.currency,
                width = digits as usize
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_upper_cased() {
        let eur: CurrencyCode = "eur".parse().unwrap();
        assert_eq!(eur.as_str(), "EUR");
    }

    #[test]
    fn malformed_currency_is_rejected() {
        assert!(matches!("EURO".parse::<CurrencyCode>(), Err(DomainError::InvalidCurrency(_))));
        assert!("E1R".parse::<CurrencyCode>().is_err());
    }

    fn eur() -> CurrencyCode {
        "EUR".parse().unwrap()
    }

    #[test]
    fn money_deserializes_from_offer_json() {
        let money: Money = serde_json::from_str(r#"{"value": 20, "currency": "USD"}"#).unwrap();
        assert_eq!(money, Money::from_major(20, "USD".parse().unwrap()).unwrap());
        assert_eq!(money.minor(), 2000);
        assert_eq!(money.to_string(), "20.00 USD");
    }

    #[test]
    fn fractional_amounts_are_kept_in_minor_units() {
        let money: Money = serde_json::from_str(r#"{"amount": 19.99, "currency": "eur"}"#).unwrap();
        assert_eq!(money, Money::from_minor(1999, eur()));
        assert_eq!(money.split(), (19, 99));
        assert_eq!(money.to_string(), "19.99 EUR");
        assert_eq!(Money::from_decimal(0.1, eur()).unwrap().minor(), 10);
    }

    #[test]
    fn zero_decimal_currency_has_no_minor_unit() {
        let yen = Money::from_decimal(1500.0, "JPY".parse().unwrap()).unwrap();
        assert_eq!(yen.minor(), 1500);
        assert_eq!(yen.to_string(), "1500 JPY");
        assert!(Money::from_decimal(10.5, "JPY".parse().unwrap()).is_err());
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        assert!(Money::from_decimal(-1.0, eur()).is_err());
        assert!(Money::from_decimal(f64::NAN, eur()).is_err());
        assert!(Money::from_decimal(1.005, eur()).is_err());
        assert!(Money::from_major(u64::MAX, eur()).is_err());
    }

    #[test]
    fn money_serializes_major_units() {
        let json = serde_json::to_value(Money::from_minor(1999, eur())).unwrap();
        assert_eq!(json["value"].as_f64(), Some(19.99));
        assert_eq!(json["currency"], "EUR");
    }
}
