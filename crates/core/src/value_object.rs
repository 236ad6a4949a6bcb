//! Value object trait: equality by value, not identity.
//!
//! Locale tags, currency codes and prices have **no identity**: two values with
//! the same attributes are the same value.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// let a = Money::from_minor(1000, "EUR".parse()?);
/// let b = Money::from_minor(1000, "EUR".parse()?);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
