//! Amount type for handling monetary values from statement exports.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may use a decimal comma or spaces as thousands separators, as found in bank statement exports.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount from a statement row.
///
/// This type wraps `Decimal` and provides custom serialization to emit amounts as JSON numbers
/// rounded to two decimal places, which is the format consumers of the report JSON expect.
///
/// # Examples
///
/// Parsing a plain decimal:
/// ```
/// # use opstat::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-160.89").unwrap();
/// assert!(amount.is_negative());
/// ```
///
/// Parsing an export that uses a decimal comma:
/// ```
/// # use opstat::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-160,89").unwrap();
/// let b = Amount::from_str("-160.89").unwrap();
/// assert_eq!(a.value(), b.value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value rounded to two decimal places, half away from zero.
    pub fn rounded(&self) -> Decimal {
        self.value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative, i.e. an expense.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.value.abs())
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Remove whitespace, including non-breaking spaces used as thousands separators
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if cleaned.is_empty() {
            return Ok(Amount::default());
        }

        // A comma is a decimal separator when it is the only separator present; when a period
        // is also present the comma is a thousands separator.
        let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
            cleaned.replace(',', ".")
        } else {
            cleaned.replace(',', "")
        };

        let value = Decimal::from_str(&normalized).map_err(AmountError)?;
        Ok(Amount { value })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rounded())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as a JSON number with two decimal places
        serializer.serialize_f64(self.rounded().to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Ok(Amount::new(value))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("-160.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-160.89").unwrap());
    }

    #[test]
    fn test_parse_decimal_comma() {
        let amount = Amount::from_str("-160,89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-160.89").unwrap());
    }

    #[test]
    fn test_parse_space_thousands() {
        let amount = Amount::from_str("1 234,56").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn test_parse_comma_thousands_with_period() {
        let amount = Amount::from_str("1,234.56").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("сто рублей").is_err());
    }

    #[test]
    fn test_zero_is_not_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_is_negative() {
        assert!(Amount::from_str("-64.00").unwrap().is_negative());
        assert!(!Amount::from_str("64.00").unwrap().is_negative());
    }

    #[test]
    fn test_abs() {
        let amount = Amount::from_str("-42.01").unwrap();
        assert_eq!(amount.abs().value(), Decimal::from_str("42.01").unwrap());
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(
            Amount::from_str("2.005").unwrap().rounded(),
            Decimal::from_str("2.01").unwrap()
        );
        assert_eq!(
            Amount::from_str("-2.005").unwrap().rounded(),
            Decimal::from_str("-2.01").unwrap()
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("342.01").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "342.01");
    }

    #[test]
    fn test_serialize_rounds_to_two_decimals() {
        let amount = Amount::from_str("3.4201").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "3.42");
    }
}
