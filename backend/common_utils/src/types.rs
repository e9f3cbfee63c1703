//! Amount types used when talking to connectors

use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use common_enums::Currency;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::errors::ParsingError;

/// Amount convertor trait for connector
pub trait AmountConvertor: Send {
    /// Output type for the connector
    type Output;
    /// helps in conversion of connector required amount type
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// helps in converting back connector required amount type to core minor unit
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

/// Connector required amount type
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: StringMajorUnit,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit_as_i64(currency)
    }
}

/// This Unit struct represents MinorUnit in which core amount works
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
)]
pub struct MinorUnit(pub i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Parses a decimal amount in major units, such as `"3.50"`, into minor units of
    /// `currency`. More fractional digits than the currency defines are rejected.
    pub fn from_major_unit_str(
        amount: &str,
        currency: Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let decimal = Decimal::from_str(amount.trim()).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;
        let scale = u32::from(currency.number_of_digits_after_decimal_point());
        let minor = decimal
            .checked_mul(Decimal::from(10_i64.pow(scale)))
            .ok_or(ParsingError::AmountOverflow)?;
        if !minor.fract().is_zero() {
            return Err(ParsingError::StringToDecimalConversionFailure {
                error: format!("{amount} has more than {scale} fractional digits"),
            }
            .into());
        }
        minor
            .to_i64()
            .map(Self)
            .ok_or_else(|| ParsingError::DecimalToI64ConversionFailure.into())
    }

    /// Convert the amount to its major denomination, keeping exactly as many fractional
    /// digits as the currency defines.
    fn to_major_unit_as_string(
        self,
        currency: Currency,
    ) -> Result<StringMajorUnit, error_stack::Report<ParsingError>> {
        let scale = u32::from(currency.number_of_digits_after_decimal_point());
        let amount = Decimal::try_from_i128_with_scale(i128::from(self.0), scale)
            .map_err(|_| ParsingError::I64ToDecimalConversionFailure)?;
        Ok(StringMajorUnit::new(amount.to_string()))
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

/// Connector specific types to send
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, PartialEq, Eq)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// forms a new major unit from amount
    fn new(value: String) -> Self {
        Self(value)
    }

    /// Converts to minor unit as i64 from StringMajorUnit
    fn to_minor_unit_as_i64(
        &self,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let amount_decimal = Decimal::from_str(&self.0).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;

        let multiplier = 10_i64.pow(u32::from(currency.number_of_digits_after_decimal_point()));
        let amount_i64 = (amount_decimal * Decimal::from(multiplier))
            .to_i64()
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?;
        Ok(MinorUnit::new(amount_i64))
    }

    /// forms a new StringMajorUnit default unit i.e zero
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Get string amount from struct
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl Display for StringMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use common_enums::Currency;

    use super::*;

    #[test]
    fn test_amount_conversion_with_currency_decimals() {
        let converter = StringMajorUnitForConnector;
        let amount = MinorUnit::new(12345);

        let converted = converter.convert(amount, Currency::JPY).unwrap();
        assert_eq!(converted.get_amount_as_string(), "12345");

        let converted = converter.convert(amount, Currency::USD).unwrap();
        assert_eq!(converted.get_amount_as_string(), "123.45");

        let converted = converter.convert(amount, Currency::BHD).unwrap();
        assert_eq!(converted.get_amount_as_string(), "12.345");

        let converted = converter.convert(amount, Currency::CLF).unwrap();
        assert_eq!(converted.get_amount_as_string(), "1.2345");
    }

    #[test]
    fn test_amount_conversion_keeps_trailing_zeros() {
        let converter = StringMajorUnitForConnector;

        let converted = converter.convert(MinorUnit::new(350), Currency::USD).unwrap();
        assert_eq!(converted.get_amount_as_string(), "3.50");

        let converted = converter.convert(MinorUnit::new(5), Currency::EUR).unwrap();
        assert_eq!(converted.get_amount_as_string(), "0.05");
    }

    #[test]
    fn test_amount_conversion_round_trip() {
        let converter = StringMajorUnitForConnector;
        let major = converter.convert(MinorUnit::new(2348), Currency::USD).unwrap();
        let minor = converter.convert_back(major, Currency::USD).unwrap();
        assert_eq!(minor, MinorUnit::new(2348));
    }

    #[test]
    fn test_minor_unit_arithmetic() {
        let total = MinorUnit::new(999)
            .checked_mul(2)
            .and_then(|items| items.checked_add(MinorUnit::new(350)));
        assert_eq!(total, Some(MinorUnit::new(2348)));
    }

    #[test]
    fn test_minor_unit_arithmetic_overflow() {
        assert_eq!(MinorUnit::new(i64::MAX).checked_mul(2), None);
        assert_eq!(MinorUnit::new(i64::MAX).checked_add(MinorUnit::new(1)), None);
    }

    #[test]
    fn test_major_unit_text_to_minor_unit() {
        assert_eq!(
            MinorUnit::from_major_unit_str("3.50", Currency::USD).unwrap(),
            MinorUnit::new(350)
        );
        assert_eq!(
            MinorUnit::from_major_unit_str(" 12 ", Currency::USD).unwrap(),
            MinorUnit::new(1200)
        );
        assert_eq!(
            MinorUnit::from_major_unit_str("1500", Currency::JPY).unwrap(),
            MinorUnit::new(1500)
        );
        assert!(MinorUnit::from_major_unit_str("3.505", Currency::USD).is_err());
        assert!(MinorUnit::from_major_unit_str("three", Currency::USD).is_err());
    }
}
