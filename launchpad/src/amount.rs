use alloy::primitives::{
    utils::{format_units, parse_units, ParseUnits},
    U256,
};

use crate::error::{Result, SdkError};

/// Parses a non-negative decimal string into base units.
pub fn parse_amount(field: &'static str, value: &str, decimals: u8) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SdkError::validation(field, "amount is empty"));
    }
    match parse_units(value, decimals) {
        Ok(ParseUnits::U256(amount)) => Ok(amount),
        Ok(ParseUnits::I256(_)) => Err(SdkError::validation(field, "amount must not be negative")),
        Err(err) => Err(SdkError::validation(field, format!("{value:?} is not a number: {err}"))),
    }
}

pub fn parse_positive_amount(field: &'static str, value: &str, decimals: u8) -> Result<U256> {
    let amount = parse_amount(field, value, decimals)?;
    if amount.is_zero() {
        return Err(SdkError::validation(field, "amount must be greater than zero"));
    }
    Ok(amount)
}

/// Formats base units as a decimal string without trailing zeros ("12.5", "20").
pub fn format_amount(amount: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(amount, decimals)
        .map_err(|err| SdkError::validation("amount", err.to_string()))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}

/// `nominal + fee + max(nominal / 10, 1)` in base units.
pub fn cushioned_allowance(nominal: U256, fee: U256) -> U256 {
    let cushion = (nominal / U256::from(10)).max(U256::from(1));
    nominal.saturating_add(fee).saturating_add(cushion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("seed", "20", 6).unwrap(), U256::from(20_000_000u64));
        assert_eq!(parse_amount("seed", " 1.5 ", 6).unwrap(), U256::from(1_500_000u64));
        assert!(parse_amount("seed", "abc", 6).is_err());
        assert!(parse_amount("seed", "", 6).is_err());
        assert!(matches!(
            parse_amount("seed", "-1", 6),
            Err(SdkError::Validation { field: "seed", .. })
        ));
    }

    #[test]
    fn test_parse_positive_amount() {
        assert!(parse_positive_amount("usdcIn", "0", 6).is_err());
        assert!(parse_positive_amount("usdcIn", "0.000001", 6).is_ok());
    }

    #[test]
    fn test_format_amount_trims() {
        assert_eq!(format_amount(U256::from(12_500_000u64), 6).unwrap(), "12.5");
        assert_eq!(format_amount(U256::from(20_000_000u64), 6).unwrap(), "20");
        assert_eq!(format_amount(U256::from(1u64), 6).unwrap(), "0.000001");
    }

    #[test]
    fn test_cushion_is_ten_percent() {
        let nominal = parse_amount("usdcIn", "10", 6).unwrap();
        let fee = parse_amount("feePaid", "1.5", 6).unwrap();
        let approve = cushioned_allowance(nominal, fee);
        assert_eq!(format_amount(approve, 6).unwrap(), "12.5");
    }

    #[test]
    fn test_cushion_floor_is_one_unit() {
        let approve = cushioned_allowance(U256::from(5u64), U256::ZERO);
        assert_eq!(approve, U256::from(6u64));
    }
}
