//! Quantity parsing for `qCom` values.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ExtractionError;

/// Parse a decimal quantity and truncate it toward zero.
///
/// Accepts plain (`12.5000`) and scientific (`1.2e1`) notation.
pub fn parse_quantity(value: &str) -> Result<i64, ExtractionError> {
    let trimmed = value.trim();
    let decimal = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| parse_error(value))?;

    decimal.trunc().to_i64().ok_or_else(|| parse_error(value))
}

fn parse_error(value: &str) -> ExtractionError {
    ExtractionError::Parse {
        field: "qCom".to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_not_rounds() {
        assert_eq!(parse_quantity("10.0000").unwrap(), 10);
        assert_eq!(parse_quantity("2.9999").unwrap(), 2);
        assert_eq!(parse_quantity("-2.5").unwrap(), -2);
        assert_eq!(parse_quantity(" 7 ").unwrap(), 7);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_quantity("1.5e2").unwrap(), 150);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_quantity("dez"), Err(ExtractionError::Parse { .. })));
        assert!(matches!(parse_quantity(""), Err(ExtractionError::Parse { .. })));
    }
}
