//! Monetary values as stored in `NUMERIC(10, 2)` columns.

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Two fractional digits, eight integral digits.
pub const SCALE: u32 = 2;
const MAX_EXCLUSIVE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Checks `value` fits a money column and returns it at scale 2.
///
/// Negative values, sub-cent precision and values of 10^8 or more are
/// rejected instead of being rounded or overflowing in the store.
pub fn check_amount(field: &str, value: Decimal) -> AppResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    let mut normalized = value.normalize();
    if normalized.scale() > SCALE {
        return Err(AppError::BadRequest(format!(
            "{field} must have at most two decimal places"
        )));
    }
    if normalized >= MAX_EXCLUSIVE {
        return Err(AppError::BadRequest(format!("{field} is out of range")));
    }
    normalized.rescale(SCALE);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn accepts_cents_and_pads_scale() {
        assert_eq!(check_amount("price", dec("14.5")).unwrap().to_string(), "14.50");
        assert_eq!(check_amount("price", dec("1.500")).unwrap().to_string(), "1.50");
        assert_eq!(check_amount("price", dec("0")).unwrap().to_string(), "0.00");
        assert_eq!(
            check_amount("price", dec("99999999.99")).unwrap().to_string(),
            "99999999.99"
        );
    }

    #[test]
    fn rejects_what_the_column_cannot_hold() {
        for bad in ["1.005", "0.001", "100000000", "123456789.5", "-1"] {
            assert!(
                matches!(check_amount("price", dec(bad)), Err(AppError::BadRequest(_))),
                "{bad}"
            );
        }
    }
}
