//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary amounts are stored and transmitted as `f64` (the wire format),
//! but every aggregation runs on `Decimal` internally so report totals never
//! accumulate float error.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert an f64 wire amount to a Decimal, rounded to cents
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(DECIMAL_PLACES)
}

/// Convert a Decimal back to the f64 wire representation
pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(DECIMAL_PLACES).to_f64().unwrap_or(0.0)
}

/// Sum an iterator of f64 amounts exactly
pub fn sum_amounts<I: IntoIterator<Item = f64>>(amounts: I) -> Decimal {
    amounts.into_iter().map(to_decimal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        let sum_f64 = a + b;

        // f64 fails
        assert_ne!(sum_f64, 0.3);

        // Decimal succeeds
        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let total = sum_amounts(std::iter::repeat_n(0.01, 1000));
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_non_finite_amounts_become_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
