use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::RealtyCalcError;
use crate::types::{Money, Rate};
use crate::RealtyCalcResult;

/// Payment (PMT), payments due at the end of each period.
///
/// Uses the spreadsheet sign convention: a positive `present_value` (money
/// received) yields a negative payment, so a loan of `P` is amortized by
/// `pmt(rate, n, -P, 0)`.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> RealtyCalcResult<Money> {
    if nper == 0 {
        return Err(RealtyCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let one_plus_r = Decimal::ONE + rate;
    let factor = one_plus_r
        .checked_powu(u64::from(nper))
        .ok_or_else(|| RealtyCalcError::Overflow {
            context: format!("PMT growth factor (1 + {rate})^{nper}"),
        })?;
    let annuity_denominator = factor - Decimal::ONE;

    if annuity_denominator.is_zero() {
        return Err(RealtyCalcError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let numerator = present_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(future_value))
        .ok_or_else(|| RealtyCalcError::Overflow {
            context: "PMT present value term".into(),
        })?;

    Ok(rate / annuity_denominator * -numerator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pmt_thirty_year_mortgage() {
        // 200k at 6% / 12 over 360 months => ~1199.10
        let result = pmt(dec!(0.005), 360, dec!(-200000), Decimal::ZERO).unwrap();
        assert!((result - dec!(1199.10)).abs() < dec!(0.01), "got {result}");
    }

    #[test]
    fn test_pmt_zero_rate() {
        let result = pmt(Decimal::ZERO, 10, dec!(-1000), Decimal::ZERO).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_pmt_sign_convention() {
        let result = pmt(dec!(0.01), 12, dec!(1000), Decimal::ZERO).unwrap();
        assert!(result < Decimal::ZERO);
    }

    #[test]
    fn test_pmt_zero_periods_error() {
        assert!(pmt(dec!(0.01), 0, dec!(-1000), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_pmt_overflow_is_error() {
        // 101^600 does not fit in 96 bits
        let result = pmt(dec!(100), 600, dec!(-1000), Decimal::ZERO);
        assert!(matches!(result, Err(RealtyCalcError::Overflow { .. })));
    }
}
