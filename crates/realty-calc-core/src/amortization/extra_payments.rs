use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RealtyCalcError;
use crate::format::round_cents;
use crate::types::Money;
use crate::RealtyCalcResult;

/// Extra amounts below this are treated as "no extra payment".
const EXTRA_EPSILON: Decimal = dec!(0.005);

/// Sparse map of payment number (1-based) to extra principal paid in that
/// period. Only strictly positive amounts are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<u32, Money>", into = "BTreeMap<u32, Money>")]
pub struct ExtraPaymentMap {
    entries: BTreeMap<u32, Money>,
}

/// Result of applying a user edit to a schedule row's total payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalPaymentEdit {
    pub payment_number: u32,
    /// Total the row should show after the edit; never below the scheduled payment
    pub corrected_total: Money,
    /// Extra amount now stored for the row, if any
    pub stored_extra: Option<Money>,
}

impl ExtraPaymentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra payment for a period, zero when none is stored.
    pub fn get(&self, payment_number: u32) -> Money {
        self.entries
            .get(&payment_number)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Store an extra payment. A non-positive amount removes the entry.
    pub fn set(&mut self, payment_number: u32, amount: Money) -> RealtyCalcResult<()> {
        if payment_number == 0 {
            return Err(RealtyCalcError::InvalidInput {
                field: "payment_number".into(),
                reason: "Extra payments are keyed from payment 1".into(),
            });
        }
        if amount > Decimal::ZERO {
            self.entries.insert(payment_number, amount);
        } else {
            self.entries.remove(&payment_number);
        }
        Ok(())
    }

    pub fn remove(&mut self, payment_number: u32) -> Option<Money> {
        self.entries.remove(&payment_number)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Money)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn total(&self) -> Money {
        self.entries.values().copied().sum()
    }

    /// Apply an edit of a row's total payment.
    ///
    /// `extra = max(0, new_total - scheduled_payment)`, rounded to cents. A
    /// total below the scheduled payment is corrected up to it and clears
    /// the row's extra payment.
    pub fn apply_total_edit(
        &mut self,
        payment_number: u32,
        scheduled_payment: Money,
        new_total: Money,
    ) -> RealtyCalcResult<TotalPaymentEdit> {
        if payment_number == 0 {
            return Err(RealtyCalcError::InvalidInput {
                field: "payment_number".into(),
                reason: "Extra payments are keyed from payment 1".into(),
            });
        }

        let corrected_total = new_total.max(scheduled_payment);
        let extra = round_cents(corrected_total - scheduled_payment);

        if extra > EXTRA_EPSILON {
            self.set(payment_number, extra)?;
            tracing::debug!(payment_number, %extra, "stored extra payment");
            Ok(TotalPaymentEdit {
                payment_number,
                corrected_total,
                stored_extra: Some(extra),
            })
        } else {
            self.entries.remove(&payment_number);
            tracing::debug!(payment_number, "cleared extra payment");
            Ok(TotalPaymentEdit {
                payment_number,
                corrected_total: scheduled_payment,
                stored_extra: None,
            })
        }
    }
}

impl From<BTreeMap<u32, Money>> for ExtraPaymentMap {
    fn from(raw: BTreeMap<u32, Money>) -> Self {
        let entries = raw
            .into_iter()
            .filter(|(n, amount)| *n > 0 && *amount > Decimal::ZERO)
            .collect();
        Self { entries }
    }
}

impl From<ExtraPaymentMap> for BTreeMap<u32, Money> {
    fn from(map: ExtraPaymentMap) -> Self {
        map.entries
    }
}

impl FromIterator<(u32, Money)> for ExtraPaymentMap {
    fn from_iter<I: IntoIterator<Item = (u32, Money)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_amount_removes_entry() {
        let mut map = ExtraPaymentMap::new();
        map.set(3, dec!(250)).unwrap();
        assert_eq!(map.get(3), dec!(250));
        map.set(3, Decimal::ZERO).unwrap();
        assert!(map.is_empty());
        map.set(4, dec!(-10)).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_payment_zero_rejected() {
        let mut map = ExtraPaymentMap::new();
        assert!(map.set(0, dec!(100)).is_err());
    }

    #[test]
    fn test_total_edit_stores_difference() {
        let mut map = ExtraPaymentMap::new();
        let edit = map.apply_total_edit(5, dec!(1199.10), dec!(1700)).unwrap();
        assert_eq!(edit.stored_extra, Some(dec!(500.90)));
        assert_eq!(map.get(5), dec!(500.90));
    }

    #[test]
    fn test_underpayment_corrected_and_cleared() {
        let mut map = ExtraPaymentMap::new();
        map.set(5, dec!(300)).unwrap();
        let edit = map.apply_total_edit(5, dec!(1199.10), dec!(900)).unwrap();
        assert_eq!(edit.corrected_total, dec!(1199.10));
        assert_eq!(edit.stored_extra, None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_deserialise_drops_non_positive() {
        let map: ExtraPaymentMap =
            serde_json::from_str(r#"{"1": "500", "2": "0", "3": "-5"}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1), dec!(500));
    }
}
