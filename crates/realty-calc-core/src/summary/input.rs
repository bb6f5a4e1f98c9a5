use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RealtyCalcError;
use crate::types::{Money, Rate};
use crate::RealtyCalcResult;

/// Down payment, given either as a share of the price or as an amount.
/// Whichever is supplied drives the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPayment {
    /// Share of the purchase price (0.20 = 20%)
    Rate(Rate),
    /// Cash amount
    Amount(Money),
}

impl Default for DownPayment {
    fn default() -> Self {
        DownPayment::Rate(Decimal::ZERO)
    }
}

/// A revenue or expense line with pessimistic and optimistic monthly figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub min: Money,
    pub max: Money,
}

impl LineItem {
    pub fn new(name: impl Into<String>, min: Money, max: Money) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// Vacancy and collection loss as a share of revenue, per scenario column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRates {
    pub min: Rate,
    pub max: Rate,
}

/// One-off amounts settled at closing. Costs and credits are entered as
/// magnitudes; their sign is applied when computing cash to close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingItems {
    pub inspection: Money,
    pub escrow: Money,
    pub encumbrances: Money,
    /// Seller's share of property tax credited to the buyer
    pub tax_proration: Money,
    pub allowances: Money,
}

/// Everything the calculator form collects, typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub purchase_price: Money,
    #[serde(default)]
    pub down_payment: DownPayment,
    /// Nominal annual interest rate (0.065 = 6.5%)
    pub annual_interest_rate: Rate,
    pub loan_term_years: Decimal,
    pub payments_per_year: u32,
    #[serde(default)]
    pub closing_cost_rate: Rate,
    #[serde(default)]
    pub closing_items: ClosingItems,
    #[serde(default)]
    pub annual_property_tax: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub revenue: Vec<LineItem>,
    /// Expense lines; amounts are treated as outflows whatever their sign
    #[serde(default)]
    pub expenses: Vec<LineItem>,
    #[serde(default)]
    pub vacancy_rate: VacancyRates,
}

fn invalid(field: &str, reason: &str) -> RealtyCalcError {
    RealtyCalcError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

impl PropertyInput {
    /// Reject values no form could sensibly hold. A zero loan or empty
    /// income statement is allowed; it simply produces no schedule or data.
    pub fn validate(&self) -> RealtyCalcResult<()> {
        if self.purchase_price < Decimal::ZERO {
            return Err(invalid("purchase_price", "Purchase price cannot be negative"));
        }
        match self.down_payment {
            DownPayment::Rate(r) if r < Decimal::ZERO || r > Decimal::ONE => {
                return Err(invalid("down_payment", "Down payment rate must be between 0 and 1"));
            }
            DownPayment::Amount(a) if a < Decimal::ZERO => {
                return Err(invalid("down_payment", "Down payment amount cannot be negative"));
            }
            _ => {}
        }
        if self.annual_interest_rate < Decimal::ZERO {
            return Err(invalid("annual_interest_rate", "Interest rate cannot be negative"));
        }
        if self.loan_term_years < Decimal::ZERO {
            return Err(invalid("loan_term_years", "Loan term cannot be negative"));
        }
        if self.closing_cost_rate < Decimal::ZERO {
            return Err(invalid("closing_cost_rate", "Closing cost rate cannot be negative"));
        }
        for (field, rate) in [("vacancy_rate.min", self.vacancy_rate.min), ("vacancy_rate.max", self.vacancy_rate.max)] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(invalid(field, "Vacancy rate must be between 0 and 1 (exclusive upper)"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FORM: &str = r#"{
        "purchase_price": "300000",
        "down_payment": { "rate": "0.2" },
        "annual_interest_rate": "0.065",
        "loan_term_years": 30,
        "payments_per_year": 12,
        "revenue": [ { "name": "Unit 1", "min": "1400", "max": "1600" } ],
        "expenses": [ { "name": "Insurance", "min": "-120", "max": "-150" } ]
    }"#;

    #[test]
    fn test_deserialise_form_with_defaults() {
        let input: PropertyInput = serde_json::from_str(FORM).unwrap();
        assert_eq!(input.down_payment, DownPayment::Rate(dec!(0.2)));
        assert_eq!(input.closing_items, ClosingItems::default());
        assert!(input.closing_date.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_vacancy() {
        let mut input: PropertyInput = serde_json::from_str(FORM).unwrap();
        input.vacancy_rate.max = dec!(1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_down_payment_over_price_share() {
        let mut input: PropertyInput = serde_json::from_str(FORM).unwrap();
        input.down_payment = DownPayment::Rate(dec!(1.5));
        assert!(input.validate().is_err());
    }
}
