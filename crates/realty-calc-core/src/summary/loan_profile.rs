use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::LoanParameters;
use crate::summary::input::{DownPayment, PropertyInput};
use crate::time_value;
use crate::types::{Money, Rate};

/// Financing figures derived from the purchase terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProfile {
    pub down_payment_rate: Rate,
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub total_payments: u32,
    pub periodic_rate: Rate,
    /// Level payment per period; zero when there is no loan
    pub payment_per_period: Money,
    pub total_loan_cost: Money,
    /// Total interest over the full term, never negative
    pub interest_cost: Money,
    pub closing_costs: Money,
    pub cash_to_close: Money,
    /// Property tax as a monthly outflow (negative)
    pub monthly_property_tax: Money,
    /// Payment converted to a monthly amount, for monthly cash flow
    pub monthly_debt_service: Money,
}

impl LoanProfile {
    /// Loan terms for the amortization engine, using the profile's payment.
    pub fn loan_parameters(&self, annual_rate: Rate, payments_per_year: u32, purchase_price: Money) -> LoanParameters {
        LoanParameters {
            principal: self.loan_amount,
            annual_rate,
            payments_per_year,
            total_payments: self.total_payments,
            scheduled_payment: self.payment_per_period,
            purchase_price,
        }
    }
}

/// Resolve the down payment in both forms.
pub fn resolve_down_payment(purchase_price: Money, down_payment: DownPayment) -> (Rate, Money) {
    match down_payment {
        DownPayment::Rate(rate) => (rate, purchase_price * rate),
        DownPayment::Amount(amount) => {
            let rate = if purchase_price.is_zero() {
                Decimal::ZERO
            } else {
                amount / purchase_price
            };
            (rate, amount)
        }
    }
}

/// Compute the loan profile. Soft problems are pushed onto `warnings`.
pub fn compute_loan_profile(input: &PropertyInput, warnings: &mut Vec<String>) -> LoanProfile {
    let price = input.purchase_price;
    let (down_payment_rate, down_payment_amount) = resolve_down_payment(price, input.down_payment);

    let loan_amount = price - down_payment_amount;
    if loan_amount < Decimal::ZERO {
        warnings.push("Down payment exceeds purchase price; no loan".into());
    }

    let total_payments = input
        .loan_term_years
        .checked_mul(Decimal::from(input.payments_per_year))
        .and_then(|n| n.round().to_u32())
        .unwrap_or(0);

    let periodic_rate = if input.payments_per_year > 0 {
        input.annual_interest_rate / Decimal::from(input.payments_per_year)
    } else {
        Decimal::ZERO
    };

    let payment_per_period = if loan_amount > Decimal::ZERO && total_payments > 0 {
        match time_value::pmt(periodic_rate, total_payments, -loan_amount, Decimal::ZERO) {
            Ok(p) => p,
            Err(e) => {
                warnings.push(format!("Payment could not be computed: {e}"));
                Decimal::ZERO
            }
        }
    } else {
        Decimal::ZERO
    };

    let total_loan_cost = payment_per_period
        .checked_mul(Decimal::from(total_payments))
        .unwrap_or(Decimal::MAX);
    let interest_cost = if total_loan_cost >= loan_amount {
        total_loan_cost - loan_amount
    } else {
        Decimal::ZERO
    };

    let closing_costs = price * input.closing_cost_rate;
    let items = &input.closing_items;
    let cash_to_close = down_payment_amount
        + closing_costs
        + items.inspection.abs()
        + items.escrow.abs()
        + items.encumbrances.abs()
        - items.tax_proration.abs()
        - items.allowances.abs();

    let monthly_property_tax = -(input.annual_property_tax.abs() / dec!(12));

    let monthly_debt_service = if input.payments_per_year > 0 {
        payment_per_period * Decimal::from(input.payments_per_year) / dec!(12)
    } else {
        Decimal::ZERO
    };

    LoanProfile {
        down_payment_rate,
        down_payment_amount,
        loan_amount: loan_amount.max(Decimal::ZERO),
        total_payments,
        periodic_rate,
        payment_per_period,
        total_loan_cost,
        interest_cost,
        closing_costs,
        cash_to_close,
        monthly_property_tax,
        monthly_debt_service,
    }
}
