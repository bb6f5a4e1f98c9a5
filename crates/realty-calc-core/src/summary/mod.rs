pub mod input;
pub mod loan_profile;
pub mod metrics;
pub mod operating;
pub mod proration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::RealtyCalcResult;

pub use input::{ClosingItems, DownPayment, LineItem, PropertyInput, VacancyRates};
pub use loan_profile::{compute_loan_profile, resolve_down_payment, LoanProfile};
pub use metrics::{compute_metrics, InvestmentMetrics};
pub use operating::{compute_operating, OperatingStatement};
pub use proration::{days_between, year_day_split, YearDaySplit};

/// Full investment summary for one property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySummary {
    pub loan: LoanProfile,
    pub operating: OperatingStatement,
    pub metrics: InvestmentMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_year_split: Option<YearDaySplit>,
}

/// Compute the summary without the envelope. Input must already be valid.
pub fn compute_summary(input: &PropertyInput, warnings: &mut Vec<String>) -> PropertySummary {
    let loan = compute_loan_profile(input, warnings);
    let operating = compute_operating(input, &loan);
    let metrics = compute_metrics(input.purchase_price, &loan, &operating);

    if input.revenue.is_empty() {
        warnings.push("No revenue lines entered".into());
    }
    if operating.monthly_cash_flow.avg < Decimal::ZERO {
        warnings.push("Average monthly cash flow is negative".into());
    }
    if metrics.debt_service_coverage.avg.is_some_and(|d| d < Decimal::ONE) {
        warnings.push("NOI does not cover debt service in the average case".into());
    }

    PropertySummary {
        loan,
        operating,
        metrics,
        closing_year_split: input.closing_date.map(year_day_split),
    }
}

/// Loan profile, operating statement and ratios for a property.
pub fn summarize_property(
    input: &PropertyInput,
) -> RealtyCalcResult<ComputationOutput<PropertySummary>> {
    let start = Instant::now();
    input.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let summary = compute_summary(input, &mut warnings);
    tracing::debug!(
        loan_amount = %summary.loan.loan_amount,
        payment = %summary.loan.payment_per_period,
        "property summary computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment loan with min/max/avg operating scenarios",
        &serde_json::json!({
            "payments_per_year": input.payments_per_year,
            "loan_term_years": input.loan_term_years.to_string(),
            "vacancy": "share of gross revenue per column",
            "debt_service": "payment per period converted to monthly",
        }),
        warnings,
        elapsed,
        summary,
    ))
}
