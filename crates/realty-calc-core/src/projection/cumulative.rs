use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyCalcError;
use crate::projection::adjustment::{apply_adjustment, clamp_adjustment, CashFlowBase};
use crate::types::*;
use crate::RealtyCalcResult;

/// Monthly figure and its running total for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub monthly: MinMaxAvg,
    pub cumulative: MinMaxAvg,
}

/// One calendar month of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCumulativeRecord {
    /// Short month and year, e.g. `Jan-2025`
    pub label: String,
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    pub expense: CategorySeries,
    pub revenue: CategorySeries,
    pub cash_flow: CategorySeries,
}

/// Input for the projection wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub base: CashFlowBase,
    pub horizon_months: i32,
    /// Closing date; the first projected month is the one after it
    pub start_date: NaiveDate,
    /// What-if percentage in [-10, 10]
    #[serde(default)]
    pub adjustment_pct: Decimal,
}

/// First day of the month following `date`.
pub fn first_projection_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}

/// Months reserved up front; longer horizons grow on demand.
const RESERVED_MONTHS: i32 = 1200;

/// Project constant monthly figures over `horizon_months` calendar months.
///
/// Returns an empty series when the horizon is not positive or every base
/// figure is zero.
pub fn project_cumulative(
    base: &CashFlowBase,
    horizon_months: i32,
    start_date: NaiveDate,
) -> Vec<MonthlyCumulativeRecord> {
    if horizon_months <= 0 || base.is_zero() {
        return Vec::new();
    }
    let Some(mut current) = first_projection_month(start_date) else {
        return Vec::new();
    };

    let monthly_flow = base.cash_flow();
    let mut cumulative_expense = MinMaxAvg::default();
    let mut cumulative_revenue = MinMaxAvg::default();
    let mut cumulative_flow = MinMaxAvg::default();

    let mut records = Vec::with_capacity(horizon_months.min(RESERVED_MONTHS) as usize);
    for _ in 0..horizon_months {
        let (Some(expense), Some(revenue), Some(flow)) = (
            cumulative_expense.checked_add(base.expense),
            cumulative_revenue.checked_add(base.revenue),
            cumulative_flow.checked_add(monthly_flow),
        ) else {
            tracing::warn!(months = records.len(), "cumulative totals overflowed; projection truncated");
            break;
        };
        cumulative_expense = expense;
        cumulative_revenue = revenue;
        cumulative_flow = flow;

        records.push(MonthlyCumulativeRecord {
            label: current.format("%b-%Y").to_string(),
            year: current.year(),
            month: current.month(),
            expense: CategorySeries {
                monthly: base.expense,
                cumulative: cumulative_expense,
            },
            revenue: CategorySeries {
                monthly: base.revenue,
                cumulative: cumulative_revenue,
            },
            cash_flow: CategorySeries {
                monthly: monthly_flow,
                cumulative: cumulative_flow,
            },
        });

        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    tracing::debug!(months = records.len(), "cumulative projection computed");
    records
}

/// Project after applying a what-if adjustment to the unadjusted base.
pub fn project_adjusted(
    base: &CashFlowBase,
    adjustment_pct: Decimal,
    horizon_months: i32,
    start_date: NaiveDate,
) -> Vec<MonthlyCumulativeRecord> {
    project_cumulative(&apply_adjustment(base, adjustment_pct), horizon_months, start_date)
}

/// Projection wrapped in the standard output envelope.
pub fn build_projection(
    input: &ProjectionInput,
) -> RealtyCalcResult<ComputationOutput<Vec<MonthlyCumulativeRecord>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if first_projection_month(input.start_date).is_none() {
        return Err(RealtyCalcError::DateError(format!(
            "No month follows {}",
            input.start_date
        )));
    }

    let pct = clamp_adjustment(input.adjustment_pct);
    if pct != input.adjustment_pct {
        warnings.push(format!(
            "Adjustment {}% clamped to {}%",
            input.adjustment_pct, pct
        ));
    }
    if input.horizon_months <= 0 {
        warnings.push("Horizon must be at least one month; no data".into());
    } else if input.base.is_zero() {
        warnings.push("All base figures are zero; no data".into());
    }

    let records = project_adjusted(&input.base, pct, input.horizon_months, input.start_date);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Flat monthly recurrence with cumulative totals",
        &serde_json::json!({
            "horizon_months": input.horizon_months,
            "start_date": input.start_date.to_string(),
            "adjustment_pct": pct.to_string(),
            "growth": "none",
        }),
        warnings,
        elapsed,
        records,
    ))
}
