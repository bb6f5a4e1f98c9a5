use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::projection::cumulative::MonthlyCumulativeRecord;
use crate::types::MinMaxAvg;

/// Min and max closer than this are drawn as a single line rather than a band.
const FLAT_RANGE_TOLERANCE: Decimal = dec!(0.01);

/// Calendar-year roll-up of the monthly projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyProjection {
    pub year: i32,
    /// Months of this year inside the horizon (first and last years may be partial)
    pub months: u32,
    pub expense: MinMaxAvg,
    pub revenue: MinMaxAvg,
    pub cash_flow: MinMaxAvg,
    pub cumulative_expense: MinMaxAvg,
    pub cumulative_revenue: MinMaxAvg,
    pub cumulative_cash_flow: MinMaxAvg,
    pub revenue_is_flat: bool,
    pub expense_is_flat: bool,
}

/// Distinct calendar years in projection order.
pub fn projection_years(records: &[MonthlyCumulativeRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = Vec::new();
    for r in records {
        if years.last() != Some(&r.year) {
            years.push(r.year);
        }
    }
    years
}

/// Records whose calendar year is `year`.
pub fn records_for_year(records: &[MonthlyCumulativeRecord], year: i32) -> Vec<&MonthlyCumulativeRecord> {
    records.iter().filter(|r| r.year == year).collect()
}

fn is_flat(band: &MinMaxAvg) -> bool {
    (band.min - band.max).abs() < FLAT_RANGE_TOLERANCE
}

/// Roll monthly records up into calendar years.
pub fn summarize_years(records: &[MonthlyCumulativeRecord]) -> Vec<YearlyProjection> {
    let mut out: Vec<YearlyProjection> = Vec::new();

    for r in records {
        match out.last_mut() {
            Some(current) if current.year == r.year => {
                current.months += 1;
                current.expense += r.expense.monthly;
                current.revenue += r.revenue.monthly;
                current.cash_flow += r.cash_flow.monthly;
                current.cumulative_expense = r.expense.cumulative;
                current.cumulative_revenue = r.revenue.cumulative;
                current.cumulative_cash_flow = r.cash_flow.cumulative;
            }
            _ => out.push(YearlyProjection {
                year: r.year,
                months: 1,
                expense: r.expense.monthly,
                revenue: r.revenue.monthly,
                cash_flow: r.cash_flow.monthly,
                cumulative_expense: r.expense.cumulative,
                cumulative_revenue: r.revenue.cumulative,
                cumulative_cash_flow: r.cash_flow.cumulative,
                revenue_is_flat: false,
                expense_is_flat: false,
            }),
        }
    }

    for y in &mut out {
        y.revenue_is_flat = is_flat(&y.cumulative_revenue);
        y.expense_is_flat = is_flat(&y.cumulative_expense);
    }
    out
}
