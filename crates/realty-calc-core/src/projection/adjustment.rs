use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::decimal_or_zero;
use crate::types::{Money, MinMaxAvg};

pub const MAX_ADJUSTMENT_PCT: Decimal = dec!(10);
pub const MIN_ADJUSTMENT_PCT: Decimal = dec!(-10);

/// Constant monthly figures feeding the projection. Expenses are stored as
/// negative amounts, revenue as positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowBase {
    pub expense: MinMaxAvg,
    pub revenue: MinMaxAvg,
}

impl CashFlowBase {
    pub fn new(expense: MinMaxAvg, revenue: MinMaxAvg) -> Self {
        Self { expense, revenue }
    }

    /// Build from untyped floats in the order expense min/max/avg, revenue
    /// min/max/avg. NaN and infinities are read as zero.
    pub fn from_f64_lossy(values: [f64; 6]) -> Self {
        let [e_min, e_max, e_avg, r_min, r_max, r_avg] = values.map(decimal_or_zero);
        Self {
            expense: MinMaxAvg::new(e_min, e_max, e_avg),
            revenue: MinMaxAvg::new(r_min, r_max, r_avg),
        }
    }

    /// Monthly net cash flow per column (expense is already negative).
    pub fn cash_flow(&self) -> MinMaxAvg<Money> {
        self.revenue.zip_with(self.expense, |r, e| r.saturating_add(e))
    }

    pub fn is_zero(&self) -> bool {
        self.expense.is_zero() && self.revenue.is_zero()
    }
}

/// Clamp a what-if percentage into [-10, 10].
pub fn clamp_adjustment(percentage: Decimal) -> Decimal {
    percentage.clamp(MIN_ADJUSTMENT_PCT, MAX_ADJUSTMENT_PCT)
}

/// Read a percentage typed by the user; non-numeric text means 0.
pub fn parse_adjustment(text: &str) -> Decimal {
    let trimmed = text.trim().trim_end_matches('%').trim();
    clamp_adjustment(trimmed.parse::<Decimal>().unwrap_or(Decimal::ZERO))
}

/// Factor applied to (negative) expenses: a positive adjustment shrinks the
/// expense magnitude at half the revenue rate, a negative one grows it.
fn expense_factor(percentage: Decimal) -> Decimal {
    if percentage >= Decimal::ZERO {
        Decimal::ONE - percentage / dec!(200)
    } else {
        Decimal::ONE + percentage.abs() / dec!(200)
    }
}

/// Scale a base by a what-if percentage.
///
/// Always pass the unadjusted base: adjustments do not compose.
pub fn apply_adjustment(base: &CashFlowBase, percentage: Decimal) -> CashFlowBase {
    let pct = clamp_adjustment(percentage);
    let revenue_factor = Decimal::ONE + pct / dec!(100);
    let expense_factor = expense_factor(pct);

    CashFlowBase {
        revenue: base.revenue.map(|v| v.saturating_mul(revenue_factor)),
        expense: base.expense.map(|v| v.saturating_mul(expense_factor)),
    }
}
