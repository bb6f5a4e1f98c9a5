use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::projection::{
    build_projection, parse_adjustment, summarize_years, CashFlowBase, ProjectionInput,
};
use realty_calc_core::types::MinMaxAvg;

use crate::input;

/// Arguments for a cumulative cash-flow projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectArgs {
    /// Monthly revenue, pessimistic
    #[arg(long)]
    pub revenue_min: Option<Decimal>,

    /// Monthly revenue, optimistic
    #[arg(long)]
    pub revenue_max: Option<Decimal>,

    /// Monthly revenue, average (defaults to the midpoint)
    #[arg(long)]
    pub revenue_avg: Option<Decimal>,

    /// Monthly expense, pessimistic (negative)
    #[arg(long)]
    pub expense_min: Option<Decimal>,

    /// Monthly expense, optimistic (negative)
    #[arg(long)]
    pub expense_max: Option<Decimal>,

    /// Monthly expense, average (defaults to the midpoint)
    #[arg(long)]
    pub expense_avg: Option<Decimal>,

    /// Number of months to project
    #[arg(long, default_value = "360")]
    pub months: i32,

    /// Closing date (YYYY-MM-DD); projection starts the following month
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// What-if percentage between -10 and 10 (e.g. 5 or "-2.5%")
    #[arg(long)]
    pub adjust: Option<String>,

    /// Roll months up into calendar years
    #[arg(long)]
    pub yearly: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn band(
    name: &str,
    min: Option<Decimal>,
    max: Option<Decimal>,
    avg: Option<Decimal>,
) -> Result<MinMaxAvg, Box<dyn std::error::Error>> {
    let min = min.ok_or_else(|| format!("--{name}-min is required (or provide --input)"))?;
    let max = max.unwrap_or(min);
    Ok(match avg {
        Some(avg) => MinMaxAvg::new(min, max, avg),
        None => MinMaxAvg::from_range(min, max),
    })
}

fn input_from_flags(args: &ProjectArgs) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
    let revenue = band("revenue", args.revenue_min, args.revenue_max, args.revenue_avg)?;
    let expense = band("expense", args.expense_min, args.expense_max, args.expense_avg)?;
    Ok(ProjectionInput {
        base: CashFlowBase::new(expense.map(|v| -v.abs()), revenue),
        horizon_months: args.months,
        start_date: args.start_date.unwrap_or_else(|| Local::now().date_naive()),
        adjustment_pct: Decimal::ZERO,
    })
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut projection_input: ProjectionInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => input_from_flags(&args)?,
    };

    if let Some(ref text) = args.adjust {
        projection_input.adjustment_pct = parse_adjustment(text);
    }

    let output = build_projection(&projection_input)?;
    let mut value = serde_json::to_value(&output)?;
    if args.yearly {
        if let Value::Object(ref mut map) = value {
            map.insert("result".into(), serde_json::to_value(summarize_years(&output.result))?);
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_band_defaults() {
        let b = band("revenue", Some(dec!(1800)), Some(dec!(2200)), None).unwrap();
        assert_eq!(b.avg, dec!(2000));
        let single = band("revenue", Some(dec!(1500)), None, None).unwrap();
        assert_eq!(single, MinMaxAvg::splat(dec!(1500)));
        assert!(band("expense", None, None, None).is_err());
    }
}
