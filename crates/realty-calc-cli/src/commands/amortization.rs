use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::amortization::views;
use realty_calc_core::amortization::{
    build_amortization, compute_schedule, AmortizationInput, ExtraPaymentMap, LoanParameters,
};

use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate (e.g. 0.06 for 6%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Payments per year
    #[arg(long, default_value = "12")]
    pub payments_per_year: u32,

    /// Number of scheduled payments
    #[arg(long)]
    pub total_payments: Option<u32>,

    /// Loan term in years (alternative to --total-payments)
    #[arg(long)]
    pub years: Option<u32>,

    /// Fixed payment per period; derived when omitted
    #[arg(long)]
    pub scheduled_payment: Option<Decimal>,

    /// Purchase price, enables loan-to-value columns
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Extra principal for a payment, as N=AMOUNT (repeatable)
    #[arg(long = "extra", value_parser = parse_assignment)]
    pub extra: Vec<(u32, Decimal)>,

    /// Set the total paid on a row, as N=AMOUNT; the excess over the
    /// scheduled payment becomes extra principal (repeatable)
    #[arg(long = "set-total", value_parser = parse_assignment)]
    pub set_total: Vec<(u32, Decimal)>,

    /// Only show rows from this loan year (1-based)
    #[arg(long)]
    pub year: Option<u32>,

    /// Show the per-year summary instead of every payment
    #[arg(long)]
    pub annual: bool,

    /// Calendar year of the first payment; adds a label to each row
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Path to JSON input file (overrides individual loan flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Parse `N=AMOUNT`, e.g. `12=500`.
pub fn parse_assignment(raw: &str) -> Result<(u32, Decimal), String> {
    let (n, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=AMOUNT, got '{raw}'"))?;
    let n: u32 = n
        .trim()
        .parse()
        .map_err(|_| format!("invalid payment number '{}'", n.trim()))?;
    if n == 0 {
        return Err("payment numbers start at 1".into());
    }
    let amount: Decimal = amount
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .map_err(|_| format!("invalid amount '{}'", amount.trim()))?;
    Ok((n, amount))
}

fn input_from_flags(args: &AmortizeArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let annual_rate = args
        .annual_rate
        .ok_or("--annual-rate is required (or provide --input)")?;
    let total_payments = match (args.total_payments, args.years) {
        (Some(n), _) => n,
        (None, Some(years)) => years
            .checked_mul(args.payments_per_year)
            .ok_or("--years times --payments-per-year is too large")?,
        (None, None) => return Err("--total-payments or --years is required".into()),
    };

    Ok(AmortizationInput {
        loan: LoanParameters {
            principal,
            annual_rate,
            payments_per_year: args.payments_per_year,
            total_payments,
            scheduled_payment: args.scheduled_payment.unwrap_or(Decimal::ZERO),
            purchase_price: args.purchase_price.unwrap_or(Decimal::ZERO),
        },
        extra_payments: ExtraPaymentMap::new(),
    })
}

/// Apply total-payment edits one at a time, re-running the schedule so each
/// edit sees the scheduled payment of its own row.
fn apply_total_edits(
    loan_input: &mut AmortizationInput,
    edits: &[(u32, Decimal)],
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut applied = Vec::with_capacity(edits.len());
    for &(n, total) in edits {
        let schedule = compute_schedule(&loan_input.loan, &loan_input.extra_payments);
        let row = schedule
            .periods
            .get(n as usize)
            .ok_or_else(|| format!("payment {n} is not in the schedule"))?;
        let edit = loan_input
            .extra_payments
            .apply_total_edit(n, row.scheduled_payment, total)?;
        applied.push(serde_json::to_value(edit)?);
    }
    Ok(applied)
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan_input: AmortizationInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => input_from_flags(&args)?,
    };

    for &(n, amount) in &args.extra {
        loan_input.extra_payments.set(n, amount)?;
    }
    let edits = apply_total_edits(&mut loan_input, &args.set_total)?;

    let output = build_amortization(&loan_input)?;
    let ppy = loan_input.loan.payments_per_year;

    let view: Value = if args.annual {
        serde_json::to_value(&output.result.annual)?
    } else if let Some(year) = args.year {
        let rows = views::periods_for_loan_year(&output.result, ppy, year);
        if rows.is_empty() && !output.result.is_empty() {
            return Err(format!(
                "loan year {year} is outside the schedule (1..={})",
                views::loan_years(&output.result)
            )
            .into());
        }
        serde_json::to_value(rows)?
    } else {
        serde_json::to_value(&output.result.periods)?
    };
    let view = match args.start_year {
        Some(start) if !args.annual => label_rows(view, ppy, start),
        _ => view,
    };

    let mut value = serde_json::to_value(&output)?;
    if let Value::Object(ref mut map) = value {
        if args.annual || args.year.is_some() || args.start_year.is_some() {
            map.insert("result".into(), view);
            map.insert(
                "schedule_totals".into(),
                serde_json::json!({
                    "scheduled_payment": output.result.scheduled_payment,
                    "actual_payment_count": output.result.actual_payment_count,
                    "total_interest": output.result.total_interest,
                    "total_principal": output.result.total_principal,
                    "total_extra": output.result.total_extra,
                }),
            );
        }
        if !edits.is_empty() {
            map.insert("edits".into(), Value::Array(edits));
        }
    }
    Ok(value)
}

fn label_rows(rows: Value, payments_per_year: u32, start_year: i32) -> Value {
    match rows {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|mut row| {
                    if let Value::Object(ref mut map) = row {
                        let n = map
                            .get("payment_number")
                            .and_then(Value::as_u64)
                            .unwrap_or(0) as u32;
                        map.insert(
                            "label".into(),
                            Value::String(views::calendar_label(n, payments_per_year, start_year)),
                        );
                    }
                    row
                })
                .collect(),
        ),
        other => other,
    }
}
