use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_calc_core::analysis::{self, AnalysisRequest};
use realty_calc_core::projection::parse_adjustment;

use crate::commands::amortization::parse_assignment;
use crate::input;

/// Arguments for the full property analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    /// Path to JSON input file: `{ "property": {...}, "extra_payments": {...}, "adjustment_pct": "0" }`
    #[arg(long)]
    pub input: Option<String>,

    /// Extra principal for a payment, as N=AMOUNT (repeatable)
    #[arg(long = "extra", value_parser = parse_assignment)]
    pub extra: Vec<(u32, Decimal)>,

    /// What-if percentage between -10 and 10
    #[arg(long)]
    pub adjust: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: AnalysisRequest = input::load(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for property analysis")?;

    for &(n, amount) in &args.extra {
        request.extra_payments.set(n, amount)?;
    }
    if let Some(ref text) = args.adjust {
        request.adjustment_pct = parse_adjustment(text);
    }

    let result = analysis::analyze_property(&request)?;
    Ok(serde_json::to_value(result)?)
}
