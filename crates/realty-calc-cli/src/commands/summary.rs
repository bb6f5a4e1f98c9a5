use clap::Args;
use serde_json::Value;

use realty_calc_core::summary::{self, PropertyInput};

use crate::input;

/// Arguments for a property summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to JSON input file describing the property
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInput = input::load(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for property summary")?;
    let result = summary::summarize_property(&property)?;
    Ok(serde_json::to_value(result)?)
}
