use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::tax::brackets::{compute_bracket_tax, federal_brackets};
use fincalc_core::tax::income_tax::{calculate_income_tax, IncomeTaxInput};

use crate::commands::parse_filing_status;
use crate::input;

/// Arguments for the full income tax pipeline
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Path to a JSON file with the income tax input record
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a raw bracket walk
#[derive(Args)]
pub struct BracketTaxArgs {
    /// Taxable income to allocate across the brackets
    #[arg(long)]
    pub taxable_income: Decimal,

    /// Filing status: single, married, head
    #[arg(long, default_value = "single")]
    pub filing_status: String,
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: IncomeTaxInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for income tax".into());
    };
    let result = calculate_income_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_bracket_tax(args: BracketTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let status = parse_filing_status(&args.filing_status)?;
    let brackets = federal_brackets(status);
    let result = compute_bracket_tax(args.taxable_income, &brackets)?;
    Ok(serde_json::to_value(result)?)
}
