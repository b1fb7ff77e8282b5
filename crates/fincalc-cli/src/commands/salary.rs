use clap::Args;
use serde_json::Value;

use fincalc_core::salary::{calculate_salary, SalaryInput};

use crate::input;

/// Arguments for the salary net-pay breakdown
#[derive(Args)]
pub struct SalaryArgs {
    /// Path to a JSON file with the salary input record
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_salary(args: SalaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let salary_input: SalaryInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for salary".into());
    };
    let result = calculate_salary(&salary_input)?;
    Ok(serde_json::to_value(result)?)
}
