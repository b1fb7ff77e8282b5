use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::depreciation::{
    calculate_depreciation, DepreciationInput, DepreciationMethod,
};

/// Arguments for the depreciation schedule
#[derive(Args)]
pub struct DepreciationArgs {
    /// Original cost of the asset
    #[arg(long)]
    pub asset_cost: Decimal,

    /// Salvage value at the end of the useful life
    #[arg(long, default_value = "0")]
    pub salvage_value: Decimal,

    /// Useful life in years
    #[arg(long)]
    pub useful_life: u32,

    /// Method: straight-line, declining-balance, double-declining,
    /// sum-of-years, units-of-production
    #[arg(long, default_value = "straight-line")]
    pub method: String,

    /// Marginal tax rate (0-100) for tax-savings figures
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Bonus depreciation percentage (0-100)
    #[arg(long)]
    pub bonus_pct: Option<Decimal>,

    /// Section 179 expensing amount
    #[arg(long)]
    pub section_179: Option<Decimal>,

    /// Annual units produced (units-of-production only)
    #[arg(long)]
    pub units_produced: Option<Decimal>,

    /// Estimated lifetime units (units-of-production only)
    #[arg(long)]
    pub estimated_total_units: Option<Decimal>,
}

fn parse_method(s: &str) -> Result<DepreciationMethod, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "straight-line" => Ok(DepreciationMethod::StraightLine),
        "declining-balance" => Ok(DepreciationMethod::DecliningBalance),
        "double-declining" => Ok(DepreciationMethod::DoubleDeclining),
        "sum-of-years" => Ok(DepreciationMethod::SumOfYears),
        "units-of-production" => Ok(DepreciationMethod::UnitsOfProduction),
        other => Err(format!(
            "Unknown method '{}'. Use: straight-line, declining-balance, \
             double-declining, sum-of-years, units-of-production",
            other
        )
        .into()),
    }
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = DepreciationInput {
        asset_cost: args.asset_cost,
        salvage_value: args.salvage_value,
        useful_life: args.useful_life,
        method: parse_method(&args.method)?,
        tax_rate_pct: args.tax_rate,
        bonus_pct: args.bonus_pct,
        section_179_amount: args.section_179,
        units_produced: args.units_produced,
        estimated_total_units: args.estimated_total_units,
    };
    let result = calculate_depreciation(&input)?;
    Ok(serde_json::to_value(result)?)
}
