use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::discount::{
    calculate_discount, DiscountInput, DiscountMode, DiscountValue,
};

/// Arguments for the discount calculator
#[derive(Args)]
pub struct DiscountArgs {
    /// Price of a single item before discounts
    #[arg(long)]
    pub original_price: Decimal,

    /// Item count
    #[arg(long, default_value = "1")]
    pub quantity: u32,

    /// Primary discount as a percentage (0-100)
    #[arg(long, conflicts_with = "flat_discount")]
    pub discount_percent: Option<Decimal>,

    /// Primary discount as a flat amount
    #[arg(long)]
    pub flat_discount: Option<Decimal>,

    /// Second discount (0-100), applied after the first
    #[arg(long, default_value = "0")]
    pub additional_discount: Decimal,

    /// Sales tax rate (0-100)
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Round price outputs to the nearest cent
    #[arg(long)]
    pub round: bool,

    /// Comparison discount as a percentage, display only
    #[arg(long, conflicts_with = "compare_flat")]
    pub compare_percent: Option<Decimal>,

    /// Comparison discount as a flat amount, display only
    #[arg(long)]
    pub compare_flat: Option<Decimal>,

    /// Reverse mode: recover the original price from this final price
    #[arg(long)]
    pub reverse_final_price: Option<Decimal>,
}

pub fn run_discount(args: DiscountArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let discount = match (args.discount_percent, args.flat_discount) {
        (Some(pct), None) => DiscountValue::Percent(pct),
        (None, Some(flat)) => DiscountValue::Flat(flat),
        (None, None) => {
            return Err("--discount-percent or --flat-discount required".into());
        }
        (Some(_), Some(_)) => unreachable!("clap conflicts_with"),
    };

    let comparison = match (args.compare_percent, args.compare_flat) {
        (Some(pct), None) => Some(DiscountValue::Percent(pct)),
        (None, Some(flat)) => Some(DiscountValue::Flat(flat)),
        _ => None,
    };

    let mode = match args.reverse_final_price {
        Some(final_price) => DiscountMode::Reverse { final_price },
        None => DiscountMode::Forward,
    };

    let input = DiscountInput {
        original_price: args.original_price,
        quantity: args.quantity,
        discount,
        additional_discount_pct: args.additional_discount,
        tax_rate_pct: args.tax_rate,
        round_to_nearest_cent: args.round,
        comparison,
        mode,
    };
    let result = calculate_discount(&input)?;
    Ok(serde_json::to_value(result)?)
}
