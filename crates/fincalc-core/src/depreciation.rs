//! Asset depreciation schedules under five methods.
//!
//! Straight-line, declining-balance (150%), double-declining (200%),
//! sum-of-years-digits, and units-of-production, with optional Section 179
//! and bonus-depreciation reductions to the depreciable base and per-year
//! tax-savings figures. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);

/// Declining-balance acceleration factor (150% method).
const DECLINING_FACTOR: Decimal = dec!(1.5);

/// Double-declining acceleration factor (200% method).
const DOUBLE_DECLINING_FACTOR: Decimal = dec!(2);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Depreciation method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
    DoubleDeclining,
    SumOfYears,
    UnitsOfProduction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    /// Original cost of the asset.
    pub asset_cost: Money,
    /// Estimated value at the end of the asset's useful life.
    pub salvage_value: Money,
    /// Useful life in whole years.
    pub useful_life: u32,
    pub method: DepreciationMethod,
    /// Marginal tax rate (0–100). When set, per-year tax savings are reported.
    #[serde(default)]
    pub tax_rate_pct: Option<Percent>,
    /// Bonus depreciation percentage (0–100), applied after Section 179.
    #[serde(default)]
    pub bonus_pct: Option<Percent>,
    /// Section 179 expensing amount, subtracted from the base first.
    #[serde(default)]
    pub section_179_amount: Option<Money>,
    /// Annual units produced (units-of-production only, constant per year).
    #[serde(default)]
    pub units_produced: Option<Decimal>,
    /// Estimated lifetime production (units-of-production only).
    #[serde(default)]
    pub estimated_total_units: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the year-by-year schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based year number.
    pub year: u32,
    pub beginning_value: Money,
    pub depreciation: Money,
    pub accumulated_depreciation: Money,
    pub ending_value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_savings: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub schedule: Vec<YearRecord>,
    /// Base subject to periodic depreciation after Section 179 and bonus.
    pub depreciable_base: Money,
    pub total_depreciation: Money,
    /// Year-1 depreciation figure.
    pub annual_depreciation: Money,
    pub total_tax_savings: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute a year-by-year depreciation schedule.
///
/// The schedule carries `beginning_value`/`accumulated_depreciation` forward
/// from the prior year's ending values, so for every method
/// `beginning(y) == ending(y-1)`, `ending == beginning - depreciation`, and
/// accumulated depreciation equals `asset_cost - ending_value`.
///
/// Declining-balance methods apply their rate to book value and never
/// depreciate below salvage value. Straight-line, sum-of-years, and
/// units-of-production allocate the depreciable base
/// (`asset_cost - salvage_value`, less Section 179, less bonus).
pub fn calculate_depreciation(
    input: &DepreciationInput,
) -> FinCalcResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_depreciation_input(input)?;

    if input.salvage_value > input.asset_cost {
        warnings.push(format!(
            "Salvage value {} exceeds asset cost {}; depreciable base is negative",
            input.salvage_value, input.asset_cost
        ));
    }

    // Depreciable base: Section 179 first, then bonus on the reduced base.
    let mut base = input.asset_cost - input.salvage_value;
    if let Some(s179) = input.section_179_amount {
        base -= s179;
    }
    if let Some(bonus) = input.bonus_pct {
        base -= base * bonus / HUNDRED;
    }

    let life = Decimal::from(input.useful_life);
    let sum_of_years = life * (life + Decimal::ONE) / dec!(2);

    // Units-of-production: annual output is treated as constant across years.
    let per_year_units_depreciation = match input.method {
        DepreciationMethod::UnitsOfProduction => {
            let units = input.units_produced.unwrap_or(Decimal::ZERO);
            let total = input.estimated_total_units.unwrap_or(Decimal::ZERO);
            Some(base / total * units)
        }
        _ => None,
    };

    let mut schedule: Vec<YearRecord> = Vec::with_capacity(input.useful_life as usize);
    let mut beginning_value = input.asset_cost;
    let mut accumulated = Decimal::ZERO;
    let mut total_tax_savings = Decimal::ZERO;

    for year in 1..=input.useful_life {
        let depreciation = match input.method {
            DepreciationMethod::StraightLine => base / life,
            DepreciationMethod::SumOfYears => {
                let remaining = Decimal::from(input.useful_life - year + 1);
                base * remaining / sum_of_years
            }
            DepreciationMethod::DecliningBalance => {
                declining_amount(beginning_value, input.salvage_value, DECLINING_FACTOR / life)
            }
            DepreciationMethod::DoubleDeclining => declining_amount(
                beginning_value,
                input.salvage_value,
                DOUBLE_DECLINING_FACTOR / life,
            ),
            DepreciationMethod::UnitsOfProduction => {
                per_year_units_depreciation.unwrap_or(Decimal::ZERO)
            }
        };

        accumulated += depreciation;
        let ending_value = beginning_value - depreciation;

        let tax_savings = input.tax_rate_pct.map(|rate| depreciation * rate / HUNDRED);
        if let Some(savings) = tax_savings {
            total_tax_savings += savings;
        }

        schedule.push(YearRecord {
            year,
            beginning_value,
            depreciation,
            accumulated_depreciation: accumulated,
            ending_value,
            tax_savings,
        });

        beginning_value = ending_value;
    }

    let annual_depreciation = schedule
        .first()
        .map(|r| r.depreciation)
        .unwrap_or(Decimal::ZERO);

    let output = DepreciationOutput {
        schedule,
        depreciable_base: base,
        total_depreciation: accumulated,
        annual_depreciation,
        total_tax_savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Year-by-year depreciation schedule with Section 179/bonus base \
         reduction and per-year tax savings",
        &serde_json::json!({
            "method": input.method,
            "asset_cost": input.asset_cost.to_string(),
            "salvage_value": input.salvage_value.to_string(),
            "useful_life": input.useful_life,
            "depreciable_base": base.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Declining-balance amount: rate on book value, clamped so the ending
/// value never crosses below salvage.
fn declining_amount(beginning_value: Money, salvage_value: Money, rate: Decimal) -> Money {
    let raw = beginning_value * rate;
    let headroom = (beginning_value - salvage_value).max(Decimal::ZERO);
    raw.min(headroom)
}

fn validate_depreciation_input(input: &DepreciationInput) -> FinCalcResult<()> {
    if input.asset_cost < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "asset_cost".into(),
            reason: "Asset cost cannot be negative".into(),
        });
    }
    if input.salvage_value < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "salvage_value".into(),
            reason: "Salvage value cannot be negative".into(),
        });
    }
    if input.useful_life == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "useful_life".into(),
            reason: "Useful life must be at least 1 year".into(),
        });
    }
    if let Some(rate) = input.tax_rate_pct {
        if rate < Decimal::ZERO || rate > HUNDRED {
            return Err(FinCalcError::InvalidInput {
                field: "tax_rate_pct".into(),
                reason: "Tax rate must be between 0 and 100".into(),
            });
        }
    }
    if let Some(bonus) = input.bonus_pct {
        if bonus < Decimal::ZERO || bonus > HUNDRED {
            return Err(FinCalcError::InvalidInput {
                field: "bonus_pct".into(),
                reason: "Bonus percentage must be between 0 and 100".into(),
            });
        }
    }
    if let Some(s179) = input.section_179_amount {
        if s179 < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "section_179_amount".into(),
                reason: "Section 179 amount cannot be negative".into(),
            });
        }
    }
    if input.method == DepreciationMethod::UnitsOfProduction {
        match (input.units_produced, input.estimated_total_units) {
            (Some(units), Some(total)) => {
                if units < Decimal::ZERO {
                    return Err(FinCalcError::InvalidInput {
                        field: "units_produced".into(),
                        reason: "Units produced cannot be negative".into(),
                    });
                }
                if total <= Decimal::ZERO {
                    return Err(FinCalcError::DivisionByZero {
                        context: "units-of-production per-unit rate (estimated_total_units)"
                            .into(),
                    });
                }
            }
            _ => {
                return Err(FinCalcError::InvalidInput {
                    field: "units_produced".into(),
                    reason: "Units-of-production requires units_produced and \
                             estimated_total_units"
                        .into(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
