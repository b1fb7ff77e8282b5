//! Progressive tax bracket walk shared by the income-tax and salary engines.
//!
//! A bracket's rate applies only to the slice of income between its lower
//! and upper limits. The marginal rate is the rate of the highest bracket
//! with any income left on entry, judged before the slice is subtracted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    HeadOfHousehold,
}

/// One progressive bracket. `upper_limit` of `None` means unbounded and is
/// only valid on the final entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Bracket rate as a decimal (0.22 = 22%).
    pub rate: Rate,
    pub upper_limit: Option<Money>,
}

/// Per-bracket allocation of taxable income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Rate,
    pub income_in_bracket: Money,
    pub tax_in_bracket: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketTaxOutput {
    pub total_tax: Money,
    pub marginal_rate: Rate,
    pub per_bracket: Vec<BracketSlice>,
}

// ---------------------------------------------------------------------------
// 2024 federal tables
// ---------------------------------------------------------------------------

fn bracket(rate: Decimal, upper_limit: Option<Decimal>) -> TaxBracket {
    TaxBracket { rate, upper_limit }
}

/// 2024 federal brackets for a filing status, ascending by upper limit.
pub fn federal_brackets(status: FilingStatus) -> Vec<TaxBracket> {
    match status {
        FilingStatus::Single => vec![
            bracket(dec!(0.10), Some(dec!(11600))),
            bracket(dec!(0.12), Some(dec!(47150))),
            bracket(dec!(0.22), Some(dec!(100525))),
            bracket(dec!(0.24), Some(dec!(191950))),
            bracket(dec!(0.32), Some(dec!(243725))),
            bracket(dec!(0.35), Some(dec!(609350))),
            bracket(dec!(0.37), None),
        ],
        FilingStatus::MarriedJoint => vec![
            bracket(dec!(0.10), Some(dec!(23200))),
            bracket(dec!(0.12), Some(dec!(94300))),
            bracket(dec!(0.22), Some(dec!(201050))),
            bracket(dec!(0.24), Some(dec!(383900))),
            bracket(dec!(0.32), Some(dec!(487450))),
            bracket(dec!(0.35), Some(dec!(731200))),
            bracket(dec!(0.37), None),
        ],
        FilingStatus::HeadOfHousehold => vec![
            bracket(dec!(0.10), Some(dec!(16550))),
            bracket(dec!(0.12), Some(dec!(63100))),
            bracket(dec!(0.22), Some(dec!(100500))),
            bracket(dec!(0.24), Some(dec!(191950))),
            bracket(dec!(0.32), Some(dec!(243700))),
            bracket(dec!(0.35), Some(dec!(609350))),
            bracket(dec!(0.37), None),
        ],
    }
}

/// 2024 federal standard deduction by filing status.
pub fn standard_deduction(status: FilingStatus) -> Money {
    match status {
        FilingStatus::Single => dec!(14600),
        FilingStatus::MarriedJoint => dec!(29200),
        FilingStatus::HeadOfHousehold => dec!(21900),
    }
}

// ---------------------------------------------------------------------------
// Bracket walk
// ---------------------------------------------------------------------------

/// Walk the brackets in ascending order, allocating income slice by slice.
///
/// Negative taxable income allocates nothing and taxes nothing. A bracket
/// counts toward the marginal rate whenever any income remains on entry.
pub fn compute_bracket_tax(
    taxable_income: Money,
    brackets: &[TaxBracket],
) -> FinCalcResult<BracketTaxOutput> {
    validate_brackets(brackets)?;

    let mut per_bracket: Vec<BracketSlice> = Vec::with_capacity(brackets.len());
    let mut total_tax = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;
    let mut remaining_income = taxable_income;

    for b in brackets {
        let width = b.upper_limit.map(|upper| upper - previous_limit);
        let income_in_bracket = match width {
            Some(w) => remaining_income.max(Decimal::ZERO).min(w),
            None => remaining_income.max(Decimal::ZERO),
        };
        let tax_in_bracket = income_in_bracket * b.rate;

        if remaining_income > Decimal::ZERO {
            marginal_rate = b.rate;
        }

        remaining_income -= income_in_bracket;
        if let Some(upper) = b.upper_limit {
            previous_limit = upper;
        }
        total_tax += tax_in_bracket;

        per_bracket.push(BracketSlice {
            rate: b.rate,
            income_in_bracket,
            tax_in_bracket,
        });
    }

    Ok(BracketTaxOutput {
        total_tax,
        marginal_rate,
        per_bracket,
    })
}

fn validate_brackets(brackets: &[TaxBracket]) -> FinCalcResult<()> {
    if brackets.is_empty() {
        return Err(FinCalcError::InvalidInput {
            field: "brackets".into(),
            reason: "Bracket table cannot be empty".into(),
        });
    }

    let mut previous_limit = Decimal::ZERO;
    for (i, b) in brackets.iter().enumerate() {
        if b.rate < Decimal::ZERO || b.rate > Decimal::ONE {
            return Err(FinCalcError::InvalidInput {
                field: format!("brackets[{i}].rate"),
                reason: "Bracket rate must be between 0 and 1".into(),
            });
        }
        match b.upper_limit {
            Some(upper) => {
                if i == brackets.len() - 1 {
                    return Err(FinCalcError::InvalidInput {
                        field: format!("brackets[{i}].upper_limit"),
                        reason: "Final bracket must be unbounded".into(),
                    });
                }
                if upper <= previous_limit {
                    return Err(FinCalcError::InvalidInput {
                        field: format!("brackets[{i}].upper_limit"),
                        reason: "Bracket limits must be strictly increasing".into(),
                    });
                }
                previous_limit = upper;
            }
            None => {
                if i != brackets.len() - 1 {
                    return Err(FinCalcError::InvalidInput {
                        field: format!("brackets[{i}].upper_limit"),
                        reason: "Only the final bracket may be unbounded".into(),
                    });
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
