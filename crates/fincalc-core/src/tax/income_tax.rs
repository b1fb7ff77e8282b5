//! Federal income tax pipeline: gross income → adjustments → AGI →
//! standard-or-itemized deduction → taxable income → bracket walk →
//! credits, with floors at zero on taxable income and on the final tax.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::tax::brackets::{
    compute_bracket_tax, federal_brackets, standard_deduction, BracketSlice, FilingStatus,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Income components summed into gross income.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeSources {
    #[serde(default)]
    pub wages: Money,
    #[serde(default)]
    pub business: Money,
    #[serde(default)]
    pub investment: Money,
    #[serde(default)]
    pub other: Money,
}

/// Above-the-line adjustments subtracted from gross income to reach AGI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Adjustments {
    #[serde(default)]
    pub retirement_401k: Money,
    #[serde(default)]
    pub traditional_ira: Money,
    #[serde(default)]
    pub student_loan_interest: Money,
    #[serde(default)]
    pub hsa: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionChoice {
    Standard,
    Itemized {
        #[serde(default)]
        mortgage_interest: Money,
        #[serde(default)]
        state_local_taxes: Money,
        #[serde(default)]
        charitable: Money,
        #[serde(default)]
        medical: Money,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub filing_status: FilingStatus,
    pub income: IncomeSources,
    #[serde(default)]
    pub adjustments: Adjustments,
    pub deduction: DeductionChoice,
    /// Credits subtracted from the computed tax, floored at zero.
    #[serde(default)]
    pub tax_credits: Money,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxOutput {
    pub gross_income: Money,
    pub adjusted_gross_income: Money,
    pub deduction_applied: Money,
    pub taxable_income: Money,
    pub total_tax: Money,
    /// Total tax as a percentage of gross income, 0–100.
    pub effective_tax_rate: Percent,
    /// Rate of the highest bracket touched, as a decimal.
    pub marginal_tax_rate: Rate,
    pub bracket_breakdown: Vec<BracketSlice>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute federal income tax under the 2024 tables.
pub fn calculate_income_tax(
    input: &IncomeTaxInput,
) -> FinCalcResult<ComputationOutput<IncomeTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_income_tax_input(input)?;

    let gross_income = input.income.wages
        + input.income.business
        + input.income.investment
        + input.income.other;

    let total_adjustments = input.adjustments.retirement_401k
        + input.adjustments.traditional_ira
        + input.adjustments.student_loan_interest
        + input.adjustments.hsa;
    let adjusted_gross_income = gross_income - total_adjustments;

    let deduction_applied = match &input.deduction {
        DeductionChoice::Standard => standard_deduction(input.filing_status),
        DeductionChoice::Itemized {
            mortgage_interest,
            state_local_taxes,
            charitable,
            medical,
        } => {
            let itemized = *mortgage_interest + *state_local_taxes + *charitable + *medical;
            if itemized < standard_deduction(input.filing_status) {
                warnings.push(format!(
                    "Itemized deductions {} are below the standard deduction {}",
                    itemized,
                    standard_deduction(input.filing_status)
                ));
            }
            itemized
        }
    };

    let taxable_income = (adjusted_gross_income - deduction_applied).max(Decimal::ZERO);

    let brackets = federal_brackets(input.filing_status);
    let bracket_tax = compute_bracket_tax(taxable_income, &brackets)?;

    let total_tax = (bracket_tax.total_tax - input.tax_credits).max(Decimal::ZERO);
    if input.tax_credits > bracket_tax.total_tax && bracket_tax.total_tax > Decimal::ZERO {
        warnings.push("Tax credits exceed the computed tax; liability floored at zero".into());
    }

    let effective_tax_rate = if gross_income > Decimal::ZERO {
        total_tax / gross_income * HUNDRED
    } else {
        Decimal::ZERO
    };

    let output = IncomeTaxOutput {
        gross_income,
        adjusted_gross_income,
        deduction_applied,
        taxable_income,
        total_tax,
        effective_tax_rate,
        marginal_tax_rate: bracket_tax.marginal_rate,
        bracket_breakdown: bracket_tax.per_bracket,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Federal income tax: gross → adjustments → AGI → deduction → \
         taxable income → 2024 progressive brackets → credits",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "tax_year": 2024,
            "deduction": match &input.deduction {
                DeductionChoice::Standard => "standard",
                DeductionChoice::Itemized { .. } => "itemized",
            },
            "tax_credits": input.tax_credits.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_income_tax_input(input: &IncomeTaxInput) -> FinCalcResult<()> {
    let money_fields = [
        ("income.wages", input.income.wages),
        ("income.business", input.income.business),
        ("income.investment", input.income.investment),
        ("income.other", input.income.other),
        ("adjustments.retirement_401k", input.adjustments.retirement_401k),
        ("adjustments.traditional_ira", input.adjustments.traditional_ira),
        (
            "adjustments.student_loan_interest",
            input.adjustments.student_loan_interest,
        ),
        ("adjustments.hsa", input.adjustments.hsa),
        ("tax_credits", input.tax_credits),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    if let DeductionChoice::Itemized {
        mortgage_interest,
        state_local_taxes,
        charitable,
        medical,
    } = &input.deduction
    {
        for (field, value) in [
            ("deduction.mortgage_interest", *mortgage_interest),
            ("deduction.state_local_taxes", *state_local_taxes),
            ("deduction.charitable", *charitable),
            ("deduction.medical", *medical),
        ] {
            if value < Decimal::ZERO {
                return Err(FinCalcError::InvalidInput {
                    field: field.into(),
                    reason: "Amount cannot be negative".into(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wages_only(wages: Decimal) -> IncomeTaxInput {
        IncomeTaxInput {
            filing_status: FilingStatus::Single,
            income: IncomeSources {
                wages,
                ..Default::default()
            },
            adjustments: Adjustments::default(),
            deduction: DeductionChoice::Standard,
            tax_credits: Decimal::ZERO,
        }
    }

    #[test]
    fn test_standard_deduction_pipeline() {
        // 75,000 wages − 14,600 standard = 60,400 taxable → 8,341 tax
        let input = wages_only(dec!(75000));
        let out = calculate_income_tax(&input).unwrap().result;

        assert_eq!(out.gross_income, dec!(75000));
        assert_eq!(out.adjusted_gross_income, dec!(75000));
        assert_eq!(out.taxable_income, dec!(60400));
        assert_eq!(out.total_tax, dec!(8341.00));
        assert_eq!(out.marginal_tax_rate, dec!(0.22));
    }

    #[test]
    fn test_adjustments_reduce_agi() {
        let mut input = wages_only(dec!(75000));
        input.adjustments.retirement_401k = dec!(10000);
        input.adjustments.hsa = dec!(2000);
        let out = calculate_income_tax(&input).unwrap().result;

        assert_eq!(out.adjusted_gross_income, dec!(63000));
        assert_eq!(out.taxable_income, dec!(48400));
    }

    #[test]
    fn test_bracket_allocation_sums_to_taxable() {
        let input = wages_only(dec!(250000));
        let out = calculate_income_tax(&input).unwrap().result;

        let allocated: Decimal = out
            .bracket_breakdown
            .iter()
            .map(|s| s.income_in_bracket)
            .sum();
        assert_eq!(allocated, out.taxable_income);
    }

    #[test]
    fn test_credits_floor_at_zero() {
        let mut input = wages_only(dec!(20000));
        input.tax_credits = dec!(50000);
        let out = calculate_income_tax(&input).unwrap();

        assert_eq!(out.result.total_tax, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_taxable_income_floors_at_zero() {
        let input = wages_only(dec!(10000));
        let out = calculate_income_tax(&input).unwrap().result;

        assert_eq!(out.taxable_income, Decimal::ZERO);
        assert_eq!(out.total_tax, Decimal::ZERO);
        assert_eq!(out.marginal_tax_rate, Decimal::ZERO);
    }

    #[test]
    fn test_itemized_deduction() {
        let mut input = wages_only(dec!(100000));
        input.deduction = DeductionChoice::Itemized {
            mortgage_interest: dec!(12000),
            state_local_taxes: dec!(10000),
            charitable: dec!(3000),
            medical: dec!(0),
        };
        let out = calculate_income_tax(&input).unwrap().result;

        assert_eq!(out.deduction_applied, dec!(25000));
        assert_eq!(out.taxable_income, dec!(75000));
    }

    #[test]
    fn test_negative_income_component_rejected() {
        let mut input = wages_only(dec!(50000));
        input.income.business = dec!(-5000);
        assert!(matches!(
            calculate_income_tax(&input),
            Err(FinCalcError::InvalidInput { .. })
        ));
    }
}
