//! Net-pay pipeline: gross plus additional income, pre-tax deductions,
//! federal tax via the shared progressive bracket walk, a flat state-tax
//! approximation, FICA (capped social security, uncapped medicare), and
//! post-tax deductions, broken down per pay period.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::tax::brackets::{compute_bracket_tax, federal_brackets, FilingStatus};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Flat state income tax approximation; no per-state table is modelled.
const FLAT_STATE_TAX_RATE: Decimal = dec!(0.05);

const SOCIAL_SECURITY_RATE: Decimal = dec!(0.062);

/// 2024 social security wage base. The 6.2% tax stops above this.
const SOCIAL_SECURITY_WAGE_BASE: Decimal = dec!(168600);

const MEDICARE_RATE: Decimal = dec!(0.0145);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayFrequency {
    Annually,
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            PayFrequency::Annually => dec!(1),
            PayFrequency::Monthly => dec!(12),
            PayFrequency::SemiMonthly => dec!(24),
            PayFrequency::BiWeekly => dec!(26),
            PayFrequency::Weekly => dec!(52),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryInput {
    /// Base annual salary, before additional income.
    pub gross_salary: Money,
    pub pay_frequency: PayFrequency,
    pub filing_status: FilingStatus,
    /// Recorded for display; state tax uses a flat approximation regardless.
    #[serde(default)]
    pub state: Option<String>,
    /// Traditional 401(k) contribution as a percentage of base salary.
    #[serde(default)]
    pub retirement_401k_pct: Percent,
    #[serde(default)]
    pub health_insurance_monthly: Money,
    #[serde(default)]
    pub fsa_annual: Money,
    /// Roth 401(k) contribution as a percentage of base salary (post-tax).
    #[serde(default)]
    pub roth_401k_pct: Percent,
    #[serde(default)]
    pub union_dues_monthly: Money,
    #[serde(default)]
    pub other_post_tax_annual: Money,
    #[serde(default)]
    pub bonus: Money,
    #[serde(default)]
    pub overtime: Money,
    #[serde(default)]
    pub commission: Money,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryOutput {
    pub gross_annual: Money,
    pub gross_per_period: Money,
    /// Federal taxable base: gross annual minus pre-tax deductions.
    pub taxable_income: Money,
    pub federal_tax: Money,
    pub state_tax: Money,
    pub social_security: Money,
    pub medicare: Money,
    pub pre_tax_deductions: Money,
    pub post_tax_deductions: Money,
    pub total_taxes: Money,
    pub net_annual: Money,
    pub net_per_period: Money,
    /// Total taxes as a percentage of gross annual income, 0–100.
    pub effective_tax_rate: Percent,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute annual and per-period net pay.
///
/// The identity `net_annual == gross_annual - federal - state - social
/// security - medicare - pre_tax - post_tax` holds exactly.
pub fn calculate_salary(input: &SalaryInput) -> FinCalcResult<ComputationOutput<SalaryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_salary_input(input)?;

    if input.state.is_some() {
        warnings.push(format!(
            "State tax uses a flat {}% approximation, not a per-state table",
            FLAT_STATE_TAX_RATE * HUNDRED
        ));
    }

    let gross_annual = input.gross_salary + input.bonus + input.overtime + input.commission;

    let pre_tax_deductions = input.gross_salary * input.retirement_401k_pct / HUNDRED
        + input.health_insurance_monthly * MONTHS_PER_YEAR
        + input.fsa_annual;

    let taxable_income = gross_annual - pre_tax_deductions;
    if taxable_income < Decimal::ZERO {
        warnings.push("Pre-tax deductions exceed gross income".into());
    }

    let brackets = federal_brackets(input.filing_status);
    let federal_tax = compute_bracket_tax(taxable_income, &brackets)?.total_tax;

    let state_tax = taxable_income.max(Decimal::ZERO) * FLAT_STATE_TAX_RATE;

    let social_security = (gross_annual * SOCIAL_SECURITY_RATE)
        .min(SOCIAL_SECURITY_WAGE_BASE * SOCIAL_SECURITY_RATE);
    let medicare = gross_annual * MEDICARE_RATE;

    let post_tax_deductions = input.gross_salary * input.roth_401k_pct / HUNDRED
        + input.union_dues_monthly * MONTHS_PER_YEAR
        + input.other_post_tax_annual;

    let total_taxes = federal_tax + state_tax + social_security + medicare;
    let net_annual = gross_annual - total_taxes - pre_tax_deductions - post_tax_deductions;

    let periods = input.pay_frequency.periods_per_year();
    let effective_tax_rate = if gross_annual > Decimal::ZERO {
        total_taxes / gross_annual * HUNDRED
    } else {
        Decimal::ZERO
    };

    let output = SalaryOutput {
        gross_annual,
        gross_per_period: gross_annual / periods,
        taxable_income,
        federal_tax,
        state_tax,
        social_security,
        medicare,
        pre_tax_deductions,
        post_tax_deductions,
        total_taxes,
        net_annual,
        net_per_period: net_annual / periods,
        effective_tax_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net pay: 2024 federal brackets on the pre-tax base, flat state \
         approximation, capped social security, uncapped medicare",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "pay_frequency": input.pay_frequency,
            "flat_state_tax_rate": FLAT_STATE_TAX_RATE.to_string(),
            "social_security_wage_base": SOCIAL_SECURITY_WAGE_BASE.to_string(),
            "medicare_rate": MEDICARE_RATE.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_salary_input(input: &SalaryInput) -> FinCalcResult<()> {
    let money_fields = [
        ("gross_salary", input.gross_salary),
        ("health_insurance_monthly", input.health_insurance_monthly),
        ("fsa_annual", input.fsa_annual),
        ("union_dues_monthly", input.union_dues_monthly),
        ("other_post_tax_annual", input.other_post_tax_annual),
        ("bonus", input.bonus),
        ("overtime", input.overtime),
        ("commission", input.commission),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    for (field, value) in [
        ("retirement_401k_pct", input.retirement_401k_pct),
        ("roth_401k_pct", input.roth_401k_pct),
    ] {
        if value < Decimal::ZERO || value > HUNDRED {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Percentage must be between 0 and 100".into(),
            });
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

    fn base_input() -> SalaryInput {
        SalaryInput {
            gross_salary: dec!(85000),
            pay_frequency: PayFrequency::BiWeekly,
            filing_status: FilingStatus::Single,
            state: None,
            retirement_401k_pct: Decimal::ZERO,
            health_insurance_monthly: Decimal::ZERO,
            fsa_annual: Decimal::ZERO,
            roth_401k_pct: Decimal::ZERO,
            union_dues_monthly: Decimal::ZERO,
            other_post_tax_annual: Decimal::ZERO,
            bonus: Decimal::ZERO,
            overtime: Decimal::ZERO,
            commission: Decimal::ZERO,
        }
    }

    #[test]
    fn test_net_pay_identity() {
        let mut input = base_input();
        input.retirement_401k_pct = dec!(6);
        input.health_insurance_monthly = dec!(250);
        input.roth_401k_pct = dec!(4);
        input.union_dues_monthly = dec!(40);
        input.bonus = dec!(5000);
        let out = calculate_salary(&input).unwrap().result;

        assert_eq!(
            out.net_annual,
            out.gross_annual
                - out.federal_tax
                - out.state_tax
                - out.social_security
                - out.medicare
                - out.pre_tax_deductions
                - out.post_tax_deductions
        );
    }

    #[test]
    fn test_social_security_capped() {
        let mut input = base_input();
        input.gross_salary = dec!(250000);
        let out = calculate_salary(&input).unwrap().result;

        // 168,600 * 6.2% = 10,453.20
        assert_eq!(out.social_security, dec!(10453.20));
        // Medicare has no cap
        assert_eq!(out.medicare, dec!(250000) * dec!(0.0145));
    }

    #[test]
    fn test_social_security_below_cap() {
        let out = calculate_salary(&base_input()).unwrap().result;
        assert_eq!(out.social_security, dec!(85000) * dec!(0.062));
    }

    #[test]
    fn test_pre_tax_deductions_reduce_taxable_base() {
        let mut input = base_input();
        input.retirement_401k_pct = dec!(10);
        input.fsa_annual = dec!(2000);
        let out = calculate_salary(&input).unwrap().result;

        assert_eq!(out.pre_tax_deductions, dec!(10500));
        assert_eq!(out.taxable_income, dec!(74500));
    }

    #[test]
    fn test_additional_income_in_gross() {
        let mut input = base_input();
        input.bonus = dec!(3000);
        input.overtime = dec!(1200);
        input.commission = dec!(800);
        let out = calculate_salary(&input).unwrap().result;

        assert_eq!(out.gross_annual, dec!(90000));
    }

    #[test]
    fn test_per_period_division() {
        let out = calculate_salary(&base_input()).unwrap().result;
        assert_eq!(out.gross_per_period, dec!(85000) / dec!(26));
        assert_eq!(out.net_per_period, out.net_annual / dec!(26));
    }

    #[test]
    fn test_state_field_flags_flat_approximation() {
        let mut input = base_input();
        input.state = Some("CA".into());
        let out = calculate_salary(&input).unwrap();
        assert!(!out.warnings.is_empty());
        assert_eq!(
            out.result.state_tax,
            out.result.taxable_income * dec!(0.05)
        );
    }

    #[test]
    fn test_negative_salary_rejected() {
        let mut input = base_input();
        input.gross_salary = dec!(-1);
        assert!(matches!(
            calculate_salary(&input),
            Err(FinCalcError::InvalidInput { .. })
        ));
    }
}
