//! Student loan amortization under four repayment plans, with extra
//! principal payments, a month-by-month schedule, a payoff date, and a
//! side-by-side comparison row per plan.
//!
//! The comparison rows are independent closed-form estimates for display;
//! they are not reconciled against the detailed amortization loop.

use chrono::{Months, NaiveDate, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Fixed term for the extended plan, regardless of the selected term.
const EXTENDED_TERM_MONTHS: u32 = 300;

/// Graduated plan simplification: a flat payment at half the standard one.
const GRADUATED_PAYMENT_FACTOR: Decimal = dec!(0.5);

/// Federal poverty line used by the income-driven formula (single household).
const POVERTY_LINE: Decimal = dec!(13590);

/// Discretionary income starts above 1.5× the poverty line.
const DISCRETIONARY_THRESHOLD_MULTIPLIER: Decimal = dec!(1.5);

/// Income-driven payments take 10% of discretionary income.
const INCOME_DRIVEN_RATE: Decimal = dec!(0.10);

/// Graduated comparison rows estimate total interest at 110% of the
/// standard plan's, reflecting the slower early principal paydown.
const GRADUATED_INTEREST_ESTIMATE_FACTOR: Decimal = dec!(1.1);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepaymentPlan {
    Standard,
    Graduated,
    Extended,
    IncomeDriven,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanInput {
    pub loan_amount: Money,
    /// Annual interest rate, 0–100.
    pub interest_rate_pct: Percent,
    /// Term in years; the extended plan overrides this with 25 years.
    pub loan_term_years: u32,
    /// Origination fees, capitalised into the amortized principal.
    #[serde(default)]
    pub loan_fees: Money,
    pub plan: RepaymentPlan,
    /// Required for the income-driven plan.
    #[serde(default)]
    pub annual_income: Option<Money>,
    /// Collected for the income-driven plan but not applied to the
    /// poverty-line threshold; reported in warnings.
    #[serde(default)]
    pub family_size: Option<u32>,
    /// Extra amount applied to principal each month.
    #[serde(default)]
    pub extra_monthly_payment: Money,
    /// Anchor for the payoff date; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based month number.
    pub month: u32,
    pub payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// Remaining balance after this month's payment.
    pub balance: Money,
}

/// Closed-form summary of one repayment plan for side-by-side display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan: RepaymentPlan,
    pub monthly_payment: Money,
    /// Estimate; not derived from the detailed amortization loop.
    pub total_interest: Money,
    pub total_cost: Money,
    pub payoff_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanOutput {
    /// Base plan payment plus any extra monthly payment.
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Total actually paid over the schedule.
    pub total_cost: Money,
    pub payoff_months: u32,
    pub payoff_date: NaiveDate,
    pub schedule: Vec<PeriodRecord>,
    pub comparison: Vec<PlanSummary>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Amortize the loan under the selected repayment plan.
///
/// Each period: `interest = balance * monthly_rate`, `principal =
/// min(payment - interest, balance)`, `balance -= principal`. The loop ends
/// when the balance reaches zero or the scheduled period count elapses,
/// whichever comes first; extra payments shorten the schedule.
pub fn calculate_student_loan(
    input: &StudentLoanInput,
) -> FinCalcResult<ComputationOutput<StudentLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_student_loan_input(input)?;

    if input.plan == RepaymentPlan::IncomeDriven && input.family_size.is_some() {
        warnings.push(
            "family_size is accepted but not applied to the poverty-line threshold".into(),
        );
    }

    let principal = input.loan_amount + input.loan_fees;
    let monthly_rate = input.interest_rate_pct / HUNDRED / MONTHS_PER_YEAR;
    let scheduled_months = scheduled_months(input.plan, input.loan_term_years);

    let base_payment = base_monthly_payment(input, principal, monthly_rate, scheduled_months)?;
    let total_monthly_payment = base_payment + input.extra_monthly_payment;

    if principal > Decimal::ZERO && total_monthly_payment <= principal * monthly_rate {
        warnings.push(
            "Monthly payment does not cover accrued interest; the balance grows \
             over the scheduled term (negative amortization)"
                .into(),
        );
    }

    let mut schedule: Vec<PeriodRecord> = Vec::new();
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut month: u32 = 0;

    while balance > Decimal::ZERO && month < scheduled_months {
        month += 1;
        let interest_paid = balance * monthly_rate;
        let principal_paid = (total_monthly_payment - interest_paid).min(balance);
        balance -= principal_paid;

        let payment = interest_paid + principal_paid;
        total_interest += interest_paid;
        total_paid += payment;

        schedule.push(PeriodRecord {
            month,
            payment,
            principal_paid,
            interest_paid,
            balance,
        });
    }

    let payoff_months = schedule.len() as u32;
    let anchor = input.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let payoff_date = anchor
        .checked_add_months(Months::new(payoff_months))
        .ok_or_else(|| FinCalcError::DateError("Payoff date out of range".into()))?;

    let comparison = plan_comparison(input, principal, monthly_rate)?;

    let output = StudentLoanOutput {
        monthly_payment: total_monthly_payment,
        total_interest,
        total_cost: total_paid,
        payoff_months,
        payoff_date,
        schedule,
        comparison,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortization; graduated plan modelled as a flat halved \
         payment, extended over 300 periods, income-driven at 10% of income \
         above 1.5× the poverty line",
        &serde_json::json!({
            "plan": input.plan,
            "principal_with_fees": principal.to_string(),
            "monthly_rate": monthly_rate.to_string(),
            "scheduled_months": scheduled_months,
            "poverty_line": POVERTY_LINE.to_string(),
            "extra_monthly_payment": input.extra_monthly_payment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn scheduled_months(plan: RepaymentPlan, term_years: u32) -> u32 {
    match plan {
        RepaymentPlan::Extended => EXTENDED_TERM_MONTHS,
        _ => term_years * 12,
    }
}

/// Fixed-payment annuity: `P * r(1+r)^n / ((1+r)^n - 1)`.
fn annuity_payment(principal: Money, monthly_rate: Rate, months: u32) -> FinCalcResult<Money> {
    if months == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }
    let factor = (Decimal::ONE + monthly_rate).powd(Decimal::from(months));
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }
    Ok(principal * monthly_rate * factor / denominator)
}

fn income_driven_payment(annual_income: Money) -> Money {
    let threshold = POVERTY_LINE * DISCRETIONARY_THRESHOLD_MULTIPLIER;
    let discretionary = (annual_income - threshold).max(Decimal::ZERO);
    discretionary * INCOME_DRIVEN_RATE / MONTHS_PER_YEAR
}

fn base_monthly_payment(
    input: &StudentLoanInput,
    principal: Money,
    monthly_rate: Rate,
    scheduled_months: u32,
) -> FinCalcResult<Money> {
    match input.plan {
        RepaymentPlan::Standard => annuity_payment(principal, monthly_rate, scheduled_months),
        RepaymentPlan::Graduated => {
            let standard = annuity_payment(principal, monthly_rate, scheduled_months)?;
            Ok(standard * GRADUATED_PAYMENT_FACTOR)
        }
        RepaymentPlan::Extended => annuity_payment(principal, monthly_rate, EXTENDED_TERM_MONTHS),
        RepaymentPlan::IncomeDriven => {
            let income = input.annual_income.ok_or_else(|| FinCalcError::InvalidInput {
                field: "annual_income".into(),
                reason: "Income-driven plan requires annual_income".into(),
            })?;
            Ok(income_driven_payment(income))
        }
    }
}

/// One estimate row per plan. Standard and extended rows use the exact
/// annuity totals; graduated and income-driven rows use shortcuts.
fn plan_comparison(
    input: &StudentLoanInput,
    principal: Money,
    monthly_rate: Rate,
) -> FinCalcResult<Vec<PlanSummary>> {
    let standard_months = input.loan_term_years * 12;
    let standard_payment = annuity_payment(principal, monthly_rate, standard_months)?;
    let standard_interest =
        (standard_payment * Decimal::from(standard_months) - principal).max(Decimal::ZERO);

    let extended_payment = annuity_payment(principal, monthly_rate, EXTENDED_TERM_MONTHS)?;
    let extended_interest = (extended_payment * Decimal::from(EXTENDED_TERM_MONTHS) - principal)
        .max(Decimal::ZERO);

    let graduated_interest = standard_interest * GRADUATED_INTEREST_ESTIMATE_FACTOR;

    let mut comparison = vec![
        PlanSummary {
            plan: RepaymentPlan::Standard,
            monthly_payment: standard_payment,
            total_interest: standard_interest,
            total_cost: principal + standard_interest,
            payoff_months: standard_months,
        },
        PlanSummary {
            plan: RepaymentPlan::Graduated,
            monthly_payment: standard_payment * GRADUATED_PAYMENT_FACTOR,
            total_interest: graduated_interest,
            total_cost: principal + graduated_interest,
            payoff_months: standard_months,
        },
        PlanSummary {
            plan: RepaymentPlan::Extended,
            monthly_payment: extended_payment,
            total_interest: extended_interest,
            total_cost: principal + extended_interest,
            payoff_months: EXTENDED_TERM_MONTHS,
        },
    ];

    if let Some(income) = input.annual_income {
        let payment = income_driven_payment(income);
        let total_paid = payment * Decimal::from(standard_months);
        let interest = (total_paid - principal).max(Decimal::ZERO);
        comparison.push(PlanSummary {
            plan: RepaymentPlan::IncomeDriven,
            monthly_payment: payment,
            total_interest: interest,
            total_cost: total_paid.max(principal + interest),
            payoff_months: standard_months,
        });
    }

    Ok(comparison)
}

fn validate_student_loan_input(input: &StudentLoanInput) -> FinCalcResult<()> {
    let money_fields = [
        ("loan_amount", input.loan_amount),
        ("loan_fees", input.loan_fees),
        ("extra_monthly_payment", input.extra_monthly_payment),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    if input.interest_rate_pct < Decimal::ZERO || input.interest_rate_pct > HUNDRED {
        return Err(FinCalcError::InvalidInput {
            field: "interest_rate_pct".into(),
            reason: "Interest rate must be between 0 and 100".into(),
        });
    }
    if input.loan_term_years == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if let Some(income) = input.annual_income {
        if income < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "annual_income".into(),
                reason: "Income cannot be negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
