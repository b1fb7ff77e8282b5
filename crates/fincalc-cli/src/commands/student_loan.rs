use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use fincalc_core::student_loan::{
    calculate_student_loan, RepaymentPlan, StudentLoanInput,
};

/// Arguments for the student loan calculator
#[derive(Args)]
pub struct StudentLoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate (0-100)
    #[arg(long)]
    pub interest_rate: Decimal,

    /// Term in years (the extended plan always runs 25 years)
    #[arg(long, default_value = "10")]
    pub term_years: u32,

    /// Origination fees capitalised into the principal
    #[arg(long, default_value = "0")]
    pub fees: Decimal,

    /// Plan: standard, graduated, extended, income-driven
    #[arg(long, default_value = "standard")]
    pub plan: String,

    /// Annual income (required for income-driven)
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Household size (recorded, not applied to the payment formula)
    #[arg(long)]
    pub family_size: Option<u32>,

    /// Extra amount paid toward principal each month
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Payoff date anchor (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

fn parse_plan(s: &str) -> Result<RepaymentPlan, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "standard" => Ok(RepaymentPlan::Standard),
        "graduated" => Ok(RepaymentPlan::Graduated),
        "extended" => Ok(RepaymentPlan::Extended),
        "income-driven" | "income" => Ok(RepaymentPlan::IncomeDriven),
        other => Err(format!(
            "Unknown plan '{}'. Use: standard, graduated, extended, income-driven",
            other
        )
        .into()),
    }
}

pub fn run_student_loan(args: StudentLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.interest_rate < Decimal::ZERO || args.interest_rate > dec!(100) {
        return Err("--interest-rate must be between 0 and 100".into());
    }

    let input = StudentLoanInput {
        loan_amount: args.loan_amount,
        interest_rate_pct: args.interest_rate,
        loan_term_years: args.term_years,
        loan_fees: args.fees,
        plan: parse_plan(&args.plan)?,
        annual_income: args.annual_income,
        family_size: args.family_size,
        extra_monthly_payment: args.extra_payment,
        as_of: args.as_of,
    };
    let result = calculate_student_loan(&input)?;
    Ok(serde_json::to_value(result)?)
}
