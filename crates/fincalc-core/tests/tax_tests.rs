use fincalc_core::tax::brackets::{
    compute_bracket_tax, federal_brackets, standard_deduction, FilingStatus,
};
use fincalc_core::tax::income_tax::{
    calculate_income_tax, Adjustments, DeductionChoice, IncomeSources, IncomeTaxInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Bracket walk
// ===========================================================================

#[test]
fn test_single_60400_reference_case() {
    let brackets = federal_brackets(FilingStatus::Single);
    let out = compute_bracket_tax(dec!(60400), &brackets).unwrap();

    // 11,600×10% + 35,550×12% + 13,250×22% = 1,160 + 4,266 + 2,915
    assert_eq!(out.total_tax, dec!(8341.00));
    assert_eq!(out.marginal_rate, dec!(0.22));
}

#[test]
fn test_allocation_is_exhaustive_across_statuses() {
    for status in [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::HeadOfHousehold,
    ] {
        let brackets = federal_brackets(status);
        for taxable in [dec!(0), dec!(9000), dec!(60400), dec!(150000), dec!(800000)] {
            let out = compute_bracket_tax(taxable, &brackets).unwrap();
            let allocated: Decimal = out.per_bracket.iter().map(|s| s.income_in_bracket).sum();
            assert_eq!(allocated, taxable, "{status:?} at {taxable}");

            let summed: Decimal = out.per_bracket.iter().map(|s| s.tax_in_bracket).sum();
            assert_eq!(summed, out.total_tax, "{status:?} at {taxable}");
        }
    }
}

#[test]
fn test_marginal_rate_is_highest_touched_bracket() {
    let brackets = federal_brackets(FilingStatus::Single);
    let out = compute_bracket_tax(dec!(47151), &brackets).unwrap();
    // One dollar into the 22% bracket
    assert_eq!(out.marginal_rate, dec!(0.22));
    assert_eq!(out.per_bracket[2].income_in_bracket, dec!(1));
}

// ===========================================================================
// Income tax pipeline
// ===========================================================================

fn pipeline_input(wages: Decimal) -> IncomeTaxInput {
    IncomeTaxInput {
        filing_status: FilingStatus::Single,
        income: IncomeSources {
            wages,
            business: Decimal::ZERO,
            investment: Decimal::ZERO,
            other: Decimal::ZERO,
        },
        adjustments: Adjustments::default(),
        deduction: DeductionChoice::Standard,
        tax_credits: Decimal::ZERO,
    }
}

#[test]
fn test_full_pipeline_with_all_stages() {
    let mut input = pipeline_input(dec!(95000));
    input.income.investment = dec!(5000);
    input.adjustments.traditional_ira = dec!(6500);
    input.adjustments.student_loan_interest = dec!(2500);
    input.tax_credits = dec!(2000);

    let out = calculate_income_tax(&input).unwrap().result;

    assert_eq!(out.gross_income, dec!(100000));
    assert_eq!(out.adjusted_gross_income, dec!(91000));
    assert_eq!(
        out.taxable_income,
        dec!(91000) - standard_deduction(FilingStatus::Single)
    );

    let recomputed = compute_bracket_tax(
        out.taxable_income,
        &federal_brackets(FilingStatus::Single),
    )
    .unwrap();
    assert_eq!(out.total_tax, recomputed.total_tax - dec!(2000));
    assert_eq!(out.marginal_tax_rate, recomputed.marginal_rate);
}

#[test]
fn test_effective_rate_below_marginal() {
    let out = calculate_income_tax(&pipeline_input(dec!(120000)))
        .unwrap()
        .result;
    let marginal_pct = out.marginal_tax_rate * dec!(100);
    assert!(out.effective_tax_rate < marginal_pct);
    assert!(out.effective_tax_rate > Decimal::ZERO);
}

#[test]
fn test_bracket_slices_reconcile_with_total() {
    let out = calculate_income_tax(&pipeline_input(dec!(250000)))
        .unwrap()
        .result;
    let summed: Decimal = out
        .bracket_breakdown
        .iter()
        .map(|s| s.tax_in_bracket)
        .sum();
    // Credits are zero here, so the slices reconcile exactly
    assert_eq!(summed, out.total_tax);
}

#[test]
fn test_idempotent() {
    let input = pipeline_input(dec!(75000));
    let a = calculate_income_tax(&input).unwrap().result;
    let b = calculate_income_tax(&input).unwrap().result;
    assert_eq!(a.total_tax, b.total_tax);
    assert_eq!(a.bracket_breakdown, b.bracket_breakdown);
}
