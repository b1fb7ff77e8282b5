use fincalc_core::discount::{
    calculate_discount, DiscountInput, DiscountMode, DiscountValue,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn input() -> DiscountInput {
    DiscountInput {
        original_price: dec!(100),
        quantity: 1,
        discount: DiscountValue::Percent(dec!(20)),
        additional_discount_pct: Decimal::ZERO,
        tax_rate_pct: Decimal::ZERO,
        round_to_nearest_cent: false,
        comparison: None,
        mode: DiscountMode::Forward,
    }
}

#[test]
fn test_sequential_stacking_never_adds() {
    // 20% then 10% is 28% combined, not 30%
    let mut i = input();
    i.additional_discount_pct = dec!(10);
    let out = calculate_discount(&i).unwrap().result;

    assert_eq!(out.discounted_price, dec!(72));
    assert_eq!(out.effective_discount_pct, dec!(28));
}

#[test]
fn test_effective_percent_matches_definition() {
    let mut i = input();
    i.quantity = 3;
    i.discount = DiscountValue::Flat(dec!(45));
    i.additional_discount_pct = dec!(5);
    let out = calculate_discount(&i).unwrap().result;

    let expected = (out.base_price - out.discounted_price) / out.base_price * dec!(100);
    assert_eq!(out.effective_discount_pct, expected);
}

#[test]
fn test_tax_applied_after_all_discounts() {
    let mut i = input();
    i.additional_discount_pct = dec!(10);
    i.tax_rate_pct = dec!(7.25);
    let out = calculate_discount(&i).unwrap().result;

    assert_eq!(out.final_price_after_tax, dec!(72) * dec!(1.0725));
}

#[test]
fn test_reverse_roundtrips_forward() {
    // Forward: $80 at 25% → $60. Reverse recovers the $80.
    let mut i = input();
    i.discount = DiscountValue::Percent(dec!(25));
    i.mode = DiscountMode::Reverse {
        final_price: dec!(60),
    };
    let out = calculate_discount(&i).unwrap().result;
    assert_eq!(out.recovered_original_price, Some(dec!(80)));
}

#[test]
fn test_comparison_does_not_change_primary_result() {
    let mut with_comparison = input();
    with_comparison.comparison = Some(DiscountValue::Percent(dec!(30)));

    let a = calculate_discount(&with_comparison).unwrap().result;
    let b = calculate_discount(&input()).unwrap().result;

    assert_eq!(a.discounted_price, b.discounted_price);
    assert_eq!(a.final_price_after_tax, b.final_price_after_tax);
    assert_eq!(a.comparison_price, Some(dec!(70)));
}

#[test]
fn test_idempotent() {
    let mut i = input();
    i.additional_discount_pct = dec!(10);
    i.tax_rate_pct = dec!(8);
    let a = calculate_discount(&i).unwrap().result;
    let b = calculate_discount(&i).unwrap().result;

    assert_eq!(a.discounted_price, b.discounted_price);
    assert_eq!(a.final_price_after_tax, b.final_price_after_tax);
    assert_eq!(a.effective_discount_pct, b.effective_discount_pct);
}

#[test]
fn test_input_serde_roundtrip() {
    let mut i = input();
    i.mode = DiscountMode::Reverse {
        final_price: dec!(59.99),
    };
    let json = serde_json::to_string(&i).unwrap();
    let back: DiscountInput = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mode, i.mode);
    assert_eq!(back.discount, i.discount);
}
