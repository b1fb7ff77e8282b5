//! Discounted-price math: stacked discounts, sales tax, reverse mode,
//! and an independent comparison discount.
//!
//! Sequential discounts compose multiplicatively: applying d₁ then d₂
//! leaves a remaining fraction of `(1-d₁)(1-d₂)`, never `(1-d₁-d₂)`.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A discount expressed either as a percentage of the base price or as a
/// flat monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValue {
    Percent(Percent),
    Flat(Money),
}

/// Forward mode computes the discounted price from the original price;
/// reverse mode recovers the original price from a known final price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    #[default]
    Forward,
    Reverse {
        final_price: Money,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountInput {
    pub original_price: Money,
    /// Item count; the base price is `original_price * quantity`.
    pub quantity: u32,
    pub discount: DiscountValue,
    /// Second discount (0–100), applied sequentially after the first.
    #[serde(default)]
    pub additional_discount_pct: Percent,
    /// Sales tax (0–100) applied to the fully discounted price.
    #[serde(default)]
    pub tax_rate_pct: Percent,
    /// Round price outputs to 2 decimal places (half away from zero).
    #[serde(default)]
    pub round_to_nearest_cent: bool,
    /// Display-only alternative discount applied to the same base price.
    #[serde(default)]
    pub comparison: Option<DiscountValue>,
    #[serde(default)]
    pub mode: DiscountMode,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountOutput {
    /// `original_price * quantity` (recovered price in reverse mode).
    pub base_price: Money,
    pub discounted_price: Money,
    pub amount_saved: Money,
    pub final_price_after_tax: Money,
    /// Combined discount measured against the base price, 0–100.
    pub effective_discount_pct: Percent,
    pub price_per_unit: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_savings: Option<Money>,
    /// Reverse mode only: the original price implied by the final price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_original_price: Option<Money>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute discounted-price figures, branching on `input.mode`.
pub fn calculate_discount(
    input: &DiscountInput,
) -> FinCalcResult<ComputationOutput<DiscountOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_discount_input(input)?;

    let output = match input.mode {
        DiscountMode::Forward => forward(input)?,
        DiscountMode::Reverse { final_price } => reverse(input, final_price)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multiplicative discount stacking with sales tax; reverse mode \
         inverts the discount to recover the original price",
        &serde_json::json!({
            "original_price": input.original_price.to_string(),
            "quantity": input.quantity,
            "discount": input.discount,
            "additional_discount_pct": input.additional_discount_pct.to_string(),
            "tax_rate_pct": input.tax_rate_pct.to_string(),
            "mode": input.mode,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn forward(input: &DiscountInput) -> FinCalcResult<DiscountOutput> {
    let quantity = Decimal::from(input.quantity);
    let base_price = input.original_price * quantity;

    let discount_amount = match input.discount {
        DiscountValue::Percent(pct) => base_price * pct / HUNDRED,
        DiscountValue::Flat(amount) => amount,
    };
    let after_first = base_price - discount_amount;
    let additional_amount = after_first * input.additional_discount_pct / HUNDRED;
    let after_all = after_first - additional_amount;

    let effective_discount_pct = if base_price.is_zero() {
        Decimal::ZERO
    } else {
        (base_price - after_all) / base_price * HUNDRED
    };

    let mut discounted_price = after_all;
    let mut amount_saved = base_price - after_all;
    let mut final_price_after_tax = after_all * (Decimal::ONE + input.tax_rate_pct / HUNDRED);

    if input.round_to_nearest_cent {
        discounted_price = round_cents(discounted_price);
        amount_saved = round_cents(amount_saved);
        final_price_after_tax = round_cents(final_price_after_tax);
    }

    let (comparison_price, comparison_savings) = comparison_figures(base_price, input.comparison);

    Ok(DiscountOutput {
        base_price,
        discounted_price,
        amount_saved,
        final_price_after_tax,
        effective_discount_pct,
        price_per_unit: discounted_price / quantity,
        comparison_price,
        comparison_savings,
        recovered_original_price: None,
    })
}

fn reverse(input: &DiscountInput, final_price: Money) -> FinCalcResult<DiscountOutput> {
    let recovered = match input.discount {
        DiscountValue::Flat(amount) => final_price + amount,
        DiscountValue::Percent(pct) => {
            let remaining = Decimal::ONE - pct / HUNDRED;
            if remaining.is_zero() {
                return Err(FinCalcError::DivisionByZero {
                    context: "reverse discount with a 100% discount rate".into(),
                });
            }
            final_price / remaining
        }
    };

    let amount_saved = recovered - final_price;
    let effective_discount_pct = if recovered.is_zero() {
        Decimal::ZERO
    } else {
        amount_saved / recovered * HUNDRED
    };

    let (comparison_price, comparison_savings) = comparison_figures(recovered, input.comparison);

    Ok(DiscountOutput {
        base_price: recovered,
        discounted_price: final_price,
        amount_saved,
        final_price_after_tax: final_price * (Decimal::ONE + input.tax_rate_pct / HUNDRED),
        effective_discount_pct,
        price_per_unit: final_price / Decimal::from(input.quantity),
        comparison_price,
        comparison_savings,
        recovered_original_price: Some(recovered),
    })
}

/// Independent alternative discount on the same base price, display only.
fn comparison_figures(
    base_price: Money,
    comparison: Option<DiscountValue>,
) -> (Option<Money>, Option<Money>) {
    match comparison {
        Some(DiscountValue::Percent(pct)) => {
            let price = base_price * (Decimal::ONE - pct / HUNDRED);
            (Some(price), Some(base_price - price))
        }
        Some(DiscountValue::Flat(amount)) => {
            let price = base_price - amount;
            (Some(price), Some(amount))
        }
        None => (None, None),
    }
}

fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn validate_discount_input(input: &DiscountInput) -> FinCalcResult<()> {
    if input.original_price < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "original_price".into(),
            reason: "Price cannot be negative".into(),
        });
    }
    if input.quantity == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "quantity".into(),
            reason: "Quantity must be at least 1".into(),
        });
    }
    if let DiscountValue::Percent(pct) = input.discount {
        if pct < Decimal::ZERO || pct > HUNDRED {
            return Err(FinCalcError::InvalidInput {
                field: "discount".into(),
                reason: "Discount percentage must be between 0 and 100".into(),
            });
        }
    }
    if input.additional_discount_pct < Decimal::ZERO || input.additional_discount_pct > HUNDRED {
        return Err(FinCalcError::InvalidInput {
            field: "additional_discount_pct".into(),
            reason: "Additional discount must be between 0 and 100".into(),
        });
    }
    if input.tax_rate_pct < Decimal::ZERO || input.tax_rate_pct > HUNDRED {
        return Err(FinCalcError::InvalidInput {
            field: "tax_rate_pct".into(),
            reason: "Tax rate must be between 0 and 100".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
