//! # Pricing Calculations
//!
//! Line totals and the aggregate fee summary.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Pipeline                                    │
//! │                                                                         │
//! │  SelectedItem                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line_subtotal()     simple: qty × unit price                           │
//! │       │              tiered: Σ tier windows (tiers module)              │
//! │       ▼                                                                 │
//! │  line_total()        per-line discount, floored at zero                 │
//! │       │              is_free short-circuits to $0                       │
//! │       ▼                                                                 │
//! │  summarize()         partition by billing frequency                     │
//! │       │              one-time bucket │ monthly bucket                   │
//! │       │              global discount per scope, floored per bucket      │
//! │       ▼                                                                 │
//! │  FeeSummary          one-time / monthly / yearly / total project cost   │
//! │                      + savings metrics + per-line breakdown             │
//! │                                                                         │
//! │  Pure functions throughout; recomputed on every state change.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tiers::{breakdown_subtotal, ActiveTier};
use crate::types::{
    BillingFrequency, DiscountApplication, DiscountScope, GlobalDiscount, GlobalDiscountKind,
    LineDiscount, PricingMode, SelectedItem,
};
use crate::MONTHS_PER_YEAR;

// =============================================================================
// Line Calculations
// =============================================================================

/// Undiscounted subtotal of a line.
///
/// Simple lines: `quantity × unit_price`. Tiered lines: sum of the
/// graduated tier windows. Non-positive quantities price at zero; negative
/// quantities are rejected upstream by validation and never reach here
/// through the quote container.
pub fn line_subtotal(item: &SelectedItem) -> Money {
    if item.quantity <= 0 {
        return Money::zero();
    }

    match item.pricing_mode {
        PricingMode::Simple => item.unit_price().multiply_quantity(item.quantity),
        PricingMode::Tiered => breakdown_subtotal(&item.active_tiers()),
    }
}

/// Discount amount carried by a line's settings, given its subtotal.
///
/// - `Percentage { bps }`: `subtotal × bps / 10000`
/// - `Fixed, Unit`: `amount × quantity`
/// - `Fixed, Total`: flat `amount`
pub fn line_discount_amount(item: &SelectedItem, subtotal: Money) -> Money {
    match item.discount {
        LineDiscount::None => Money::zero(),
        LineDiscount::Percentage { bps } => subtotal.percentage(bps),
        LineDiscount::Fixed {
            amount_cents,
            application,
        } => match application {
            DiscountApplication::Unit => {
                Money::from_cents(amount_cents).multiply_quantity(item.quantity.max(0))
            }
            DiscountApplication::Total => Money::from_cents(amount_cents),
        },
    }
}

/// Final total of a line: subtotal minus discount, floored at zero.
///
/// `is_free` returns zero regardless of every other field.
///
/// ## Example
/// ```rust
/// use cardquote_core::pricing::line_total;
/// # use cardquote_core::types::*;
/// # use chrono::Utc;
/// # let item = SelectedItem {
/// #     item_id: "i".into(), name: "n".into(), unit_label: "per card".into(),
/// #     billing_frequency: BillingFrequency::Monthly, pricing_mode: PricingMode::Simple,
/// #     unit_price_cents: 1000, tiers: vec![], quantity: 5,
/// #     discount: LineDiscount::Percentage { bps: 2000 },
/// #     is_free: false, source: SelectionSource::Manual, added_at: Utc::now(),
/// # };
/// // unit $10.00 × 5 = $50.00, 20% off → $40.00
/// assert_eq!(line_total(&item).cents(), 4000);
/// ```
pub fn line_total(item: &SelectedItem) -> Money {
    if item.is_free {
        return Money::zero();
    }

    let subtotal = line_subtotal(item);
    subtotal.subtract_floored(line_discount_amount(item, subtotal))
}

// =============================================================================
// Line Breakdown
// =============================================================================

/// Per-line figures surfaced to the summary panel.
///
/// `discount_cents` is the reduction actually applied (after the zero
/// floor), so `subtotal - discount = total` always holds. A free line
/// records its whole subtotal as discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    /// Catalog item id of the line.
    pub item_id: String,

    /// Frozen item name.
    pub name: String,

    /// One-time vs. monthly bucket this line lands in.
    pub billing_frequency: BillingFrequency,

    /// Line quantity.
    pub quantity: i64,

    /// Frozen unit price in cents (simple-mode display; tiered lines show
    /// `active_tiers` instead).
    pub unit_price_cents: i64,

    /// Undiscounted line subtotal in cents.
    pub subtotal_cents: i64,

    /// Applied reduction in cents (post-floor).
    pub discount_cents: i64,

    /// Final line total in cents.
    pub total_cents: i64,

    /// Graduated tier rows (empty for simple lines).
    pub active_tiers: Vec<ActiveTier>,
}

impl LineBreakdown {
    fn from_item(item: &SelectedItem) -> Self {
        let subtotal = line_subtotal(item);
        let total = line_total(item);

        LineBreakdown {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            billing_frequency: item.billing_frequency,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            subtotal_cents: subtotal.cents(),
            discount_cents: (subtotal - total).cents(),
            total_cents: total.cents(),
            active_tiers: item.active_tiers(),
        }
    }
}

// =============================================================================
// Fee Summary
// =============================================================================

/// The aggregate output of the pricing engine.
///
/// All monetary figures are non-negative cents. `savings_rate` is the only
/// float and exists purely for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    /// One-time bucket before the global discount.
    pub one_time_subtotal_cents: i64,

    /// Monthly bucket before the global discount.
    pub monthly_subtotal_cents: i64,

    /// One-time bucket after the global discount.
    pub one_time_total_cents: i64,

    /// Monthly bucket after the global discount.
    pub monthly_total_cents: i64,

    /// `monthly_total × 12`.
    pub yearly_total_cents: i64,

    /// `one_time_total + yearly_total`.
    pub total_project_cost_cents: i64,

    /// Per-period discount: what the one-time bucket plus one month of the
    /// recurring bucket saved versus list prices.
    pub total_discount_cents: i64,

    /// Undiscounted, annualized list price
    /// (one-time list + monthly list × 12).
    pub original_price_cents: i64,

    /// `original_price − total_project_cost` (annualized, non-negative).
    pub savings_cents: i64,

    /// `savings / original_price × 100`; 0 when `original_price` is 0.
    pub savings_rate: f64,

    /// Per-line breakdown for display.
    pub lines: Vec<LineBreakdown>,
}

/// Folds all selected lines into the final summary.
///
/// Pure and deterministic; the configurator re-runs it on every relevant
/// state change (dataset sizes are tens of items, so there is no caching).
///
/// ## Buckets and the Global Discount
/// Lines partition by `billing_frequency`. The global discount applies to
/// the bucket(s) named by its scope: a percentage is taken of each in-scope
/// bucket's subtotal; a fixed amount is subtracted from each in-scope
/// bucket. Each bucket floors at zero independently.
pub fn summarize(items: &[SelectedItem], global_discount: &GlobalDiscount) -> FeeSummary {
    let lines: Vec<LineBreakdown> = items.iter().map(LineBreakdown::from_item).collect();

    let mut one_time_subtotal = Money::zero();
    let mut monthly_subtotal = Money::zero();
    let mut one_time_list = Money::zero();
    let mut monthly_list = Money::zero();

    for line in &lines {
        match line.billing_frequency {
            BillingFrequency::OneTime => {
                one_time_subtotal += Money::from_cents(line.total_cents);
                one_time_list += Money::from_cents(line.subtotal_cents);
            }
            BillingFrequency::Monthly => {
                monthly_subtotal += Money::from_cents(line.total_cents);
                monthly_list += Money::from_cents(line.subtotal_cents);
            }
        }
    }

    let one_time_total = apply_global_discount(
        one_time_subtotal,
        global_discount,
        matches!(
            global_discount.scope,
            DiscountScope::Both | DiscountScope::OneTime
        ),
    );
    let monthly_total = apply_global_discount(
        monthly_subtotal,
        global_discount,
        matches!(
            global_discount.scope,
            DiscountScope::Both | DiscountScope::Monthly
        ),
    );

    let yearly_total = monthly_total * MONTHS_PER_YEAR;
    let total_project_cost = one_time_total + yearly_total;

    let original_price = one_time_list + monthly_list * MONTHS_PER_YEAR;
    let savings = original_price - total_project_cost;

    // Guard against the empty quote: 0/0 reports 0% saved, not NaN.
    let savings_rate = if original_price.is_zero() {
        0.0
    } else {
        savings.cents() as f64 / original_price.cents() as f64 * 100.0
    };

    let total_discount =
        (one_time_list - one_time_total) + (monthly_list - monthly_total);

    FeeSummary {
        one_time_subtotal_cents: one_time_subtotal.cents(),
        monthly_subtotal_cents: monthly_subtotal.cents(),
        one_time_total_cents: one_time_total.cents(),
        monthly_total_cents: monthly_total.cents(),
        yearly_total_cents: yearly_total.cents(),
        total_project_cost_cents: total_project_cost.cents(),
        total_discount_cents: total_discount.cents(),
        original_price_cents: original_price.cents(),
        savings_cents: savings.cents(),
        savings_rate,
        lines,
    }
}

/// Applies the global discount to one bucket subtotal.
fn apply_global_discount(
    bucket_subtotal: Money,
    discount: &GlobalDiscount,
    in_scope: bool,
) -> Money {
    if !in_scope {
        return bucket_subtotal;
    }

    let amount = match discount.kind {
        GlobalDiscountKind::Percentage { bps } => bucket_subtotal.percentage(bps),
        GlobalDiscountKind::Fixed { amount_cents } => Money::from_cents(amount_cents),
    };

    bucket_subtotal.subtract_floored(amount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PricingTier, SelectionSource};
    use chrono::Utc;

    fn simple_item(price_cents: i64, quantity: i64, freq: BillingFrequency) -> SelectedItem {
        SelectedItem {
            item_id: "item".to_string(),
            name: "Item".to_string(),
            unit_label: "per card".to_string(),
            billing_frequency: freq,
            pricing_mode: PricingMode::Simple,
            unit_price_cents: price_cents,
            tiers: Vec::new(),
            quantity,
            discount: LineDiscount::None,
            is_free: false,
            source: SelectionSource::Manual,
            added_at: Utc::now(),
        }
    }

    fn tiered_item(quantity: i64) -> SelectedItem {
        let mut item = simple_item(0, quantity, BillingFrequency::Monthly);
        item.pricing_mode = PricingMode::Tiered;
        item.tiers = vec![
            PricingTier {
                id: "t1".into(),
                name: "1-100".into(),
                min_quantity: 1,
                max_quantity: Some(100),
                unit_price_cents: 200,
                description: None,
                config_field: None,
            },
            PricingTier {
                id: "t2".into(),
                name: "101+".into(),
                min_quantity: 101,
                max_quantity: None,
                unit_price_cents: 100,
                description: None,
                config_field: None,
            },
        ];
        item
    }

    #[test]
    fn test_line_total_no_discount() {
        // unitPrice=$10, quantity=5 → $50
        let item = simple_item(1000, 5, BillingFrequency::Monthly);
        assert_eq!(line_total(&item).cents(), 5000);
    }

    #[test]
    fn test_line_total_percentage_discount() {
        // unitPrice=$10, quantity=5, 20% off → $40
        let mut item = simple_item(1000, 5, BillingFrequency::Monthly);
        item.discount = LineDiscount::Percentage { bps: 2000 };
        assert_eq!(line_total(&item).cents(), 4000);
    }

    #[test]
    fn test_line_total_fixed_unit_discount() {
        // $1.00 off each of 5 units of a $10.00 item → $45
        let mut item = simple_item(1000, 5, BillingFrequency::Monthly);
        item.discount = LineDiscount::Fixed {
            amount_cents: 100,
            application: DiscountApplication::Unit,
        };
        assert_eq!(line_total(&item).cents(), 4500);
    }

    #[test]
    fn test_line_total_fixed_total_discount() {
        // flat $1.00 off the $50.00 line → $49
        let mut item = simple_item(1000, 5, BillingFrequency::Monthly);
        item.discount = LineDiscount::Fixed {
            amount_cents: 100,
            application: DiscountApplication::Total,
        };
        assert_eq!(line_total(&item).cents(), 4900);
    }

    #[test]
    fn test_line_total_floors_at_zero() {
        let mut item = simple_item(1000, 1, BillingFrequency::Monthly);
        item.discount = LineDiscount::Fixed {
            amount_cents: 99_999,
            application: DiscountApplication::Total,
        };
        assert_eq!(line_total(&item).cents(), 0);
    }

    #[test]
    fn test_free_item_prices_at_zero() {
        let mut item = simple_item(1000, 5, BillingFrequency::Monthly);
        item.is_free = true;
        assert_eq!(line_total(&item).cents(), 0);

        let breakdown = LineBreakdown::from_item(&item);
        assert_eq!(breakdown.subtotal_cents, 5000);
        assert_eq!(breakdown.discount_cents, 5000);
        assert_eq!(breakdown.total_cents, 0);
    }

    #[test]
    fn test_tiered_line_total() {
        // [1–100 @ $2, 101+ @ $1], quantity=150 → 200 + 50 = $250
        let item = tiered_item(150);
        assert_eq!(line_total(&item).cents(), 25_000);

        let breakdown = LineBreakdown::from_item(&item);
        assert_eq!(breakdown.active_tiers.len(), 2);
    }

    #[test]
    fn test_summarize_buckets_and_monthly_scope() {
        // oneTime=$500, monthly=$1000, 10% global on monthly scope:
        // oneTimeFinal=$500, monthlyFinal=$900, yearly=$10800, total=$11300
        let items = vec![
            simple_item(50_000, 1, BillingFrequency::OneTime),
            simple_item(100_000, 1, BillingFrequency::Monthly),
        ];
        let discount = GlobalDiscount::percentage(1000, DiscountScope::Monthly);

        let summary = summarize(&items, &discount);
        assert_eq!(summary.one_time_total_cents, 50_000);
        assert_eq!(summary.monthly_total_cents, 90_000);
        assert_eq!(summary.yearly_total_cents, 1_080_000);
        assert_eq!(summary.total_project_cost_cents, 1_130_000);
    }

    #[test]
    fn test_summarize_scope_both_fixed() {
        let items = vec![
            simple_item(50_000, 1, BillingFrequency::OneTime),
            simple_item(100_000, 1, BillingFrequency::Monthly),
        ];
        let discount = GlobalDiscount::fixed(10_000, DiscountScope::Both);

        let summary = summarize(&items, &discount);
        assert_eq!(summary.one_time_total_cents, 40_000);
        assert_eq!(summary.monthly_total_cents, 90_000);
    }

    #[test]
    fn test_summarize_scope_none_leaves_buckets_untouched() {
        let items = vec![simple_item(100_000, 1, BillingFrequency::Monthly)];
        let summary = summarize(&items, &GlobalDiscount::none());
        assert_eq!(summary.monthly_total_cents, 100_000);
        assert_eq!(summary.total_discount_cents, 0);
    }

    #[test]
    fn test_summarize_empty_quote_no_division_by_zero() {
        let summary = summarize(&[], &GlobalDiscount::none());
        assert_eq!(summary.original_price_cents, 0);
        assert_eq!(summary.savings_cents, 0);
        assert_eq!(summary.savings_rate, 0.0);
    }

    #[test]
    fn test_savings_metrics_annualized() {
        // Monthly $1000 at 10% off: saves $100/month → $1200/year
        let mut item = simple_item(100_000, 1, BillingFrequency::Monthly);
        item.discount = LineDiscount::Percentage { bps: 1000 };

        let summary = summarize(&[item], &GlobalDiscount::none());
        assert_eq!(summary.original_price_cents, 1_200_000);
        assert_eq!(summary.total_project_cost_cents, 1_080_000);
        assert_eq!(summary.savings_cents, 120_000);
        assert!((summary.savings_rate - 10.0).abs() < 1e-9);
        // Per-period discount: one month's worth
        assert_eq!(summary.total_discount_cents, 10_000);
    }

    #[test]
    fn test_summarize_idempotent() {
        let items = vec![
            simple_item(50_000, 1, BillingFrequency::OneTime),
            tiered_item(150),
        ];
        let discount = GlobalDiscount::percentage(500, DiscountScope::Both);

        let first = summarize(&items, &discount);
        let second = summarize(&items, &discount);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_bucket_floor() {
        let items = vec![simple_item(500, 1, BillingFrequency::OneTime)];
        let discount = GlobalDiscount::fixed(10_000, DiscountScope::OneTime);

        let summary = summarize(&items, &discount);
        assert_eq!(summary.one_time_total_cents, 0);
        assert_eq!(summary.total_project_cost_cents, 0);
    }
}
