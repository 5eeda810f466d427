//! # Tier Resolution
//!
//! Graduated tier resolution for volume-priced catalog items.
//!
//! ## Graduated, Not All-Or-Nothing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Schedule:  tier 1: 1–100 @ $2.00      tier 2: 101+ @ $1.00            │
//! │                                                                         │
//! │  quantity = 150                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tier 1 bills its window:   100 × $2.00 = $200.00                      │
//! │  tier 2 bills the rest:      50 × $1.00 =  $50.00                      │
//! │                                          ──────────                     │
//! │  line subtotal                            $250.00                      │
//! │                                                                         │
//! │  The whole quantity is never repriced at a single tier's rate.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schedules Without an Unbounded Final Tier
//! Catalog validation rejects them (see
//! [`crate::validation::validate_tier_schedule`]); the last tier must have
//! `max_quantity = None`. The resolver itself never errors: handed an
//! unvalidated schedule, quantity beyond the highest bounded tier is billed
//! at that tier's rate and folded into its window, so the per-tier
//! quantities always sum to the input quantity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PricingTier;

// =============================================================================
// Active Tier
// =============================================================================

/// One row of a resolved tier breakdown: how much of the line's quantity
/// fell into this tier and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTier {
    /// Id of the schedule tier this row came from.
    pub tier_id: String,

    /// Tier display name.
    pub tier_name: String,

    /// Units billed within this tier's window.
    pub quantity: i64,

    /// Unit price of this tier, in cents.
    pub unit_price_cents: i64,

    /// `quantity × unit_price` for this tier, in cents.
    pub subtotal_cents: i64,
}

impl ActiveTier {
    /// Returns this tier row's subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves a quantity against a graduated tier schedule.
///
/// Pure function of its inputs. Evaluates tiers in ascending `min_quantity`
/// order (sorting a copy of the slice, so callers need not pre-sort).
///
/// ## Edge Cases
/// - `quantity <= 0` → empty breakdown (zero cost)
/// - empty schedule → empty breakdown
/// - quantity beyond all bounded tiers, no unbounded tier → excess billed
///   at the highest tier's rate (see module docs)
///
/// ## Example
/// ```rust
/// use cardquote_core::tiers::resolve_tiers;
/// use cardquote_core::types::PricingTier;
///
/// let tiers = vec![
///     PricingTier {
///         id: "t1".into(),
///         name: "First 100".into(),
///         min_quantity: 1,
///         max_quantity: Some(100),
///         unit_price_cents: 200,
///         description: None,
///         config_field: None,
///     },
///     PricingTier {
///         id: "t2".into(),
///         name: "100+".into(),
///         min_quantity: 101,
///         max_quantity: None,
///         unit_price_cents: 100,
///         description: None,
///         config_field: None,
///     },
/// ];
///
/// let breakdown = resolve_tiers(150, &tiers);
/// assert_eq!(breakdown.len(), 2);
/// assert_eq!(breakdown[0].subtotal_cents, 20_000); // 100 × $2.00
/// assert_eq!(breakdown[1].subtotal_cents, 5_000);  //  50 × $1.00
/// ```
pub fn resolve_tiers(quantity: i64, tiers: &[PricingTier]) -> Vec<ActiveTier> {
    if quantity <= 0 || tiers.is_empty() {
        return Vec::new();
    }

    // Evaluate in window order regardless of how the schedule was stored.
    let mut ordered: Vec<&PricingTier> = tiers.iter().collect();
    ordered.sort_by_key(|t| t.min_quantity);

    let mut breakdown = Vec::new();
    let mut covered: i64 = 0;

    for tier in &ordered {
        if quantity < tier.min_quantity {
            break;
        }

        // Units of the line quantity falling inside [min, max].
        let upper = tier.max_quantity.unwrap_or(i64::MAX);
        let in_tier = quantity.min(upper) - tier.min_quantity + 1;
        if in_tier <= 0 {
            continue;
        }

        let subtotal = Money::from_cents(tier.unit_price_cents).multiply_quantity(in_tier);
        breakdown.push(ActiveTier {
            tier_id: tier.id.clone(),
            tier_name: tier.name.clone(),
            quantity: in_tier,
            unit_price_cents: tier.unit_price_cents,
            subtotal_cents: subtotal.cents(),
        });
        covered += in_tier;
    }

    // Unvalidated schedule fallback: bill the uncovered excess at the top
    // tier's rate so the breakdown still partitions the whole quantity.
    if covered < quantity {
        if let Some(last) = breakdown.last_mut() {
            let excess = quantity - covered;
            last.quantity += excess;
            last.subtotal_cents += Money::from_cents(last.unit_price_cents)
                .multiply_quantity(excess)
                .cents();
        }
    }

    breakdown
}

/// Sums a resolved breakdown into a line subtotal.
pub fn breakdown_subtotal(breakdown: &[ActiveTier]) -> Money {
    breakdown.iter().map(ActiveTier::subtotal).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
