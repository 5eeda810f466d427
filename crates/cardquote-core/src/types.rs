//! # Domain Types
//!
//! Core domain types for the cardquote pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PricingItem    │   │  PricingTier    │   │ ServiceMapping  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  item_id (FK)   │       │
//! │  │  pricing_mode   │   │  min_quantity   │   │  config_field   │       │
//! │  │  billing_freq   │   │  max_quantity?  │   │  auto_add       │       │
//! │  │  unit_price     │   │  unit_price     │   │  sync_quantity  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SelectedItem   │   │  LineDiscount   │   │ GlobalDiscount  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  snapshot of a  │   │  None           │   │  scope (bucket) │       │
//! │  │  catalog item   │   │  Percentage bps │   │  Percentage bps │       │
//! │  │  in the quote   │   │  Fixed cents    │   │  Fixed cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SelectedItem` freezes the catalog item's name, unit price, and tier
//! schedule at the moment it enters the quote. Catalog edits made by an
//! administrator afterwards never silently reprice an open quote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tiers::{resolve_tiers, ActiveTier};

// =============================================================================
// Billing Frequency
// =============================================================================

/// How an item bills: once, or every month.
///
/// ## Why an Explicit Enum?
/// The partition into one-time and recurring buckets used to be inferred by
/// string-matching category ids and unit labels at calculation time. Here it
/// is decided once, at data entry, and every later step just reads the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    /// Billed once (setup fees, per-change work).
    OneTime,
    /// Billed every month; annualized as monthly × 12 in summaries.
    Monthly,
}

impl BillingFrequency {
    /// Classifies a catalog entry from its category id and unit label.
    ///
    /// Data-entry helper only (admin import, seeding). The calculator never
    /// calls this; it reads the stored enum.
    ///
    /// One-time: the `setup` category, and the `one-time` / `per change`
    /// unit labels. Everything else bills monthly.
    pub fn from_unit_label(category_id: &str, unit_label: &str) -> Self {
        if category_id == "setup" || matches!(unit_label, "one-time" | "per change") {
            BillingFrequency::OneTime
        } else {
            BillingFrequency::Monthly
        }
    }
}

// =============================================================================
// Pricing Mode
// =============================================================================

/// How an item's line subtotal is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Flat `quantity × unit_price`.
    Simple,
    /// Graduated tier schedule; see [`crate::tiers`].
    Tiered,
}

// =============================================================================
// Pricing Tier
// =============================================================================

/// One quantity window of a graduated tier schedule.
///
/// Belongs to exactly one tiered [`PricingItem`]. Invariants (enforced by
/// [`crate::validation::validate_tier_schedule`]): tiers are ascending by
/// `min_quantity`, non-overlapping, contiguous, and the last tier has
/// `max_quantity = None` (unbounded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("First 100k cards", "100k+").
    pub name: String,

    /// Inclusive lower bound of the window.
    pub min_quantity: i64,

    /// Inclusive upper bound; `None` = unbounded final tier.
    pub max_quantity: Option<i64>,

    /// Unit price within this window, in cents.
    pub unit_price_cents: i64,

    /// Optional description shown in the tier breakdown.
    pub description: Option<String>,

    /// Optional back-reference to the configuration field that drives the
    /// item's quantity (display hint for the configurator).
    pub config_field: Option<String>,
}

impl PricingTier {
    /// Returns the tier's unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Pricing Item
// =============================================================================

/// A catalog entry, created/edited by an administrator; read-only to end
/// users. Persisted until administratively deleted (soft delete).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the item picker and on the quote.
    pub name: String,

    /// Optional description for item details.
    pub description: Option<String>,

    /// Category this item belongs to ("setup", "issuance", "processing", ...).
    pub category_id: String,

    /// Unit label ("per card", "per transaction", "one-time", ...).
    pub unit_label: String,

    /// One-time vs. monthly, decided at data entry.
    pub billing_frequency: BillingFrequency,

    /// Simple or tiered pricing.
    pub pricing_mode: PricingMode,

    /// Default unit price in cents (simple mode; ignored when tiered).
    pub unit_price_cents: i64,

    /// Graduated tier schedule (tiered mode; empty when simple).
    pub tiers: Vec<PricingTier>,

    /// Free-form tags for filtering in the configurator.
    pub tags: Vec<String>,

    /// Whether item is active (soft delete).
    pub is_active: bool,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Bumped on every catalog edit.
    pub sync_version: i64,
}

impl PricingItem {
    /// Returns the default unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Service Mapping
// =============================================================================

/// How a mapping decides whether its configuration field "fires".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Fires when the field is `Bool(true)`.
    Boolean,
    /// Fires when the field is `Number(n)` with `n > 0`.
    Number,
}

/// Links a [`PricingItem`] to a configuration field.
///
/// Drives the auto-add / quantity-sync rule engine ([`crate::rules`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMapping {
    /// The catalog item this mapping controls.
    pub item_id: String,

    /// The configuration field id it watches.
    pub config_field: String,

    /// How the field value is evaluated.
    pub trigger: TriggerCondition,

    /// Whether a firing field inserts the item into the selection.
    pub auto_add: bool,

    /// Whether the item's quantity tracks the field's numeric value.
    pub sync_quantity: bool,

    /// Multiplier applied to the synced quantity (default 1).
    pub quantity_multiplier: i64,
}

impl ServiceMapping {
    /// Creates a mapping with the default multiplier of 1.
    pub fn new(
        item_id: impl Into<String>,
        config_field: impl Into<String>,
        trigger: TriggerCondition,
    ) -> Self {
        ServiceMapping {
            item_id: item_id.into(),
            config_field: config_field.into(),
            trigger,
            auto_add: false,
            sync_quantity: false,
            quantity_multiplier: 1,
        }
    }

    /// Builder: enable auto-add.
    pub fn with_auto_add(mut self) -> Self {
        self.auto_add = true;
        self
    }

    /// Builder: enable quantity-sync.
    pub fn with_sync_quantity(mut self) -> Self {
        self.sync_quantity = true;
        self
    }

    /// Builder: set the quantity multiplier.
    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.quantity_multiplier = multiplier;
        self
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// Whether a fixed discount applies per unit or once per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountApplication {
    /// Discount amount × quantity.
    Unit,
    /// Flat discount on the line subtotal.
    Total,
}

/// Per-line discount settings on a [`SelectedItem`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineDiscount {
    /// No discount.
    #[default]
    None,

    /// Percentage of the line subtotal, in basis points (2000 = 20%).
    Percentage { bps: u32 },

    /// Fixed amount in cents, applied per unit or per line.
    Fixed {
        amount_cents: i64,
        application: DiscountApplication,
    },
}

/// Which summary bucket(s) a global discount touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountScope {
    /// Global discount disabled.
    #[default]
    None,
    /// Both the one-time and monthly buckets.
    Both,
    /// Monthly bucket only.
    Monthly,
    /// One-time bucket only.
    OneTime,
}

/// The amount side of a global discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlobalDiscountKind {
    /// Percentage of each in-scope bucket subtotal, in basis points.
    Percentage { bps: u32 },
    /// Flat amount in cents, applied to each in-scope bucket.
    Fixed { amount_cents: i64 },
}

/// A discount applied across a bucket of items rather than a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDiscount {
    /// Which bucket(s) the discount touches.
    pub scope: DiscountScope,

    /// Percentage or fixed amount.
    pub kind: GlobalDiscountKind,
}

impl Default for GlobalDiscount {
    fn default() -> Self {
        GlobalDiscount {
            scope: DiscountScope::None,
            kind: GlobalDiscountKind::Percentage { bps: 0 },
        }
    }
}

impl GlobalDiscount {
    /// A disabled global discount.
    pub fn none() -> Self {
        GlobalDiscount::default()
    }

    /// Percentage discount (basis points) over the given scope.
    pub fn percentage(bps: u32, scope: DiscountScope) -> Self {
        GlobalDiscount {
            scope,
            kind: GlobalDiscountKind::Percentage { bps },
        }
    }

    /// Fixed discount (cents) over the given scope.
    pub fn fixed(amount_cents: i64, scope: DiscountScope) -> Self {
        GlobalDiscount {
            scope,
            kind: GlobalDiscountKind::Fixed { amount_cents },
        }
    }
}

// =============================================================================
// Selected Item
// =============================================================================

/// How an item entered the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Picked by the user. Never auto-removed by the rule engine.
    Manual,
    /// Inserted by an auto-add mapping. Removed when its trigger clears.
    AutoAdded,
}

/// A catalog item placed into the working quote.
///
/// Name, unit price, billing frequency, and tier schedule are frozen at the
/// moment of selection (snapshot pattern). Created when a user adds an item
/// (manually or via auto-add); destroyed when removed or when the whole
/// scenario is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    /// Catalog item id this line refers to.
    pub item_id: String,

    /// Item name at time of selection (frozen).
    pub name: String,

    /// Unit label at time of selection (frozen).
    pub unit_label: String,

    /// Billing frequency at time of selection (frozen).
    pub billing_frequency: BillingFrequency,

    /// Pricing mode at time of selection (frozen).
    pub pricing_mode: PricingMode,

    /// Unit price in cents at time of selection (frozen; may diverge from
    /// the catalog default after admin edits).
    pub unit_price_cents: i64,

    /// Tier schedule at time of selection (frozen; empty when simple).
    pub tiers: Vec<PricingTier>,

    /// Line quantity.
    pub quantity: i64,

    /// Per-line discount settings.
    pub discount: LineDiscount,

    /// Free flag: the line prices at zero regardless of other fields.
    pub is_free: bool,

    /// Manual pick vs. rule-engine insertion.
    pub source: SelectionSource,

    /// When this line was added to the quote.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl SelectedItem {
    /// Creates a selected line from a catalog item, freezing its pricing.
    pub fn from_item(item: &PricingItem, quantity: i64, source: SelectionSource) -> Self {
        SelectedItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_label: item.unit_label.clone(),
            billing_frequency: item.billing_frequency,
            pricing_mode: item.pricing_mode,
            unit_price_cents: item.unit_price_cents,
            tiers: item.tiers.clone(),
            quantity,
            discount: LineDiscount::None,
            is_free: false,
            source,
            added_at: Utc::now(),
        }
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Per-tier breakdown of this line for display.
    ///
    /// Empty for simple lines and for non-positive quantities.
    pub fn active_tiers(&self) -> Vec<ActiveTier> {
        match self.pricing_mode {
            PricingMode::Simple => Vec::new(),
            PricingMode::Tiered => resolve_tiers(self.quantity, &self.tiers),
        }
    }
}

// =============================================================================
// Scenario
// =============================================================================

/// A saved snapshot of a user's configuration, selections, and computed
/// summary. Persisted and shared as JSON by the surrounding layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioData {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// User-chosen scenario name.
    pub name: String,

    /// The client configuration at save time.
    pub config: crate::config::ClientConfig,

    /// All selected lines at save time.
    pub items: Vec<SelectedItem>,

    /// Global discount settings at save time.
    pub global_discount: GlobalDiscount,

    /// The computed summary at save time (denormalized for list views;
    /// recomputed from config + items when the scenario is reopened).
    pub summary: crate::pricing::FeeSummary,

    /// When the scenario was first saved.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the scenario was last saved.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_frequency_from_unit_label() {
        assert_eq!(
            BillingFrequency::from_unit_label("setup", "per project"),
            BillingFrequency::OneTime
        );
        assert_eq!(
            BillingFrequency::from_unit_label("issuance", "one-time"),
            BillingFrequency::OneTime
        );
        assert_eq!(
            BillingFrequency::from_unit_label("support", "per change"),
            BillingFrequency::OneTime
        );
        assert_eq!(
            BillingFrequency::from_unit_label("processing", "per transaction"),
            BillingFrequency::Monthly
        );
    }

    #[test]
    fn test_mapping_builders() {
        let mapping = ServiceMapping::new("item-1", "monthly_cards", TriggerCondition::Number)
            .with_auto_add()
            .with_sync_quantity()
            .with_multiplier(2);

        assert!(mapping.auto_add);
        assert!(mapping.sync_quantity);
        assert_eq!(mapping.quantity_multiplier, 2);
    }

    #[test]
    fn test_line_discount_default() {
        assert_eq!(LineDiscount::default(), LineDiscount::None);
    }

    #[test]
    fn test_global_discount_default_disabled() {
        let discount = GlobalDiscount::default();
        assert_eq!(discount.scope, DiscountScope::None);
    }
}
