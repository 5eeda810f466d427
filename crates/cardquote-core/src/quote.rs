//! # Quote State
//!
//! The working quote: client configuration, selected lines, and global
//! discount settings, with every mutation the configurator performs.
//!
//! ## Quote Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quote State Operations                               │
//! │                                                                         │
//! │  Frontend Action          Quote Method            State Change          │
//! │  ───────────────          ────────────            ────────────          │
//! │                                                                         │
//! │  Pick Service ───────────► add_item() ──────────► items.push(line)     │
//! │                                                                         │
//! │  Edit Volume Field ──────► set_config_value()                           │
//! │                            + apply_mappings() ──► auto-add/sync pass    │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► items[i].qty = n     │
//! │                                                                         │
//! │  Set Discount ───────────► set_line_discount() ─► items[i].discount    │
//! │                                                                         │
//! │  View Summary ───────────► summarize() ─────────► (read only)          │
//! │                                                                         │
//! │  Every edit is followed by a rule pass and a fresh summarize();         │
//! │  both are pure and cheap (tens of items, a handful of tiers each).      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{ClientConfig, ConfigValue};
use crate::error::{CoreError, CoreResult};
use crate::pricing::{summarize, FeeSummary};
use crate::rules;
use crate::types::{
    GlobalDiscount, LineDiscount, PricingItem, SelectedItem, SelectionSource, ServiceMapping,
};
use crate::validation;
use crate::{MAX_ITEM_QUANTITY, MAX_SELECTED_ITEMS};

// =============================================================================
// Quote
// =============================================================================

/// The user's working quote.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item bumps quantity)
/// - Quantity is > 0 (updating to 0 removes the line)
/// - Maximum distinct lines: [`MAX_SELECTED_ITEMS`]
/// - Maximum quantity per line: [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Client configuration driving rules and identification.
    pub config: ClientConfig,

    /// Selected lines.
    pub items: Vec<SelectedItem>,

    /// Global discount settings.
    pub global_discount: GlobalDiscount,

    /// When the quote was created/last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Creates an empty quote for a client configuration.
    pub fn new(config: ClientConfig) -> Self {
        Quote {
            config,
            items: Vec::new(),
            global_discount: GlobalDiscount::none(),
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Selection Edits
    // -------------------------------------------------------------------------

    /// Adds a catalog item to the quote or bumps its quantity if present.
    ///
    /// Manual adds only; the rule engine inserts its own lines through
    /// [`Quote::apply_mappings`].
    pub fn add_item(&mut self, item: &PricingItem, quantity: i64) -> CoreResult<()> {
        validation::validate_quantity(quantity)?;

        if let Some(line) = self.items.iter_mut().find(|s| s.item_id == item.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        validation::validate_selection_size(self.items.len())
            .map_err(|_| CoreError::SelectionTooLarge {
                max: MAX_SELECTED_ITEMS,
            })?;

        self.items
            .push(SelectedItem::from_item(item, quantity, SelectionSource::Manual));
        Ok(())
    }

    /// Updates the quantity of a line.
    ///
    /// ## Behavior
    /// - Quantity 0 removes the line
    /// - Lines pinned by a quantity-sync mapping reject manual edits
    ///   ([`CoreError::QuantitySynced`]); the next rule pass would overwrite
    ///   them anyway
    pub fn update_quantity(
        &mut self,
        item_id: &str,
        quantity: i64,
        mappings: &[ServiceMapping],
    ) -> CoreResult<()> {
        if let Some(mapping) = mappings
            .iter()
            .find(|m| m.sync_quantity && m.item_id == item_id)
        {
            return Err(CoreError::QuantitySynced {
                item_id: item_id.to_string(),
                config_field: mapping.config_field.clone(),
            });
        }

        if quantity == 0 {
            return self.remove_item(item_id);
        }

        validation::validate_quantity(quantity)?;

        let line = self.line_mut(item_id)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Sets the per-line discount of a line.
    pub fn set_line_discount(&mut self, item_id: &str, discount: LineDiscount) -> CoreResult<()> {
        validation::validate_line_discount(&discount)?;

        let line = self.line_mut(item_id)?;
        line.discount = discount;
        Ok(())
    }

    /// Sets or clears the free flag of a line.
    pub fn set_free(&mut self, item_id: &str, is_free: bool) -> CoreResult<()> {
        let line = self.line_mut(item_id)?;
        line.is_free = is_free;
        Ok(())
    }

    /// Removes a line from the quote by item id.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|s| s.item_id != item_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInQuote(item_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines and resets the global discount. The client
    /// configuration survives a clear.
    pub fn clear(&mut self) {
        self.items.clear();
        self.global_discount = GlobalDiscount::none();
        self.created_at = Utc::now();
    }

    // -------------------------------------------------------------------------
    // Configuration Edits
    // -------------------------------------------------------------------------

    /// Sets a configuration field value. Callers run
    /// [`Quote::apply_mappings`] afterwards to recompute auto-added lines.
    pub fn set_config_value(
        &mut self,
        field_id: &str,
        value: ConfigValue,
    ) -> CoreResult<()> {
        validation::validate_config_field_id(field_id)?;
        self.config.set(field_id, value);
        Ok(())
    }

    /// Clears a configuration field value.
    pub fn clear_config_value(&mut self, field_id: &str) {
        self.config.clear(field_id);
    }

    /// Sets the global discount.
    pub fn set_global_discount(&mut self, discount: GlobalDiscount) -> CoreResult<()> {
        validation::validate_global_discount(&discount)?;
        self.global_discount = discount;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Recomputation
    // -------------------------------------------------------------------------

    /// Runs a rule-engine pass against the current configuration.
    ///
    /// See [`crate::rules::apply_mappings`] for the pass semantics.
    pub fn apply_mappings(&mut self, mappings: &[ServiceMapping], catalog: &[PricingItem]) {
        rules::apply_mappings(&mut self.items, &self.config, mappings, catalog);
    }

    /// Computes the fee summary for the current state.
    pub fn summarize(&self) -> FeeSummary {
        summarize(&self.items, &self.global_discount)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the number of distinct lines in the quote.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|s| s.quantity).sum()
    }

    /// Checks if the quote has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_mut(&mut self, item_id: &str) -> CoreResult<&mut SelectedItem> {
        self.items
            .iter_mut()
            .find(|s| s.item_id == item_id)
            .ok_or_else(|| CoreError::ItemNotInQuote(item_id.to_string()))
    }
}

// =============================================================================
// Quote Totals DTO
// =============================================================================

/// Compact quote figures for API responses and list views.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub one_time_total_cents: i64,
    pub monthly_total_cents: i64,
    pub yearly_total_cents: i64,
    pub total_project_cost_cents: i64,
}

impl From<&Quote> for QuoteTotals {
    fn from(quote: &Quote) -> Self {
        let summary = quote.summarize();
        QuoteTotals {
            item_count: quote.item_count(),
            total_quantity: quote.total_quantity(),
            one_time_total_cents: summary.one_time_total_cents,
            monthly_total_cents: summary.monthly_total_cents,
            yearly_total_cents: summary.yearly_total_cents,
            total_project_cost_cents: summary.total_project_cost_cents,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillingFrequency, DiscountScope, PricingMode, TriggerCondition};

    fn test_item(id: &str, price_cents: i64, freq: BillingFrequency) -> PricingItem {
        PricingItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            description: None,
            category_id: "issuance".to_string(),
            unit_label: "per card".to_string(),
            billing_frequency: freq,
            pricing_mode: PricingMode::Simple,
            unit_price_cents: price_cents,
            tiers: Vec::new(),
            tags: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sync_version: 0,
        }
    }

    fn empty_quote() -> Quote {
        Quote::new(ClientConfig::new("Acme Bank", "Debit Launch"))
    }

    #[test]
    fn test_add_item() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);

        quote.add_item(&item, 2).unwrap();

        assert_eq!(quote.item_count(), 1);
        assert_eq!(quote.total_quantity(), 2);
        assert_eq!(quote.summarize().monthly_total_cents, 1998);
    }

    #[test]
    fn test_add_same_item_bumps_quantity() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);

        quote.add_item(&item, 2).unwrap();
        quote.add_item(&item, 3).unwrap();

        assert_eq!(quote.item_count(), 1); // Still one distinct line
        assert_eq!(quote.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_invalid_quantity() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);

        assert!(quote.add_item(&item, 0).is_err());
        assert!(quote.add_item(&item, -5).is_err());
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);

        quote.add_item(&item, 2).unwrap();
        quote.update_quantity("1", 0, &[]).unwrap();

        assert!(quote.is_empty());
    }

    #[test]
    fn test_update_quantity_rejects_synced_line() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);
        quote.add_item(&item, 2).unwrap();

        let mappings = vec![ServiceMapping::new("1", "monthly_cards", TriggerCondition::Number)
            .with_sync_quantity()];

        let err = quote.update_quantity("1", 10, &mappings).unwrap_err();
        assert!(matches!(err, CoreError::QuantitySynced { .. }));
        assert_eq!(quote.items[0].quantity, 2);
    }

    #[test]
    fn test_set_line_discount_validates() {
        let mut quote = empty_quote();
        let item = test_item("1", 1000, BillingFrequency::Monthly);
        quote.add_item(&item, 5).unwrap();

        quote
            .set_line_discount("1", LineDiscount::Percentage { bps: 2000 })
            .unwrap();
        assert_eq!(quote.summarize().monthly_total_cents, 4000);

        // >100% never reaches the calculator
        assert!(quote
            .set_line_discount("1", LineDiscount::Percentage { bps: 20_000 })
            .is_err());
    }

    #[test]
    fn test_set_free() {
        let mut quote = empty_quote();
        let item = test_item("1", 1000, BillingFrequency::Monthly);
        quote.add_item(&item, 5).unwrap();

        quote.set_free("1", true).unwrap();
        assert_eq!(quote.summarize().monthly_total_cents, 0);
    }

    #[test]
    fn test_remove_missing_item_errors() {
        let mut quote = empty_quote();
        assert!(matches!(
            quote.remove_item("ghost"),
            Err(CoreError::ItemNotInQuote(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut quote = empty_quote();
        let item = test_item("1", 999, BillingFrequency::Monthly);

        quote.add_item(&item, 2).unwrap();
        quote
            .set_global_discount(GlobalDiscount::percentage(1000, DiscountScope::Both))
            .unwrap();
        quote.clear();

        assert!(quote.is_empty());
        assert_eq!(quote.global_discount.scope, DiscountScope::None);
        // Client identification survives
        assert_eq!(quote.config.client_name, "Acme Bank");
    }

    #[test]
    fn test_config_edit_plus_rule_pass_auto_adds() {
        let mut quote = empty_quote();
        let catalog = vec![test_item("card-issuance", 250, BillingFrequency::Monthly)];
        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        quote
            .set_config_value("has_debit_cards", ConfigValue::Bool(true))
            .unwrap();
        quote.apply_mappings(&mappings, &catalog);
        assert_eq!(quote.item_count(), 1);

        quote
            .set_config_value("has_debit_cards", ConfigValue::Bool(false))
            .unwrap();
        quote.apply_mappings(&mappings, &catalog);
        assert!(quote.is_empty());
    }

    #[test]
    fn test_quote_totals_dto() {
        let mut quote = empty_quote();
        quote
            .add_item(&test_item("1", 50_000, BillingFrequency::OneTime), 1)
            .unwrap();
        quote
            .add_item(&test_item("2", 100_000, BillingFrequency::Monthly), 1)
            .unwrap();

        let totals = QuoteTotals::from(&quote);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.one_time_total_cents, 50_000);
        assert_eq!(totals.monthly_total_cents, 100_000);
        assert_eq!(totals.yearly_total_cents, 1_200_000);
        assert_eq!(totals.total_project_cost_cents, 1_250_000);
    }
}
