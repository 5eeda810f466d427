//! # Auto-Add / Quantity-Sync Rule Engine
//!
//! Keeps the quote's selection consistent with the client configuration.
//!
//! ## Rule Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 One Rule-Engine Pass (per config edit)                  │
//! │                                                                         │
//! │  for each ServiceMapping:                                               │
//! │                                                                         │
//! │    trigger fires?  ──┬── yes ──► auto_add & item absent?                │
//! │                      │            └── insert SelectedItem (AutoAdded)   │
//! │                      │                                                  │
//! │                      └── no  ──► item present & AutoAdded?              │
//! │                                   └── remove it                         │
//! │                                   (Manual items are NEVER removed)      │
//! │                                                                         │
//! │    sync_quantity? ──► pin quantity = field value × multiplier           │
//! │                       (overrides manual quantity edits)                 │
//! │                                                                         │
//! │  Idempotent: a second pass with unchanged inputs changes nothing,       │
//! │  and never touches discounts, free flags, or manual quantities of       │
//! │  non-synced lines.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::config::{ClientConfig, ConfigValue};
use crate::types::{
    PricingItem, SelectedItem, SelectionSource, ServiceMapping, TriggerCondition,
};

// =============================================================================
// Trigger Evaluation
// =============================================================================

/// Whether a mapping's configuration field currently fires.
///
/// Exhaustive over [`ConfigValue`]: a boolean trigger only fires on
/// `Bool(true)`, a number trigger only on a positive `Number`. A missing
/// field never fires.
pub fn trigger_fires(mapping: &ServiceMapping, config: &ClientConfig) -> bool {
    let Some(value) = config.get(&mapping.config_field) else {
        return false;
    };

    match (mapping.trigger, value) {
        (TriggerCondition::Boolean, ConfigValue::Bool(enabled)) => *enabled,
        (TriggerCondition::Number, ConfigValue::Number(n)) => *n > 0,
        // Field holds a different kind than the mapping expects: never fire
        // rather than guess.
        _ => false,
    }
}

/// The quantity a sync mapping pins its item to, if the field carries one.
///
/// `field value × quantity_multiplier`, never below zero.
pub fn synced_quantity(mapping: &ServiceMapping, config: &ClientConfig) -> Option<i64> {
    let value = config.get(&mapping.config_field)?;
    let base = value.as_quantity()?;
    Some((base * mapping.quantity_multiplier).max(0))
}

/// Whether any mapping pins this item's quantity to a configuration field.
///
/// The quote container uses this to refuse manual quantity edits that the
/// next rule pass would overwrite anyway.
pub fn is_quantity_synced(mappings: &[ServiceMapping], item_id: &str) -> bool {
    mappings
        .iter()
        .any(|m| m.sync_quantity && m.item_id == item_id)
}

// =============================================================================
// Rule Pass
// =============================================================================

/// Runs one rule pass over a selection, in place.
///
/// For every mapping:
/// - `auto_add` + trigger fires + item absent → insert a [`SelectedItem`]
///   from the catalog defaults, `source = AutoAdded`, quantity 1 (or the
///   synced quantity when the mapping also syncs).
/// - `auto_add` + trigger cleared + item present and auto-added → remove.
///   Manually added items are never auto-removed.
/// - `sync_quantity` + item present → pin the quantity.
///
/// Mappings pointing at items missing from (or inactive in) the catalog are
/// skipped; the catalog may lag behind mapping edits and a rule pass must
/// never fail a recomputation.
pub fn apply_mappings(
    selection: &mut Vec<SelectedItem>,
    config: &ClientConfig,
    mappings: &[ServiceMapping],
    catalog: &[PricingItem],
) {
    for mapping in mappings {
        let fires = trigger_fires(mapping, config);
        let position = selection.iter().position(|s| s.item_id == mapping.item_id);

        if mapping.auto_add {
            match (fires, position) {
                (true, None) => {
                    let Some(item) = catalog
                        .iter()
                        .find(|i| i.id == mapping.item_id && i.is_active)
                    else {
                        continue;
                    };

                    let quantity = if mapping.sync_quantity {
                        synced_quantity(mapping, config).unwrap_or(1)
                    } else {
                        1
                    };

                    selection.push(SelectedItem::from_item(
                        item,
                        quantity,
                        SelectionSource::AutoAdded,
                    ));
                }
                (false, Some(idx)) if selection[idx].source == SelectionSource::AutoAdded => {
                    selection.remove(idx);
                }
                _ => {}
            }
        }

        if mapping.sync_quantity {
            if let Some(line) = selection
                .iter_mut()
                .find(|s| s.item_id == mapping.item_id)
            {
                if let Some(quantity) = synced_quantity(mapping, config) {
                    line.quantity = quantity;
                }
            }
        }
    }
}

/// Derives the selection a fresh quote would carry for this configuration.
///
/// Equivalent to a rule pass over an empty selection; exists for callers
/// that want the auto-added lines without a quote container.
pub fn derive_auto_added_items(
    config: &ClientConfig,
    mappings: &[ServiceMapping],
    catalog: &[PricingItem],
) -> Vec<SelectedItem> {
    let mut selection = Vec::new();
    apply_mappings(&mut selection, config, mappings, catalog);
    selection
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillingFrequency, LineDiscount, PricingMode};
    use chrono::Utc;

    fn catalog_item(id: &str, price_cents: i64) -> PricingItem {
        PricingItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            description: None,
            category_id: "issuance".to_string(),
            unit_label: "per card".to_string(),
            billing_frequency: BillingFrequency::Monthly,
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

    fn bool_config(field: &str, value: bool) -> ClientConfig {
        let mut config = ClientConfig::new("Acme Bank", "Debit Launch");
        config.set(field, ConfigValue::Bool(value));
        config
    }

    #[test]
    fn test_boolean_trigger() {
        let mapping =
            ServiceMapping::new("card-issuance", "has_debit_cards", TriggerCondition::Boolean);

        assert!(trigger_fires(&mapping, &bool_config("has_debit_cards", true)));
        assert!(!trigger_fires(&mapping, &bool_config("has_debit_cards", false)));
        assert!(!trigger_fires(&mapping, &ClientConfig::default()));
    }

    #[test]
    fn test_number_trigger() {
        let mapping = ServiceMapping::new("processing", "monthly_tx", TriggerCondition::Number);

        let mut config = ClientConfig::default();
        config.set("monthly_tx", ConfigValue::Number(500));
        assert!(trigger_fires(&mapping, &config));

        config.set("monthly_tx", ConfigValue::Number(0));
        assert!(!trigger_fires(&mapping, &config));

        config.set("monthly_tx", ConfigValue::Number(-3));
        assert!(!trigger_fires(&mapping, &config));
    }

    #[test]
    fn test_kind_mismatch_never_fires() {
        let mapping = ServiceMapping::new("processing", "monthly_tx", TriggerCondition::Number);
        let mut config = ClientConfig::default();
        config.set("monthly_tx", ConfigValue::Text("lots".into()));
        assert!(!trigger_fires(&mapping, &config));
    }

    #[test]
    fn test_auto_add_inserts_and_clears() {
        let catalog = vec![catalog_item("card-issuance", 250)];
        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        // Field true → item appears with quantity 1
        let mut selection = Vec::new();
        apply_mappings(
            &mut selection,
            &bool_config("has_debit_cards", true),
            &mappings,
            &catalog,
        );
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].quantity, 1);
        assert_eq!(selection[0].source, SelectionSource::AutoAdded);

        // Field back to false → auto-added item is removed
        apply_mappings(
            &mut selection,
            &bool_config("has_debit_cards", false),
            &mappings,
            &catalog,
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn test_manual_items_never_auto_removed() {
        let catalog = vec![catalog_item("card-issuance", 250)];
        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        let mut selection = vec![SelectedItem::from_item(
            &catalog[0],
            3,
            SelectionSource::Manual,
        )];

        apply_mappings(
            &mut selection,
            &bool_config("has_debit_cards", false),
            &mappings,
            &catalog,
        );
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].quantity, 3);
    }

    #[test]
    fn test_quantity_sync_with_multiplier() {
        let catalog = vec![catalog_item("statements", 10)];
        let mappings = vec![ServiceMapping::new(
            "statements",
            "monthly_active_cards",
            TriggerCondition::Number,
        )
        .with_auto_add()
        .with_sync_quantity()
        .with_multiplier(2)];

        let mut config = ClientConfig::default();
        config.set("monthly_active_cards", ConfigValue::Number(500));

        let mut selection = Vec::new();
        apply_mappings(&mut selection, &config, &mappings, &catalog);
        assert_eq!(selection[0].quantity, 1000);

        // Field edit re-pins the quantity, even over a manual edit
        selection[0].quantity = 7;
        config.set("monthly_active_cards", ConfigValue::Number(800));
        apply_mappings(&mut selection, &config, &mappings, &catalog);
        assert_eq!(selection[0].quantity, 1600);
    }

    #[test]
    fn test_idempotent_pass_preserves_manual_fields() {
        let catalog = vec![catalog_item("card-issuance", 250)];
        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];
        let config = bool_config("has_debit_cards", true);

        let mut selection = Vec::new();
        apply_mappings(&mut selection, &config, &mappings, &catalog);

        // User then discounts the auto-added line and re-runs the pass.
        selection[0].discount = LineDiscount::Percentage { bps: 1500 };
        selection[0].quantity = 4;
        let before = selection.clone();

        apply_mappings(&mut selection, &config, &mappings, &catalog);
        assert_eq!(selection, before);
    }

    #[test]
    fn test_mapping_to_missing_catalog_item_is_skipped() {
        let mappings = vec![ServiceMapping::new(
            "ghost-item",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        let mut selection = Vec::new();
        apply_mappings(
            &mut selection,
            &bool_config("has_debit_cards", true),
            &mappings,
            &[],
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn test_inactive_catalog_item_not_auto_added() {
        let mut item = catalog_item("card-issuance", 250);
        item.is_active = false;

        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        let mut selection = Vec::new();
        apply_mappings(
            &mut selection,
            &bool_config("has_debit_cards", true),
            &mappings,
            &[item],
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn test_derive_auto_added_items() {
        let catalog = vec![catalog_item("card-issuance", 250)];
        let mappings = vec![ServiceMapping::new(
            "card-issuance",
            "has_debit_cards",
            TriggerCondition::Boolean,
        )
        .with_auto_add()];

        let derived = derive_auto_added_items(
            &bool_config("has_debit_cards", true),
            &mappings,
            &catalog,
        );
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].item_id, "card-issuance");
    }

    #[test]
    fn test_is_quantity_synced() {
        let mappings = vec![
            ServiceMapping::new("a", "f1", TriggerCondition::Number).with_sync_quantity(),
            ServiceMapping::new("b", "f2", TriggerCondition::Boolean),
        ];

        assert!(is_quantity_synced(&mappings, "a"));
        assert!(!is_quantity_synced(&mappings, "b"));
        assert!(!is_quantity_synced(&mappings, "c"));
    }
}
