//! # Client Configuration
//!
//! The user's input parameters: client/project identification plus a map of
//! configuration-field-id → typed value.
//!
//! ## Why a Tagged Union?
//! The configurator frontend works with a loose `Record<string, value>`.
//! On this side every value carries its kind, so the rule engine's
//! trigger-condition evaluation is an exhaustive `match`, not a runtime
//! `typeof` branch that silently misfires on an unexpected shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

// =============================================================================
// Config Value
// =============================================================================

/// A single configuration field value.
///
/// ## Examples
/// - `has_debit_cards: Bool(true)`
/// - `monthly_active_cards: Number(25_000)`
/// - `card_network: Text("visa")`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    /// A toggle (e.g. "do you issue debit cards?").
    Bool(bool),

    /// A volume or count (e.g. cards issued per month).
    Number(i64),

    /// Free-form text (e.g. BIN sponsor name). Never drives pricing rules
    /// directly; carried for scenario persistence and display.
    Text(String),
}

impl ConfigValue {
    /// Interprets the value as a quantity for quantity-sync mappings.
    ///
    /// - `Number(n)` → `n`
    /// - `Bool(true)` → 1, `Bool(false)` → 0
    /// - `Text(_)` → no quantity
    pub fn as_quantity(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Bool(true) => Some(1),
            ConfigValue::Bool(false) => Some(0),
            ConfigValue::Text(_) => None,
        }
    }
}

// =============================================================================
// Client Config
// =============================================================================

/// The client's quote parameters.
///
/// Mutated continuously as the user edits the configurator form; scoped to
/// one browsing session or a persisted scenario.
///
/// ## Field Map Ordering
/// `BTreeMap` keeps field iteration deterministic, which keeps rule-engine
/// passes and serialized scenarios byte-stable for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Client (issuer) name shown on the quote.
    pub client_name: String,

    /// Project or program name shown on the quote.
    pub project_name: String,

    /// Configuration field id → typed value.
    pub fields: BTreeMap<String, ConfigValue>,
}

impl ClientConfig {
    /// Creates an empty config for a named client/project.
    pub fn new(client_name: impl Into<String>, project_name: impl Into<String>) -> Self {
        ClientConfig {
            client_name: client_name.into(),
            project_name: project_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the value of a configuration field, if set.
    pub fn get(&self, field_id: &str) -> Option<&ConfigValue> {
        self.fields.get(field_id)
    }

    /// Sets a configuration field value.
    pub fn set(&mut self, field_id: impl Into<String>, value: ConfigValue) {
        self.fields.insert(field_id.into(), value);
    }

    /// Clears a configuration field. Auto-added items mapped to the field
    /// are removed on the next rule-engine pass.
    pub fn clear(&mut self, field_id: &str) -> Option<ConfigValue> {
        self.fields.remove(field_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_quantity() {
        assert_eq!(ConfigValue::Number(25_000).as_quantity(), Some(25_000));
        assert_eq!(ConfigValue::Bool(true).as_quantity(), Some(1));
        assert_eq!(ConfigValue::Bool(false).as_quantity(), Some(0));
        assert_eq!(ConfigValue::Text("visa".into()).as_quantity(), None);
    }

    #[test]
    fn test_config_set_get_clear() {
        let mut config = ClientConfig::new("Acme Bank", "Debit Launch");
        config.set("has_debit_cards", ConfigValue::Bool(true));

        assert_eq!(
            config.get("has_debit_cards"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(config.get("missing"), None);

        config.clear("has_debit_cards");
        assert_eq!(config.get("has_debit_cards"), None);
    }

    #[test]
    fn test_serde_tagged_shape() {
        let value = ConfigValue::Number(42);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":42}"#);
    }
}
