//! # cardquote-core: Pure Pricing Engine for cardquote
//!
//! This crate is the **heart** of cardquote. It contains the pricing
//! calculation engine for the card-services quote configurator as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      cardquote Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Configurator Frontend (TypeScript)              │   │
//! │  │    Config Form ──► Item Picker ──► Discounts ──► Summary        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cardquote-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tiers   │  │  pricing  │  │   rules   │  │   quote   │  │   │
//! │  │   │ graduated │  │ discounts │  │ auto-add  │  │ selection │  │   │
//! │  │   │ schedules │  │ summaries │  │ qty-sync  │  │ container │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  cardquote-db (Database Layer)                  │   │
//! │  │        SQLite catalog + saved scenarios, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PricingItem, SelectedItem, discounts, etc.)
//! - [`config`] - Client configuration values (typed, not stringly)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tiers`] - Graduated tier resolution
//! - [`pricing`] - Line totals and the aggregate fee summary
//! - [`rules`] - Auto-add / quantity-sync rule engine
//! - [`quote`] - The working quote (selection state container)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every calculation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use cardquote_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let unit_price = Money::from_cents(250); // $2.50 per card
//!
//! // A percentage discount in basis points (2000 = 20%)
//! let line = unit_price.multiply_quantity(100);
//! let discounted = line.apply_percentage_discount(2000);
//!
//! assert_eq!(discounted.cents(), 20_000); // $250.00 -> $200.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod rules;
pub mod tiers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cardquote_core::Money` instead of
// `use cardquote_core::money::Money`

pub use config::{ClientConfig, ConfigValue};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{summarize, FeeSummary, LineBreakdown};
pub use quote::{Quote, QuoteTotals};
pub use tiers::{resolve_tiers, ActiveTier};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct items allowed in a single quote.
///
/// ## Business Reason
/// The catalog itself holds tens of items; a selection larger than this is
/// always a frontend bug, not a real quote.
pub const MAX_SELECTED_ITEMS: usize = 100;

/// Maximum quantity of a single line in a quote.
///
/// ## Business Reason
/// Card volumes are entered by hand; this caps obvious typos
/// (e.g. 10,000,000,000 cards) while still covering large issuers.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000_000;

/// Months per year used to annualize recurring totals.
pub const MONTHS_PER_YEAR: i64 = 12;
