//! # Validation Module
//!
//! Input validation utilities for cardquote.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API boundary (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  The calculation functions themselves never validate: malformed       │
//! │  numeric input (negative quantity, >100% discount) is rejected here,  │
//! │  before it can reach the pure pricing math.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{GlobalDiscount, GlobalDiscountKind, LineDiscount, PricingTier};
use crate::{MAX_ITEM_QUANTITY, MAX_SELECTED_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a unit label ("per card", "one-time", ...).
///
/// ## Rules
/// - Must not be empty
/// - Maximum 50 characters
pub fn validate_unit_label(label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "unit_label".to_string(),
        });
    }

    if label.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "unit_label".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a configuration field id.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 100 characters
/// - Alphanumeric, hyphens, underscores only (field ids double as JSON keys
///   and database values; no surprises allowed)
pub fn validate_config_field_id(field_id: &str) -> ValidationResult<()> {
    let field_id = field_id.trim();

    if field_id.is_empty() {
        return Err(ValidationError::Required {
            field: "config_field".to_string(),
        });
    }

    if field_id.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "config_field".to_string(),
            max: 100,
        });
    }

    if !field_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "config_field".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free catalog entries)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a quantity-sync multiplier.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_multiplier(multiplier: i64) -> ValidationResult<()> {
    if multiplier < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_multiplier".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Discount Validators
// =============================================================================

/// Validates per-line discount settings.
///
/// ## Rules
/// - Percentage: 0 to 10000 bps (0% to 100%)
/// - Fixed: non-negative amount
pub fn validate_line_discount(discount: &LineDiscount) -> ValidationResult<()> {
    match discount {
        LineDiscount::None => Ok(()),
        LineDiscount::Percentage { bps } => validate_percentage_bps(*bps),
        LineDiscount::Fixed { amount_cents, .. } => validate_discount_amount(*amount_cents),
    }
}

/// Validates global discount settings, same numeric rules as per-line.
pub fn validate_global_discount(discount: &GlobalDiscount) -> ValidationResult<()> {
    match discount.kind {
        GlobalDiscountKind::Percentage { bps } => validate_percentage_bps(bps),
        GlobalDiscountKind::Fixed { amount_cents } => validate_discount_amount(amount_cents),
    }
}

fn validate_percentage_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

fn validate_discount_amount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Tier Schedule Validator
// =============================================================================

/// Validates a graduated tier schedule at catalog-definition time.
///
/// ## Rules
/// - At least one tier
/// - First tier starts at quantity 1
/// - Ascending, non-overlapping, contiguous windows (each tier starts
///   exactly one past the previous tier's max)
/// - Only the last tier may be unbounded, and the last tier MUST be
///   unbounded (every possible quantity is covered; the resolver never
///   needs a runtime fallback for validated schedules)
/// - Non-negative unit prices
pub fn validate_tier_schedule(tiers: &[PricingTier]) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidTierSchedule {
        reason: reason.to_string(),
    };

    let Some(first) = tiers.first() else {
        return Err(invalid("schedule must have at least one tier"));
    };

    if first.min_quantity != 1 {
        return Err(invalid("first tier must start at quantity 1"));
    }

    for window in tiers.windows(2) {
        let (prev, next) = (&window[0], &window[1]);

        let Some(prev_max) = prev.max_quantity else {
            return Err(invalid("only the last tier may be unbounded"));
        };

        if prev_max < prev.min_quantity {
            return Err(invalid("tier max must not precede its min"));
        }

        if next.min_quantity != prev_max + 1 {
            return Err(invalid("tiers must be contiguous and non-overlapping"));
        }
    }

    // tiers.first() succeeded above, so last() is present
    if let Some(last) = tiers.last() {
        if last.max_quantity.is_some() {
            return Err(invalid("final tier must be unbounded"));
        }
    }

    for tier in tiers {
        if tier.unit_price_cents < 0 {
            return Err(invalid("tier unit price must be non-negative"));
        }
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates quote size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_SELECTED_ITEMS
pub fn validate_selection_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_SELECTED_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "selected items".to_string(),
            min: 0,
            max: MAX_SELECTED_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
