//! # Error Types
//!
//! Domain-specific error types for cardquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cardquote-core errors (this file)                                      │
//! │  ├── CoreError        - Quote/catalog domain errors                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  cardquote-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → API layer → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, field, bounds)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core quote-engine errors.
///
/// These errors represent business rule violations. They should be caught
/// by the surrounding layer and translated to user-friendly messages; the
/// pure calculation functions themselves never produce them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog item cannot be found (or is soft-deleted).
    #[error("Pricing item not found: {0}")]
    ItemNotFound(String),

    /// The quote holds no line for this item.
    #[error("Item {0} is not in the quote")]
    ItemNotInQuote(String),

    /// Quote has exceeded maximum allowed distinct lines.
    #[error("Quote cannot have more than {max} items")]
    SelectionTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Manual quantity edit on a line whose quantity is pinned to a
    /// configuration field by a quantity-sync mapping.
    #[error("Quantity of item {item_id} is synced to configuration field {config_field}")]
    QuantitySynced {
        item_id: String,
        config_field: String,
    },

    /// A tier schedule violates the schedule invariants.
    ///
    /// ## When This Occurs
    /// - Overlapping or non-contiguous tier windows
    /// - Final tier is bounded (no unbounded catch-all)
    /// Caught at catalog-definition time, never during quote calculation.
    #[error("Invalid tier schedule for item {item_id}: {reason}")]
    InvalidTierSchedule { item_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user or admin input doesn't meet requirements.
/// Used for early validation before quote operations run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid field id charset).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Tier schedule invariant broken.
    #[error("tier schedule invalid: {reason}")]
    InvalidTierSchedule { reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantitySynced {
            item_id: "card-issuance".to_string(),
            config_field: "monthly_active_cards".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Quantity of item card-issuance is synced to configuration field monthly_active_cards"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidTierSchedule {
            reason: "final tier must be unbounded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tier schedule invalid: final tier must be unbounded"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
