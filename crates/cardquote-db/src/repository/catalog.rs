//! # Catalog Repository
//!
//! Database operations for the pricing catalog: items, their tier
//! schedules, and the auto-add/quantity-sync mappings.
//!
//! ## Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a PricingItem Is Assembled                       │
//! │                                                                         │
//! │  pricing_items row ──────────────┐                                     │
//! │   (name, mode, price, tags JSON) │                                     │
//! │                                  ├──► PricingItem                      │
//! │  pricing_tiers rows ─────────────┘     ├── tiers: Vec<PricingTier>     │
//! │   (ordered by min_quantity)            └── tags: Vec<String>           │
//! │                                                                         │
//! │  service_mappings rows ────────────► Vec<ServiceMapping> (separate;    │
//! │                                       the rule engine takes them       │
//! │                                       alongside the catalog)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier schedules are validated on the write path (`replace_tiers`), so the
//! read path can assemble rows without re-checking invariants.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cardquote_core::validation::validate_tier_schedule;
use cardquote_core::{
    BillingFrequency, PricingItem, PricingMode, PricingTier, ServiceMapping, TriggerCondition,
};

// =============================================================================
// Row Types
// =============================================================================
// Runtime-checked queries with FromRow structs; JSON columns land as TEXT
// and are decoded during assembly.

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    description: Option<String>,
    category_id: String,
    unit_label: String,
    billing_frequency: BillingFrequency,
    pricing_mode: PricingMode,
    unit_price_cents: i64,
    tags: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    sync_version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TierRow {
    id: String,
    item_id: String,
    name: String,
    min_quantity: i64,
    max_quantity: Option<i64>,
    unit_price_cents: i64,
    description: Option<String>,
    config_field: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    item_id: String,
    config_field: String,
    trigger_condition: TriggerCondition,
    auto_add: bool,
    sync_quantity: bool,
    quantity_multiplier: i64,
}

impl ItemRow {
    fn into_item(self, tiers: Vec<PricingTier>) -> DbResult<PricingItem> {
        let tags: Vec<String> = serde_json::from_str(&self.tags)?;

        Ok(PricingItem {
            id: self.id,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            unit_label: self.unit_label,
            billing_frequency: self.billing_frequency,
            pricing_mode: self.pricing_mode,
            unit_price_cents: self.unit_price_cents,
            tiers,
            tags,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            sync_version: self.sync_version,
        })
    }
}

impl From<TierRow> for PricingTier {
    fn from(row: TierRow) -> Self {
        PricingTier {
            id: row.id,
            name: row.name,
            min_quantity: row.min_quantity,
            max_quantity: row.max_quantity,
            unit_price_cents: row.unit_price_cents,
            description: row.description,
            config_field: row.config_field,
        }
    }
}

impl From<MappingRow> for ServiceMapping {
    fn from(row: MappingRow) -> Self {
        ServiceMapping {
            item_id: row.item_id,
            config_field: row.config_field,
            trigger: row.trigger_condition,
            auto_add: row.auto_add,
            sync_quantity: row.sync_quantity,
            quantity_multiplier: row.quantity_multiplier,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// // Load the full active catalog for the configurator
/// let items = repo.list_active().await?;
/// let mappings = repo.list_mappings().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Lists all active catalog items with their tier schedules.
    ///
    /// One query per table (items, then tiers), assembled in memory.
    /// The catalog is tens of items; no pagination needed.
    pub async fn list_active(&self) -> DbResult<Vec<PricingItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description, category_id, unit_label,
                   billing_frequency, pricing_mode, unit_price_cents,
                   tags, is_active, created_at, updated_at, sync_version
            FROM pricing_items
            WHERE is_active = 1
            ORDER BY category_id, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let tier_rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT t.id, t.item_id, t.name, t.min_quantity, t.max_quantity,
                   t.unit_price_cents, t.description, t.config_field
            FROM pricing_tiers t
            INNER JOIN pricing_items p ON p.id = t.item_id
            WHERE p.is_active = 1
            ORDER BY t.item_id, t.min_quantity
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tiers_by_item: HashMap<String, Vec<PricingTier>> = HashMap::new();
        for row in tier_rows {
            tiers_by_item
                .entry(row.item_id.clone())
                .or_default()
                .push(row.into());
        }

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let tiers = tiers_by_item.remove(&row.id).unwrap_or_default();
            items.push(row.into_item(tiers)?);
        }

        debug!(count = items.len(), "Loaded active catalog");
        Ok(items)
    }

    /// Gets a catalog item by its ID, including inactive items.
    ///
    /// ## Returns
    /// * `Ok(Some(PricingItem))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PricingItem>> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description, category_id, unit_label,
                   billing_frequency, pricing_mode, unit_price_cents,
                   tags, is_active, created_at, updated_at, sync_version
            FROM pricing_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tiers = self.tiers_for(id).await?;
        Ok(Some(row.into_item(tiers)?))
    }

    /// Counts active catalog items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pricing_items WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn tiers_for(&self, item_id: &str) -> DbResult<Vec<PricingTier>> {
        let rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, item_id, name, min_quantity, max_quantity,
                   unit_price_cents, description, config_field
            FROM pricing_tiers
            WHERE item_id = ?1
            ORDER BY min_quantity
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PricingTier::from).collect())
    }

    // -------------------------------------------------------------------------
    // Writes (admin CRUD)
    // -------------------------------------------------------------------------

    /// Inserts a new catalog item along with its tier schedule.
    ///
    /// ## Arguments
    /// * `item` - Item to insert (id generated beforehand)
    ///
    /// ## Returns
    /// * `Err(DbError::InvalidData)` - Tiered item with a broken schedule
    pub async fn insert(&self, item: &PricingItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting catalog item");

        if item.pricing_mode == PricingMode::Tiered {
            validate_tier_schedule(&item.tiers)
                .map_err(|e| DbError::invalid_data("PricingItem", &item.id, e.to_string()))?;
        }

        let tags = serde_json::to_string(&item.tags)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO pricing_items (
                id, name, description, category_id, unit_label,
                billing_frequency, pricing_mode, unit_price_cents,
                tags, is_active, created_at, updated_at, sync_version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category_id)
        .bind(&item.unit_label)
        .bind(item.billing_frequency)
        .bind(item.pricing_mode)
        .bind(item.unit_price_cents)
        .bind(&tags)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .bind(item.sync_version)
        .execute(&mut *tx)
        .await?;

        for tier in &item.tiers {
            sqlx::query(
                r#"
                INSERT INTO pricing_tiers (
                    id, item_id, name, min_quantity, max_quantity,
                    unit_price_cents, description, config_field
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&tier.id)
            .bind(&item.id)
            .bind(&tier.name)
            .bind(tier.min_quantity)
            .bind(tier.max_quantity)
            .bind(tier.unit_price_cents)
            .bind(&tier.description)
            .bind(&tier.config_field)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Updates an existing catalog item's scalar fields.
    ///
    /// Tier schedules are replaced separately via [`Self::replace_tiers`].
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, item: &PricingItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating catalog item");

        let tags = serde_json::to_string(&item.tags)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE pricing_items SET
                name = ?2,
                description = ?3,
                category_id = ?4,
                unit_label = ?5,
                billing_frequency = ?6,
                pricing_mode = ?7,
                unit_price_cents = ?8,
                tags = ?9,
                is_active = ?10,
                updated_at = ?11,
                sync_version = sync_version + 1
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category_id)
        .bind(&item.unit_label)
        .bind(item.billing_frequency)
        .bind(item.pricing_mode)
        .bind(item.unit_price_cents)
        .bind(&tags)
        .bind(item.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PricingItem", &item.id));
        }

        Ok(())
    }

    /// Replaces an item's entire tier schedule.
    ///
    /// The schedule is validated as a whole before any row changes
    /// (ascending, contiguous, last tier unbounded).
    pub async fn replace_tiers(&self, item_id: &str, tiers: &[PricingTier]) -> DbResult<()> {
        debug!(item_id = %item_id, count = tiers.len(), "Replacing tier schedule");

        validate_tier_schedule(tiers)
            .map_err(|e| DbError::invalid_data("PricingItem", item_id, e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pricing_tiers WHERE item_id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        for tier in tiers {
            sqlx::query(
                r#"
                INSERT INTO pricing_tiers (
                    id, item_id, name, min_quantity, max_quantity,
                    unit_price_cents, description, config_field
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&tier.id)
            .bind(item_id)
            .bind(&tier.name)
            .bind(tier.min_quantity)
            .bind(tier.max_quantity)
            .bind(tier.unit_price_cents)
            .bind(&tier.description)
            .bind(&tier.config_field)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE pricing_items
            SET updated_at = ?2, sync_version = sync_version + 1
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Soft-deletes a catalog item by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// Saved scenarios reference catalog items by id; a hard delete would
    /// orphan those snapshots. Inactive items stay loadable by id but
    /// disappear from the configurator and the rule engine.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting catalog item");

        let result = sqlx::query(
            r#"
            UPDATE pricing_items
            SET is_active = 0, updated_at = ?2, sync_version = sync_version + 1
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PricingItem", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Service Mappings
    // -------------------------------------------------------------------------

    /// Lists all mappings for active items, the full rule set the engine
    /// runs against.
    pub async fn list_mappings(&self) -> DbResult<Vec<ServiceMapping>> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT m.item_id, m.config_field, m.trigger_condition,
                   m.auto_add, m.sync_quantity, m.quantity_multiplier
            FROM service_mappings m
            INNER JOIN pricing_items p ON p.id = m.item_id
            WHERE p.is_active = 1
            ORDER BY m.item_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ServiceMapping::from).collect())
    }

    /// Inserts or replaces the mapping for an item.
    ///
    /// One mapping per item (PRIMARY KEY on item_id).
    pub async fn upsert_mapping(&self, mapping: &ServiceMapping) -> DbResult<()> {
        debug!(item_id = %mapping.item_id, field = %mapping.config_field, "Upserting mapping");

        sqlx::query(
            r#"
            INSERT INTO service_mappings (
                item_id, config_field, trigger_condition,
                auto_add, sync_quantity, quantity_multiplier
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(item_id) DO UPDATE SET
                config_field = excluded.config_field,
                trigger_condition = excluded.trigger_condition,
                auto_add = excluded.auto_add,
                sync_quantity = excluded.sync_quantity,
                quantity_multiplier = excluded.quantity_multiplier
            "#,
        )
        .bind(&mapping.item_id)
        .bind(&mapping.config_field)
        .bind(mapping.trigger)
        .bind(mapping.auto_add)
        .bind(mapping.sync_quantity)
        .bind(mapping.quantity_multiplier)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the mapping for an item, if any.
    pub async fn delete_mapping(&self, item_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM service_mappings WHERE item_id = ?1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn simple_item(name: &str) -> PricingItem {
        let now = Utc::now();
        PricingItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: Some("test item".to_string()),
            category_id: "processing".to_string(),
            unit_label: "per card".to_string(),
            billing_frequency: BillingFrequency::Monthly,
            pricing_mode: PricingMode::Simple,
            unit_price_cents: 250,
            tiers: Vec::new(),
            tags: vec!["cards".to_string()],
            is_active: true,
            created_at: now,
            updated_at: now,
            sync_version: 0,
        }
    }

    fn tier(min: i64, max: Option<i64>, price: i64) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4().to_string(),
            name: format!("{}+", min),
            min_quantity: min,
            max_quantity: max,
            unit_price_cents: price,
            description: None,
            config_field: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let item = simple_item("Card Issuance");

        db.catalog().insert(&item).await.unwrap();

        let loaded = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Card Issuance");
        assert_eq!(loaded.unit_price_cents, 250);
        assert_eq!(loaded.tags, vec!["cards".to_string()]);
        assert_eq!(loaded.billing_frequency, BillingFrequency::Monthly);
    }

    #[tokio::test]
    async fn test_tiered_item_round_trip() {
        let db = test_db().await;
        let mut item = simple_item("Active Cards");
        item.pricing_mode = PricingMode::Tiered;
        item.tiers = vec![tier(1, Some(100), 200), tier(101, None, 100)];

        db.catalog().insert(&item).await.unwrap();

        let loaded = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.tiers.len(), 2);
        assert_eq!(loaded.tiers[0].min_quantity, 1);
        assert_eq!(loaded.tiers[1].max_quantity, None);
    }

    #[tokio::test]
    async fn test_insert_rejects_broken_schedule() {
        let db = test_db().await;
        let mut item = simple_item("Broken");
        item.pricing_mode = PricingMode::Tiered;
        // Gap between 50 and 101, and no unbounded final tier
        item.tiers = vec![tier(1, Some(50), 200), tier(101, Some(200), 100)];

        let err = db.catalog().insert(&item).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_list() {
        let db = test_db().await;
        let item = simple_item("Ephemeral");
        db.catalog().insert(&item).await.unwrap();
        assert_eq!(db.catalog().count().await.unwrap(), 1);

        db.catalog().soft_delete(&item.id).await.unwrap();

        assert_eq!(db.catalog().count().await.unwrap(), 0);
        assert!(db.catalog().list_active().await.unwrap().is_empty());
        // Still loadable by id for saved scenarios
        let loaded = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);
    }

    #[tokio::test]
    async fn test_update_bumps_sync_version() {
        let db = test_db().await;
        let mut item = simple_item("Processing");
        db.catalog().insert(&item).await.unwrap();

        item.unit_price_cents = 300;
        db.catalog().update(&item).await.unwrap();

        let loaded = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.unit_price_cents, 300);
        assert_eq!(loaded.sync_version, 1);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let db = test_db().await;
        let item = simple_item("Ghost");
        let err = db.catalog().update(&item).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_replace_tiers() {
        let db = test_db().await;
        let mut item = simple_item("Active Cards");
        item.pricing_mode = PricingMode::Tiered;
        item.tiers = vec![tier(1, None, 200)];
        db.catalog().insert(&item).await.unwrap();

        let new_tiers = vec![tier(1, Some(1000), 200), tier(1001, None, 150)];
        db.catalog().replace_tiers(&item.id, &new_tiers).await.unwrap();

        let loaded = db.catalog().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.tiers.len(), 2);
        assert_eq!(loaded.tiers[1].unit_price_cents, 150);
    }

    #[tokio::test]
    async fn test_mapping_upsert_and_list() {
        let db = test_db().await;
        let item = simple_item("Card Issuance");
        db.catalog().insert(&item).await.unwrap();

        let mapping = ServiceMapping::new(&item.id, "has_debit_cards", TriggerCondition::Boolean)
            .with_auto_add();
        db.catalog().upsert_mapping(&mapping).await.unwrap();

        let mappings = db.catalog().list_mappings().await.unwrap();
        assert_eq!(mappings.len(), 1);
        assert!(mappings[0].auto_add);

        // Upsert replaces in place
        let updated = ServiceMapping::new(&item.id, "monthly_cards", TriggerCondition::Number)
            .with_auto_add()
            .with_sync_quantity();
        db.catalog().upsert_mapping(&updated).await.unwrap();

        let mappings = db.catalog().list_mappings().await.unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].config_field, "monthly_cards");
        assert!(mappings[0].sync_quantity);
    }

    #[tokio::test]
    async fn test_mappings_for_inactive_items_hidden() {
        let db = test_db().await;
        let item = simple_item("Card Issuance");
        db.catalog().insert(&item).await.unwrap();
        db.catalog()
            .upsert_mapping(
                &ServiceMapping::new(&item.id, "has_debit_cards", TriggerCondition::Boolean)
                    .with_auto_add(),
            )
            .await
            .unwrap();

        db.catalog().soft_delete(&item.id).await.unwrap();

        assert!(db.catalog().list_mappings().await.unwrap().is_empty());
    }
}
