//! # Scenario Repository
//!
//! Persistence for saved quote scenarios.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scenario Storage                                     │
//! │                                                                         │
//! │  The full ScenarioData (config + selected items + global discount +    │
//! │  computed summary) is one JSON document - exactly the shape the         │
//! │  frontend serializes. Name and client/project are lifted into columns  │
//! │  so list views never parse payloads.                                   │
//! │                                                                         │
//! │  scenarios                                                              │
//! │  ┌──────┬──────────┬─────────────┬──────────────┬───────────────────┐  │
//! │  │ id   │ name     │ client_name │ project_name │ data (JSON)       │  │
//! │  ├──────┼──────────┼─────────────┼──────────────┼───────────────────┤  │
//! │  │ a1.. │ Q3 quote │ Acme Bank   │ Debit Launch │ {"config":{...}}  │  │
//! │  └──────┴──────────┴─────────────┴──────────────┴───────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cardquote_core::ScenarioData;

/// Lightweight scenario listing entry (no payload parse).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScenarioSummaryRow {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ScenarioRow {
    data: String,
}

/// Repository for saved scenario operations.
#[derive(Debug, Clone)]
pub struct ScenarioRepository {
    pool: SqlitePool,
}

impl ScenarioRepository {
    /// Creates a new ScenarioRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ScenarioRepository { pool }
    }

    /// Saves a scenario, replacing any existing one with the same id.
    ///
    /// Save-over-save of the same scenario is the normal flow (the user
    /// keeps working and hits save again), hence upsert rather than insert.
    pub async fn save(&self, scenario: &ScenarioData) -> DbResult<()> {
        debug!(id = %scenario.id, name = %scenario.name, "Saving scenario");

        let data = serde_json::to_string(scenario)?;

        sqlx::query(
            r#"
            INSERT INTO scenarios (
                id, name, client_name, project_name, data, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                client_name = excluded.client_name,
                project_name = excluded.project_name,
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&scenario.id)
        .bind(&scenario.name)
        .bind(&scenario.config.client_name)
        .bind(&scenario.config.project_name)
        .bind(&data)
        .bind(scenario.created_at)
        .bind(scenario.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads a scenario by id.
    ///
    /// ## Returns
    /// * `Ok(Some(ScenarioData))` - Scenario found and parsed
    /// * `Ok(None)` - No scenario with that id
    /// * `Err(DbError::Serialization)` - Stored payload no longer parses
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ScenarioData>> {
        let row = sqlx::query_as::<_, ScenarioRow>("SELECT data FROM scenarios WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(serde_json::from_str(&row.data)?)),
            None => Ok(None),
        }
    }

    /// Lists saved scenarios, newest first.
    ///
    /// Returns listing rows only; call [`Self::get_by_id`] to load the
    /// full payload when the user opens one.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<ScenarioSummaryRow>> {
        let rows = sqlx::query_as::<_, ScenarioSummaryRow>(
            r#"
            SELECT id, name, client_name, project_name, created_at, updated_at
            FROM scenarios
            ORDER BY updated_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Deletes a scenario.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No scenario with that id
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting scenario");

        let result = sqlx::query("DELETE FROM scenarios WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Scenario", id));
        }

        Ok(())
    }

    /// Counts saved scenarios.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scenarios")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
