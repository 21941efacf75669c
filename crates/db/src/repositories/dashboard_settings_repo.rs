//! Repository for the `dashboard_settings` table.
//!
//! One row per user, guaranteed by `uq_dashboard_settings_user_id`. Every
//! write is a single `INSERT ... ON CONFLICT (user_id)` statement so
//! concurrent first requests for the same user cannot create two rows.

use jacms_core::dashboard_settings::SettingsDefaults;
use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard_settings::{DashboardSettings, SaveDashboardSettings};

/// Column list for `dashboard_settings` queries.
const COLUMNS: &str =
    "id, user_id, widgets, layout, appearance, data, grid_layout, created_at, updated_at";

/// Provides upsert-style access to per-user dashboard settings.
pub struct DashboardSettingsRepo;

impl DashboardSettingsRepo {
    /// Find a user's settings. Returns `None` if none were ever saved.
    pub async fn get_settings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<DashboardSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboard_settings WHERE user_id = $1");
        sqlx::query_as::<_, DashboardSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a user's settings from a partial payload.
    ///
    /// On insert, sections missing from `input` take their defaults. On
    /// update, missing sections keep their stored values. Saving the same
    /// payload twice leaves the row unchanged apart from `updated_at`.
    pub async fn create_or_update_settings(
        pool: &PgPool,
        user_id: DbId,
        input: &SaveDashboardSettings,
    ) -> Result<DashboardSettings, sqlx::Error> {
        let defaults = SettingsDefaults::default();
        let query = format!(
            "INSERT INTO dashboard_settings (user_id, widgets, layout, appearance, data, grid_layout)
             VALUES ($1, COALESCE($2, $7), COALESCE($3, $8), COALESCE($4, $9),
                     COALESCE($5, $10), COALESCE($6, $11))
             ON CONFLICT (user_id) DO UPDATE SET
                widgets = COALESCE($2, dashboard_settings.widgets),
                layout = COALESCE($3, dashboard_settings.layout),
                appearance = COALESCE($4, dashboard_settings.appearance),
                data = COALESCE($5, dashboard_settings.data),
                grid_layout = COALESCE($6, dashboard_settings.grid_layout)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardSettings>(&query)
            .bind(user_id)
            .bind(&input.widgets)
            .bind(&input.layout)
            .bind(&input.appearance)
            .bind(&input.data)
            .bind(&input.grid_layout)
            .bind(&defaults.widgets)
            .bind(&defaults.layout)
            .bind(&defaults.appearance)
            .bind(&defaults.data)
            .bind(&defaults.grid_layout)
            .fetch_one(pool)
            .await
    }

    /// Return the user's settings, inserting the defaults first if absent.
    pub async fn get_or_create_settings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<DashboardSettings, sqlx::Error> {
        let defaults = SettingsDefaults::default();
        sqlx::query(
            "INSERT INTO dashboard_settings (user_id, widgets, layout, appearance, data, grid_layout)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(&defaults.widgets)
        .bind(&defaults.layout)
        .bind(&defaults.appearance)
        .bind(&defaults.data)
        .bind(&defaults.grid_layout)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM dashboard_settings WHERE user_id = $1");
        sqlx::query_as::<_, DashboardSettings>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Overwrite every section with its default.
    pub async fn reset_settings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<DashboardSettings, sqlx::Error> {
        let defaults = SettingsDefaults::default();
        let query = format!(
            "INSERT INTO dashboard_settings (user_id, widgets, layout, appearance, data, grid_layout)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                widgets = EXCLUDED.widgets,
                layout = EXCLUDED.layout,
                appearance = EXCLUDED.appearance,
                data = EXCLUDED.data,
                grid_layout = EXCLUDED.grid_layout
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardSettings>(&query)
            .bind(user_id)
            .bind(&defaults.widgets)
            .bind(&defaults.layout)
            .bind(&defaults.appearance)
            .bind(&defaults.data)
            .bind(&defaults.grid_layout)
            .fetch_one(pool)
            .await
    }
}
