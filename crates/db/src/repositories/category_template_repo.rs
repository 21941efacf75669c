//! Repository for the `category_templates` table.

use std::collections::HashMap;

use jacms_core::slug::slug_or_generate;
use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::category_template::{
    ApplyTemplateReport, CategoryTemplate, CreateCategoryTemplate, TemplateCategory,
    UpdateCategoryTemplate,
};

/// Column list for `category_templates` queries.
const COLUMNS: &str = "id, name, description, categories, created_at, updated_at";

/// Provides CRUD for category templates and applies them to the live
/// category table.
pub struct CategoryTemplateRepo;

impl CategoryTemplateRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category_templates ORDER BY name ASC");
        sqlx::query_as::<_, CategoryTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category_templates WHERE id = $1");
        sqlx::query_as::<_, CategoryTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateCategoryTemplate,
    ) -> Result<CategoryTemplate, sqlx::Error> {
        let categories = serde_json::to_value(&input.categories)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO category_templates (name, description, categories) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryTemplate>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(categories)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategoryTemplate,
    ) -> Result<Option<CategoryTemplate>, sqlx::Error> {
        let categories = input
            .categories
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "UPDATE category_templates SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                categories = COALESCE($4, categories) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryTemplate>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(categories)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM category_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create the template's categories in one transaction.
    ///
    /// Entries whose slug already exists are skipped and left unchanged.
    /// Parents are resolved by slug after every entry is inserted, so a
    /// template may list children before their parents.
    pub async fn apply(
        pool: &PgPool,
        entries: &[TemplateCategory],
    ) -> Result<ApplyTemplateReport, sqlx::Error> {
        let mut report = ApplyTemplateReport::default();
        let mut created: Vec<(DbId, Option<&str>)> = Vec::new();
        let mut tx = pool.begin().await?;

        for (position, entry) in entries.iter().enumerate() {
            let slug = slug_or_generate(entry.slug.as_deref(), &entry.name);
            let id: Option<DbId> = sqlx::query_scalar(
                "INSERT INTO categories (name, slug, description, color, icon, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (slug) DO NOTHING \
                 RETURNING id",
            )
            .bind(entry.name.trim())
            .bind(&slug)
            .bind(&entry.description)
            .bind(&entry.color)
            .bind(&entry.icon)
            .bind(position as i32)
            .fetch_optional(&mut *tx)
            .await?;

            match id {
                Some(id) => {
                    report.created.push(id);
                    created.push((id, entry.parent_slug.as_deref()));
                }
                None => report.skipped.push(slug),
            }
        }

        let slugs: Vec<(String, DbId)> = sqlx::query_as("SELECT slug, id FROM categories")
            .fetch_all(&mut *tx)
            .await?;
        let by_slug: HashMap<String, DbId> = slugs.into_iter().collect();

        for (id, parent_slug) in created {
            let Some(parent_id) = parent_slug.and_then(|s| by_slug.get(s)) else {
                continue;
            };
            if *parent_id == id {
                continue;
            }
            sqlx::query("UPDATE categories SET parent_id = $2 WHERE id = $1")
                .bind(id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(report)
    }
}
