//! Repository for the `category_rules` table.

use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::category_rule::CategoryRule;

/// Column list for `category_rules` queries.
const COLUMNS: &str = "id, category_id, name, keywords, match_field, weight, is_active, \
    created_at, updated_at";

/// Fully resolved values for inserting or updating a rule. Keywords are
/// expected to be normalized already.
#[derive(Debug, Clone)]
pub struct RuleWrite<'a> {
    pub category_id: DbId,
    pub name: &'a str,
    pub keywords: &'a [String],
    pub match_field: &'a str,
    pub weight: i32,
    pub is_active: bool,
}

/// Provides CRUD operations for keyword categorization rules.
pub struct CategoryRuleRepo;

impl CategoryRuleRepo {
    /// List rules, optionally for a single category.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<CategoryRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category_rules \
             WHERE ($1::bigint IS NULL OR category_id = $1) \
             ORDER BY category_id ASC, id ASC"
        );
        sqlx::query_as::<_, CategoryRule>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Active rules whose category is also active.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<CategoryRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM category_rules r \
             WHERE r.is_active \
               AND EXISTS (SELECT 1 FROM categories c WHERE c.id = r.category_id AND c.is_active) \
             ORDER BY r.category_id ASC, r.id ASC"
        );
        sqlx::query_as::<_, CategoryRule>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CategoryRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM category_rules WHERE id = $1");
        sqlx::query_as::<_, CategoryRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, rule: &RuleWrite<'_>) -> Result<CategoryRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO category_rules \
                (category_id, name, keywords, match_field, weight, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRule>(&query)
            .bind(rule.category_id)
            .bind(rule.name)
            .bind(rule.keywords)
            .bind(rule.match_field)
            .bind(rule.weight)
            .bind(rule.is_active)
            .fetch_one(pool)
            .await
    }

    /// Overwrite a rule with merged values.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        rule: &RuleWrite<'_>,
    ) -> Result<Option<CategoryRule>, sqlx::Error> {
        let query = format!(
            "UPDATE category_rules SET \
                category_id = $2, name = $3, keywords = $4, \
                match_field = $5, weight = $6, is_active = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRule>(&query)
            .bind(id)
            .bind(rule.category_id)
            .bind(rule.name)
            .bind(rule.keywords)
            .bind(rule.match_field)
            .bind(rule.weight)
            .bind(rule.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM category_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
