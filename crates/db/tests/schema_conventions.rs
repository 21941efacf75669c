//! Schema conventions every migration must follow.

use sqlx::PgPool;

async fn base_tables(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT table_name::text
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// `id` columns are bigint, except smallint lookup tables.
#[sqlx::test(migrations = "../../db/migrations")]
async fn ids_are_bigint_or_smallint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::text, data_type::text
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert!(
            data_type == "bigint" || data_type == "smallint",
            "{table}.id should be bigint or smallint, got {data_type}"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_table_has_timestamptz_audit_columns(pool: PgPool) {
    for table in base_tables(&pool).await {
        for col in ["created_at", "updated_at"] {
            let data_type: Option<String> = sqlx::query_scalar(
                "SELECT data_type::text
                 FROM information_schema.columns
                 WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
            )
            .bind(&table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let data_type = data_type.unwrap_or_else(|| panic!("{table} is missing {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "{table}.{col} should be timestamptz"
            );
        }
    }
}

/// Every table keeps `updated_at` current through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn every_table_has_updated_at_trigger(pool: PgPool) {
    for table in base_tables(&pool).await {
        let trigger = format!("trg_{table}_updated_at");
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_schema = 'public'
                  AND event_object_table = $1
                  AND trigger_name = $2
            )",
        )
        .bind(&table)
        .bind(&trigger)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(exists, "{table} has no {trigger} trigger");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::text, column_name::text
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "VARCHAR columns found (use TEXT): {rows:?}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_foreign_key_column_is_indexed(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name::text, kcu.column_name::text
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table, column) in &fk_columns {
        let indexed: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(indexed, "FK column {table}.{column} has no index");
    }
}

/// Foreign keys state their delete/update behavior instead of relying on
/// the `NO ACTION` default.
#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_keys_declare_referential_actions(pool: PgPool) {
    let rules: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT rc.constraint_name::text, rc.delete_rule::text, rc.update_rule::text
         FROM information_schema.referential_constraints rc
         WHERE rc.constraint_schema = 'public'
         ORDER BY 1",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rules.is_empty());
    for (constraint, delete_rule, update_rule) in &rules {
        assert!(
            delete_rule != "NO ACTION" || update_rule != "NO ACTION",
            "FK {constraint} uses NO ACTION for both ON DELETE and ON UPDATE"
        );
    }
}

/// Unique constraints follow the `uq_<table>_<column>` naming that the API
/// uses to map violations to conflict messages.
#[sqlx::test(migrations = "../../db/migrations")]
async fn unique_constraints_are_named_uq(pool: PgPool) {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT constraint_name::text
         FROM information_schema.table_constraints
         WHERE constraint_schema = 'public' AND constraint_type = 'UNIQUE'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!names.is_empty());
    for name in &names {
        assert!(name.starts_with("uq_"), "unique constraint {name} should start with uq_");
    }
}
