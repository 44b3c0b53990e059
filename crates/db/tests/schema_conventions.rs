//! Schema convention checks: key types, timestamp columns, TEXT over varchar.

use assert_matches::assert_matches;
use sqlx::PgPool;

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
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
        assert_eq!(
            data_type, "bigint",
            "Table {table}.id should be bigint, got {data_type}"
        );
    }
}

/// Every table has created_at; mutable tables also have updated_at. Both are
/// timestamptz. `article_versions` is immutable by design and carries no
/// updated_at.
#[sqlx::test(migrations = "../../db/migrations")]
async fn timestamp_columns_follow_conventions(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        let mut expected = vec!["created_at"];
        if table != "article_versions" {
            expected.push("updated_at");
        }

        for col in expected {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// No character varying columns should exist -- TEXT is preferred.
#[sqlx::test(migrations = "../../db/migrations")]
async fn no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        rows.is_empty(),
        "varchar columns found: {rows:?}"
    );
}

/// The per-article version sequence is protected by a unique constraint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_version_numbers_are_rejected(pool: PgPool) {
    let article_id: (i64,) = sqlx::query_as(
        "INSERT INTO articles (title, slug, author_id) VALUES ('T', 't', 1) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let insert = "INSERT INTO article_versions
        (article_id, version, title, body_md, status, change_type, author_id)
        VALUES ($1, 1, 'T', '', 'draft', 'create', 1)";
    sqlx::query(insert)
        .bind(article_id.0)
        .execute(&pool)
        .await
        .unwrap();
    let duplicate = sqlx::query(insert)
        .bind(article_id.0)
        .execute(&pool)
        .await;

    assert_matches!(duplicate, Err(sqlx::Error::Database(_)));
}
