//! Integration tests for the version store: gap-free numbering, no-op save
//! suppression, and append-only revert.

use sqlx::PgPool;

use lorebase_db::models::article::{Article, CreateArticle, UpdateArticle};
use lorebase_db::repositories::{ArticleRepo, ArticleVersionRepo};

const AUTHOR: i64 = 1;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(pool: &PgPool, title: &str, body: &str) -> Article {
    ArticleRepo::create(
        pool,
        &CreateArticle {
            title: title.to_string(),
            body_md: Some(body.to_string()),
            folder_id: None,
            status: None,
        },
        AUTHOR,
    )
    .await
    .unwrap()
}

async fn save_body(pool: &PgPool, slug: &str, body: &str) -> Article {
    ArticleRepo::update(
        pool,
        slug,
        &UpdateArticle {
            title: None,
            body_md: Some(body.to_string()),
            folder_id: None,
            status: None,
        },
        AUTHOR,
    )
    .await
    .unwrap()
    .unwrap()
}

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sequential_saves_number_versions_one_to_n(pool: PgPool) {
    let article = create(&pool, "Changelog", "v1").await;
    for body in ["v2", "v3", "v4"] {
        save_body(&pool, &article.slug, body).await;
    }

    let versions = ArticleVersionRepo::list_by_article(&pool, article.id)
        .await
        .unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![4, 3, 2, 1], "newest first, no gaps or repeats");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn noop_save_does_not_advance_the_sequence(pool: PgPool) {
    let article = create(&pool, "Stable", "same body").await;

    // Saving identical content (and a folder-only change) writes no version.
    save_body(&pool, &article.slug, "same body").await;
    ArticleRepo::update(
        &pool,
        &article.slug,
        &UpdateArticle {
            title: None,
            body_md: None,
            folder_id: Some(7),
            status: None,
        },
        AUTHOR,
    )
    .await
    .unwrap()
    .unwrap();

    let latest = ArticleVersionRepo::latest_version_number(&pool, article.id)
        .await
        .unwrap();
    assert_eq!(latest, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_version_mirrors_current_article_row(pool: PgPool) {
    let article = create(&pool, "Mirror", "first").await;
    let updated = ArticleRepo::update(
        &pool,
        &article.slug,
        &UpdateArticle {
            title: Some("Mirror Renamed".to_string()),
            body_md: Some("second".to_string()),
            folder_id: None,
            status: Some("published".to_string()),
        },
        AUTHOR,
    )
    .await
    .unwrap()
    .unwrap();

    let latest = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 2)
        .await
        .unwrap()
        .expect("version 2 exists");
    assert_eq!(latest.title, updated.title);
    assert_eq!(latest.body_md, updated.body_md);
    assert_eq!(latest.status, updated.status);
    assert_eq!(latest.change_type, "update");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_sequences_are_independent_per_article(pool: PgPool) {
    let a = create(&pool, "Article A", "a1").await;
    let b = create(&pool, "Article B", "b1").await;
    save_body(&pool, &a.slug, "a2").await;
    save_body(&pool, &a.slug, "a3").await;
    save_body(&pool, &b.slug, "b2").await;

    assert_eq!(
        ArticleVersionRepo::latest_version_number(&pool, a.id)
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        ArticleVersionRepo::latest_version_number(&pool, b.id)
            .await
            .unwrap(),
        2
    );
}

// ---------------------------------------------------------------------------
// Revert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn revert_appends_a_new_version_and_keeps_history(pool: PgPool) {
    let article = create(&pool, "Guide", "first draft").await;
    save_body(&pool, &article.slug, "second draft").await;

    let v1 = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 1)
        .await
        .unwrap()
        .unwrap();
    let reverted = ArticleRepo::revert_to_version(&pool, article.id, &v1, AUTHOR)
        .await
        .unwrap();

    assert_eq!(reverted.body_md, "first draft");

    let versions = ArticleVersionRepo::list_by_article(&pool, article.id)
        .await
        .unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![3, 2, 1], "revert appends; nothing is rewritten");
    assert_eq!(versions[0].change_type, "revert");
    assert_eq!(versions[0].title, v1.title);

    // The reverted-from version is untouched.
    let v2 = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(v2.body_md, "second draft");
    assert_eq!(v2.change_type, "update");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revert_to_identical_content_writes_no_version(pool: PgPool) {
    let article = create(&pool, "Static", "only body").await;

    let v1 = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 1)
        .await
        .unwrap()
        .unwrap();
    ArticleRepo::revert_to_version(&pool, article.id, &v1, AUTHOR)
        .await
        .unwrap();

    let latest = ArticleVersionRepo::latest_version_number(&pool, article.id)
        .await
        .unwrap();
    assert_eq!(latest, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revert_snapshot_records_the_acting_user(pool: PgPool) {
    let article = create(&pool, "Audit", "first").await;
    save_body(&pool, &article.slug, "second").await;

    let v1 = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 1)
        .await
        .unwrap()
        .unwrap();
    let other_user = 42;
    ArticleRepo::revert_to_version(&pool, article.id, &v1, other_user)
        .await
        .unwrap();

    let v3 = ArticleVersionRepo::find_by_article_and_version(&pool, article.id, 3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(v3.author_id, Some(other_user));
}
