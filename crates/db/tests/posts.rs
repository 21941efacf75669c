//! Integration tests for post persistence, filters and associations.

use jacms_core::post::PostStatus;
use jacms_db::models::category::CreateCategory;
use jacms_db::models::post::{PostListParams, PostWrite, UpdatePost};
use jacms_db::models::tag::CreateTag;
use jacms_db::models::user::CreateUser;
use jacms_db::repositories::{CategoryRepo, PostRepo, TagRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn author(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "writer".into(),
            email: "writer@example.com".into(),
            password_hash: "x".into(),
            display_name: Some("Writer".into()),
            role_id: 3,
        },
    )
    .await
    .unwrap()
    .id
}

fn write(title: &str, status: PostStatus) -> PostWrite {
    PostWrite {
        title: title.to_string(),
        slug: jacms_core::slug::generate_slug(title),
        excerpt: None,
        content: format!("Body of {title}"),
        featured_image: None,
        status,
        meta_title: None,
        meta_description: None,
        focus_keyword: None,
        published_at: None,
        scheduled_at: None,
    }
}

async fn category(pool: &PgPool, name: &str) -> i64 {
    let input = CreateCategory {
        name: name.into(),
        slug: None,
        description: None,
        color: None,
        icon: None,
        parent_id: None,
        sort_order: None,
        is_active: None,
    };
    CategoryRepo::create(pool, &input, &jacms_core::slug::generate_slug(name))
        .await
        .unwrap()
        .id
}

async fn tag(pool: &PgPool, name: &str) -> i64 {
    let input = CreateTag {
        name: name.into(),
        slug: None,
        description: None,
        color: None,
    };
    TagRepo::create(pool, &input, name).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_resolves_status_name_and_associations(pool: PgPool) {
    let author_id = author(&pool).await;
    let cat = category(&pool, "Guides").await;
    let t = tag(&pool, "rust").await;

    let created = PostRepo::create(&pool, &write("Hello", PostStatus::Published), author_id, &[cat, cat], &[t])
        .await
        .unwrap();

    assert_eq!(created.post.status, "PUBLISHED");
    assert_eq!(created.post.post_status(), Some(PostStatus::Published));
    assert_eq!(created.category_ids, vec![cat]);
    assert_eq!(created.tag_ids, vec![t]);

    let loaded = PostRepo::find_with_relations(&pool, created.post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.category_ids, vec![cat]);
    assert_eq!(loaded.tag_ids, vec![t]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_category_and_search(pool: PgPool) {
    let author_id = author(&pool).await;
    let cat = category(&pool, "News").await;

    PostRepo::create(&pool, &write("Rust release", PostStatus::Published), author_id, &[cat], &[])
        .await
        .unwrap();
    PostRepo::create(&pool, &write("Draft idea", PostStatus::Draft), author_id, &[], &[])
        .await
        .unwrap();
    PostRepo::create(&pool, &write("100% done", PostStatus::Draft), author_id, &[], &[])
        .await
        .unwrap();

    let drafts = PostRepo::list(
        &pool,
        &PostListParams {
            status: Some(PostStatus::Draft),
            ..PostListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(drafts.total, 2);

    let in_news = PostRepo::list(
        &pool,
        &PostListParams {
            category_id: Some(cat),
            ..PostListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(in_news.total, 1);
    assert_eq!(in_news.items[0].title, "Rust release");

    let percent = PostRepo::list(
        &pool,
        &PostListParams {
            search: Some("100%".into()),
            ..PostListParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(percent.total, 1, "wildcards in the search term are literal");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_only_supplied_association_sets(pool: PgPool) {
    let author_id = author(&pool).await;
    let a = category(&pool, "A").await;
    let b = category(&pool, "B").await;
    let t = tag(&pool, "keep").await;

    let created = PostRepo::create(&pool, &write("Post", PostStatus::Draft), author_id, &[a], &[t])
        .await
        .unwrap();

    let patch = UpdatePost {
        title: Some("Renamed".into()),
        ..UpdatePost::default()
    };
    let merged = PostWrite::merged(&created.post, &patch);
    let updated = PostRepo::update(&pool, created.post.id, &merged, Some(&[b]), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.post.title, "Renamed");
    assert_eq!(updated.post.content, "Body of Post");
    assert_eq!(updated.category_ids, vec![b]);
    assert_eq!(updated.tag_ids, vec![t]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn add_categories_is_additive(pool: PgPool) {
    let author_id = author(&pool).await;
    let a = category(&pool, "A").await;
    let b = category(&pool, "B").await;
    let created = PostRepo::create(&pool, &write("Post", PostStatus::Draft), author_id, &[a], &[])
        .await
        .unwrap();

    let added = PostRepo::add_categories(&pool, created.post.id, &[a, b]).await.unwrap();
    assert_eq!(added, 1);

    let loaded = PostRepo::find_with_relations(&pool, created.post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.category_ids, vec![a, b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_post_returns_none(pool: PgPool) {
    let result = PostRepo::update(&pool, 123456, &write("Ghost", PostStatus::Draft), None, None)
        .await
        .unwrap();
    assert!(result.is_none());
}
