//! Read-only aggregates for the dashboard overview.

use jacms_core::post::PostStatus;
use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::DashboardStats;

/// Provides the headline counts shown on the dashboard.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Gather all overview counts concurrently. `user_id` scopes the
    /// unread-notification count.
    pub async fn stats(pool: &PgPool, user_id: DbId) -> Result<DashboardStats, sqlx::Error> {
        let (posts, categories, tags, users, views_today, unread) = futures::try_join!(
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                "SELECT COUNT(*), \
                        COUNT(*) FILTER (WHERE status_id = $1), \
                        COUNT(*) FILTER (WHERE status_id = $2), \
                        COUNT(*) FILTER (WHERE status_id = $3) \
                 FROM posts",
            )
            .bind(PostStatus::Published.id())
            .bind(PostStatus::Draft.id())
            .bind(PostStatus::Scheduled.id())
            .fetch_one(pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories").fetch_one(pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags").fetch_one(pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active")
                .fetch_one(pool),
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM page_views WHERE created_at >= date_trunc('day', NOW())",
            )
            .fetch_one(pool),
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
            )
            .bind(user_id)
            .fetch_one(pool),
        )?;

        let (total_posts, published_posts, draft_posts, scheduled_posts) = posts;
        Ok(DashboardStats {
            total_posts,
            published_posts,
            draft_posts,
            scheduled_posts,
            total_categories: categories,
            total_tags: tags,
            total_users: users,
            views_today,
            unread_notifications: unread,
        })
    }
}
