//! Dashboard statistics and widget catalog types.

use serde::Serialize;

/// Headline counts for the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub scheduled_posts: i64,
    pub total_categories: i64,
    pub total_tags: i64,
    pub total_users: i64,
    pub views_today: i64,
    pub unread_notifications: i64,
}

/// An entry in the widget catalog.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default_width: u8,
    pub default_height: u8,
}

/// Widgets the dashboard can render.
pub const WIDGET_CATALOG: &[WidgetDefinition] = &[
    WidgetDefinition {
        id: "stats-overview",
        name: "Statistics overview",
        description: "Post, taxonomy and user totals",
        default_width: 12,
        default_height: 2,
    },
    WidgetDefinition {
        id: "recent-posts",
        name: "Recent posts",
        description: "Most recently updated posts",
        default_width: 8,
        default_height: 4,
    },
    WidgetDefinition {
        id: "traffic-sources",
        name: "Traffic sources",
        description: "Page views by referrer type",
        default_width: 4,
        default_height: 4,
    },
    WidgetDefinition {
        id: "real-time",
        name: "Real-time visitors",
        description: "Views and sessions in the last few minutes",
        default_width: 4,
        default_height: 3,
    },
    WidgetDefinition {
        id: "system-health",
        name: "System health",
        description: "Latest value of each health metric",
        default_width: 4,
        default_height: 3,
    },
    WidgetDefinition {
        id: "security-events",
        name: "Security events",
        description: "Recent security-relevant activity",
        default_width: 6,
        default_height: 3,
    },
    WidgetDefinition {
        id: "notifications",
        name: "Notifications",
        description: "Unread notifications",
        default_width: 4,
        default_height: 3,
    },
];
