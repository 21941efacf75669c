//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod category_rule_repo;
pub mod category_template_repo;
pub mod content_gap_repo;
pub mod dashboard_repo;
pub mod dashboard_settings_repo;
pub mod menu_repo;
pub mod notification_repo;
pub mod page_view_repo;
pub mod post_repo;
pub mod role_repo;
pub mod security_event_repo;
pub mod session_repo;
pub mod system_health_repo;
pub mod tag_repo;
pub mod user_repo;

pub use category_repo::{CategoryRepo, DeleteRefusal};
pub use category_rule_repo::{CategoryRuleRepo, RuleWrite};
pub use category_template_repo::CategoryTemplateRepo;
pub use content_gap_repo::ContentGapRepo;
pub use dashboard_repo::DashboardRepo;
pub use dashboard_settings_repo::DashboardSettingsRepo;
pub use menu_repo::{MenuRepo, MenuUpdate};
pub use notification_repo::NotificationRepo;
pub use page_view_repo::PageViewRepo;
pub use post_repo::PostRepo;
pub use role_repo::RoleRepo;
pub use security_event_repo::SecurityEventRepo;
pub use session_repo::SessionRepo;
pub use system_health_repo::SystemHealthRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
