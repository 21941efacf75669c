//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod category;
pub mod category_rule;
pub mod category_template;
pub mod dashboard;
pub mod dashboard_settings;
pub mod menu;
pub mod notification;
pub mod page;
pub mod page_view;
pub mod post;
pub mod role;
pub mod security_event;
pub mod session;
pub mod system_health;
pub mod tag;
pub mod user;
