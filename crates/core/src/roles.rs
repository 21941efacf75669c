//! Well-known role name constants.
//!
//! These must match the seed data in `20261001000002_create_users_and_sessions.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_AUTHOR: &str = "author";

/// Whether the role may change shared site structure (taxonomy, menus).
pub fn can_manage_structure(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}
