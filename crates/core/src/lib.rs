//! Domain types and pure logic for the CMS admin backend.
//!
//! Nothing in this crate performs I/O. Repositories and handlers call into
//! it for validation, slug generation, CSV encoding, menu reconciliation
//! planning, category-tree checks and the content-analysis helpers.

pub mod bulk;
pub mod categorization;
pub mod category_csv;
pub mod content_gap;
pub mod dashboard_settings;
pub mod error;
pub mod hierarchy;
pub mod menu;
pub mod pagination;
pub mod post;
pub mod roles;
pub mod seo;
pub mod slug;
pub mod traffic;
pub mod types;
