//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the user behind a valid Bearer token.
//! - [`rbac::RequireAdmin`] -- `admin` only.
//! - [`rbac::RequireEditor`] -- `editor` or `admin`.

pub mod auth;
pub mod rbac;
