//! Slug generation and shared field validation for taxonomy and content.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length of a display name (tags, categories, menus).
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a slug.
pub const MAX_SLUG_LEN: usize = 160;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

/// Generate a URL-safe slug from a display name or title.
///
/// Lowercases, replaces every non-alphanumeric run with a single hyphen and
/// trims hyphens at both ends. Non-ASCII letters are dropped.
pub fn generate_slug(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_hyphen = true;

    for c in input.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    let trimmed = result.trim_end_matches('-');
    trimmed.chars().take(MAX_SLUG_LEN).collect::<String>().trim_end_matches('-').to_string()
}

/// Use the explicit slug when present and non-blank, otherwise derive one.
pub fn slug_or_generate(explicit: Option<&str>, source: &str) -> String {
    match explicit.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => generate_slug(source),
    }
}

/// Validate a slug: non-empty, lowercase alphanumeric and single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::validation("Slug must not be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens",
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::validation(
            "Slug must not start or end with a hyphen or contain consecutive hyphens",
        ));
    }
    Ok(())
}

/// Validate a display name (non-blank, bounded length).
pub fn validate_name(field: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} must not be empty")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an optional `#RGB` / `#RRGGBB` color code.
pub fn validate_color(color: Option<&str>) -> Result<(), CoreError> {
    match color {
        Some(c) if !HEX_COLOR.is_match(c) => Err(CoreError::validation(format!(
            "Invalid color '{c}'. Expected #RGB or #RRGGBB"
        ))),
        _ => Ok(()),
    }
}
