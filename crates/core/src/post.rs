//! Post status names and the few rules attached to them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum title length for posts.
pub const MAX_TITLE_LEN: usize = 200;

/// Publication state of a post.
///
/// Discriminants match the seed order of the `post_statuses` lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft = 1,
    Published = 2,
    Scheduled = 3,
    Archived = 4,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Published,
        PostStatus::Scheduled,
        PostStatus::Archived,
    ];

    /// Database status id.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Scheduled => "SCHEDULED",
            PostStatus::Archived => "ARCHIVED",
        }
    }

    /// Parse a status name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "Invalid post status '{name}'. Must be one of: DRAFT, PUBLISHED, SCHEDULED, ARCHIVED"
                ))
            })
    }
}

/// Validate a post title (non-blank, bounded).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("Title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// A scheduled post needs a publication time in the future.
pub fn validate_schedule(
    status: PostStatus,
    scheduled_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    if status != PostStatus::Scheduled {
        return Ok(());
    }
    match scheduled_at {
        None => Err(CoreError::validation("Scheduled posts require scheduled_at")),
        Some(at) if at <= now => Err(CoreError::validation(
            "scheduled_at must be in the future",
        )),
        Some(_) => Ok(()),
    }
}

/// `published_at` to store after a status change.
///
/// Publishing stamps `now` unless a timestamp already exists; other
/// statuses keep whatever was stored.
pub fn resolve_published_at(
    status: PostStatus,
    current: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match (status, current) {
        (PostStatus::Published, None) => Some(now),
        (_, existing) => existing,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn status_ids_round_trip() {
        for s in PostStatus::ALL {
            assert_eq!(PostStatus::from_id(s.id()), Some(s));
        }
        assert_eq!(PostStatus::from_id(9), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(PostStatus::parse("published").unwrap(), PostStatus::Published);
        assert_eq!(PostStatus::parse("DRAFT").unwrap(), PostStatus::Draft);
        assert!(PostStatus::parse("deleted").is_err());
    }

    #[test]
    fn serde_uses_upper_case_names() {
        assert_eq!(serde_json::to_string(&PostStatus::Scheduled).unwrap(), "\"SCHEDULED\"");
    }

    #[test]
    fn schedule_requires_future_time() {
        let now = Utc::now();
        assert!(validate_schedule(PostStatus::Draft, None, now).is_ok());
        assert!(validate_schedule(PostStatus::Scheduled, None, now).is_err());
        assert!(validate_schedule(PostStatus::Scheduled, Some(now - Duration::hours(1)), now).is_err());
        assert!(validate_schedule(PostStatus::Scheduled, Some(now + Duration::hours(1)), now).is_ok());
    }

    #[test]
    fn publishing_stamps_once() {
        let now = Utc::now();
        let earlier = now - Duration::days(3);
        assert_eq!(resolve_published_at(PostStatus::Published, None, now), Some(now));
        assert_eq!(resolve_published_at(PostStatus::Published, Some(earlier), now), Some(earlier));
        assert_eq!(resolve_published_at(PostStatus::Draft, None, now), None);
    }

    #[test]
    fn title_validation() {
        assert!(validate_title("Hello").is_ok());
        assert!(validate_title(" ").is_err());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }
}
