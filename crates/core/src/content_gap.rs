//! Content gap detection over category and tag coverage counts.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

pub const DEFAULT_MIN_POSTS: i64 = 3;
pub const DEFAULT_STALE_DAYS: i64 = 90;

/// Analysis thresholds, usually taken from query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GapThresholds {
    #[serde(default = "default_min_posts")]
    pub min_posts: i64,
    #[serde(default = "default_stale_days")]
    pub stale_days: i64,
}

fn default_min_posts() -> i64 {
    DEFAULT_MIN_POSTS
}

fn default_stale_days() -> i64 {
    DEFAULT_STALE_DAYS
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self {
            min_posts: DEFAULT_MIN_POSTS,
            stale_days: DEFAULT_STALE_DAYS,
        }
    }
}

/// Published-post coverage for one active category.
#[derive(Debug, Clone)]
pub struct CategoryCoverage {
    pub category_id: DbId,
    pub name: String,
    pub slug: String,
    pub published_posts: i64,
    pub last_published_at: Option<Timestamp>,
}

/// Post usage of one tag.
#[derive(Debug, Clone)]
pub struct TagUsage {
    pub tag_id: DbId,
    pub name: String,
    pub slug: String,
    pub posts_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    EmptyCategory,
    ThinCategory,
    StaleCategory,
    UnusedTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentGap {
    pub kind: GapKind,
    pub priority: GapPriority,
    pub entity_id: DbId,
    pub name: String,
    pub slug: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Find coverage gaps. Results are sorted by priority, highest first.
///
/// A category with zero published posts is reported once as empty; a
/// category below `min_posts` is thin, and one whose newest post is older
/// than `stale_days` is also reported as stale.
pub fn find_gaps(
    categories: &[CategoryCoverage],
    tags: &[TagUsage],
    thresholds: GapThresholds,
    now: Timestamp,
) -> Vec<ContentGap> {
    let mut gaps = Vec::new();
    let stale_cutoff = now - chrono::Duration::days(thresholds.stale_days.max(0));

    for c in categories {
        if c.published_posts == 0 {
            gaps.push(ContentGap {
                kind: GapKind::EmptyCategory,
                priority: GapPriority::High,
                entity_id: c.category_id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                message: format!("Category '{}' has no published posts", c.name),
            });
            continue;
        }

        if c.published_posts < thresholds.min_posts {
            gaps.push(ContentGap {
                kind: GapKind::ThinCategory,
                priority: GapPriority::Medium,
                entity_id: c.category_id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                message: format!(
                    "Category '{}' has {} published posts (target {})",
                    c.name, c.published_posts, thresholds.min_posts
                ),
            });
        }

        if let Some(last) = c.last_published_at {
            if last < stale_cutoff {
                let days = (now - last).num_days();
                gaps.push(ContentGap {
                    kind: GapKind::StaleCategory,
                    priority: GapPriority::Medium,
                    entity_id: c.category_id,
                    name: c.name.clone(),
                    slug: c.slug.clone(),
                    message: format!("Category '{}' has not had a new post in {days} days", c.name),
                });
            }
        }
    }

    for t in tags.iter().filter(|t| t.posts_count == 0) {
        gaps.push(ContentGap {
            kind: GapKind::UnusedTag,
            priority: GapPriority::Low,
            entity_id: t.tag_id,
            name: t.name.clone(),
            slug: t.slug.clone(),
            message: format!("Tag '{}' is not used by any post", t.name),
        });
    }

    // Stable sort keeps input order within a priority.
    gaps.sort_by(|a, b| b.priority.cmp(&a.priority));
    gaps
}

pub fn summarize(gaps: &[ContentGap]) -> GapSummary {
    let mut summary = GapSummary {
        total: gaps.len(),
        ..GapSummary::default()
    };
    for g in gaps {
        match g.priority {
            GapPriority::High => summary.high += 1,
            GapPriority::Medium => summary.medium += 1,
            GapPriority::Low => summary.low += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn cat(id: DbId, posts: i64, last: Option<Timestamp>) -> CategoryCoverage {
        CategoryCoverage {
            category_id: id,
            name: format!("Cat {id}"),
            slug: format!("cat-{id}"),
            published_posts: posts,
            last_published_at: last,
        }
    }

    #[test]
    fn classifies_empty_thin_and_stale() {
        let now = Utc::now();
        let categories = vec![
            cat(1, 0, None),
            cat(2, 1, Some(now - Duration::days(2))),
            cat(3, 10, Some(now - Duration::days(200))),
            cat(4, 10, Some(now - Duration::days(1))),
        ];
        let gaps = find_gaps(&categories, &[], GapThresholds::default(), now);

        let kinds: Vec<(DbId, GapKind)> = gaps.iter().map(|g| (g.entity_id, g.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, GapKind::EmptyCategory),
                (2, GapKind::ThinCategory),
                (3, GapKind::StaleCategory),
            ]
        );
    }

    #[test]
    fn unused_tags_are_low_priority_and_last() {
        let tags = vec![
            TagUsage { tag_id: 9, name: "old".into(), slug: "old".into(), posts_count: 0 },
            TagUsage { tag_id: 10, name: "hot".into(), slug: "hot".into(), posts_count: 4 },
        ];
        let gaps = find_gaps(&[cat(1, 0, None)], &tags, GapThresholds::default(), Utc::now());

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[1].kind, GapKind::UnusedTag);
        assert_eq!(gaps[1].entity_id, 9);

        let summary = summarize(&gaps);
        assert_eq!(summary, GapSummary { total: 2, high: 1, medium: 0, low: 1 });
    }

    #[test]
    fn thresholds_are_respected() {
        let now = Utc::now();
        let thresholds = GapThresholds { min_posts: 1, stale_days: 365 };
        let gaps = find_gaps(&[cat(1, 1, Some(now - Duration::days(200)))], &[], thresholds, now);
        assert!(gaps.is_empty());
    }
}
