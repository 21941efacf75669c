//! On-page SEO analysis for posts.
//!
//! Produces a list of checks with pass/warning/fail status and an overall
//! score. Thresholds follow common search-snippet limits.

use serde::{Deserialize, Serialize};

use crate::categorization::tokenize;
use crate::slug::validate_slug;

pub const TITLE_MIN: usize = 30;
pub const TITLE_MAX: usize = 60;
pub const META_MIN: usize = 120;
pub const META_MAX: usize = 160;
pub const MIN_WORDS: usize = 300;
pub const SLUG_MAX: usize = 75;
/// Keyword density bounds, in percent.
pub const DENSITY_MIN: f64 = 0.5;
pub const DENSITY_MAX: f64 = 2.5;

/// What gets analyzed. Post handlers build this from a stored row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoInput {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    fn points(self) -> u32 {
        match self {
            CheckStatus::Pass => 2,
            CheckStatus::Warning => 1,
            CheckStatus::Fail => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoCheck {
    pub key: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoReport {
    /// 0..=100.
    pub score: u32,
    pub word_count: usize,
    /// Percent of words that belong to the focus keyword, if one is set.
    pub keyword_density: Option<f64>,
    pub checks: Vec<SeoCheck>,
}

/// Run every check against `input`.
pub fn analyze(input: &SeoInput) -> SeoReport {
    let words = tokenize(&input.content);
    let word_count = words.len();
    let effective_title = input
        .meta_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&input.title);

    let mut checks = vec![
        check_title(effective_title),
        check_meta_description(input.meta_description.as_deref()),
        check_slug(&input.slug),
        check_word_count(word_count),
    ];

    let keyword = input
        .focus_keyword
        .as_deref()
        .map(tokenize)
        .filter(|k| !k.is_empty());

    let keyword_density = match keyword {
        None => {
            checks.push(SeoCheck {
                key: "focus_keyword",
                status: CheckStatus::Warning,
                message: "No focus keyword set".into(),
            });
            None
        }
        Some(kw) => {
            let density = keyword_density(&words, &kw);
            checks.push(check_keyword_in(
                "keyword_in_title",
                "title",
                &tokenize(effective_title),
                &kw,
            ));
            checks.push(check_keyword_in(
                "keyword_in_meta_description",
                "meta description",
                &tokenize(input.meta_description.as_deref().unwrap_or("")),
                &kw,
            ));
            checks.push(check_keyword_in(
                "keyword_in_introduction",
                "first paragraph",
                &words[..words.len().min(100)],
                &kw,
            ));
            checks.push(check_density(density));
            Some(density)
        }
    };

    let earned: u32 = checks.iter().map(|c| c.status.points()).sum();
    let possible = (checks.len() as u32) * CheckStatus::Pass.points();
    let score = if possible == 0 {
        0
    } else {
        (earned * 100 + possible / 2) / possible
    };

    SeoReport {
        score,
        word_count,
        keyword_density,
        checks,
    }
}

fn check_title(title: &str) -> SeoCheck {
    let len = title.trim().chars().count();
    let (status, message) = if len == 0 {
        (CheckStatus::Fail, "Title is missing".to_string())
    } else if len < TITLE_MIN {
        (
            CheckStatus::Warning,
            format!("Title is {len} characters; aim for {TITLE_MIN}-{TITLE_MAX}"),
        )
    } else if len > TITLE_MAX {
        (
            CheckStatus::Warning,
            format!("Title is {len} characters and may be truncated (max {TITLE_MAX})"),
        )
    } else {
        (CheckStatus::Pass, format!("Title length ({len}) is good"))
    };
    SeoCheck {
        key: "title_length",
        status,
        message,
    }
}

fn check_meta_description(meta: Option<&str>) -> SeoCheck {
    let len = meta.map(|m| m.trim().chars().count()).unwrap_or(0);
    let (status, message) = if len == 0 {
        (CheckStatus::Fail, "Meta description is missing".to_string())
    } else if len < META_MIN {
        (
            CheckStatus::Warning,
            format!("Meta description is {len} characters; aim for {META_MIN}-{META_MAX}"),
        )
    } else if len > META_MAX {
        (
            CheckStatus::Warning,
            format!("Meta description is {len} characters and may be truncated (max {META_MAX})"),
        )
    } else {
        (CheckStatus::Pass, format!("Meta description length ({len}) is good"))
    };
    SeoCheck {
        key: "meta_description_length",
        status,
        message,
    }
}

fn check_slug(slug: &str) -> SeoCheck {
    let (status, message) = if validate_slug(slug).is_err() {
        (CheckStatus::Fail, "Slug is missing or not URL-safe".to_string())
    } else if slug.len() > SLUG_MAX {
        (
            CheckStatus::Warning,
            format!("Slug is {} characters; keep it under {SLUG_MAX}", slug.len()),
        )
    } else {
        (CheckStatus::Pass, "Slug is URL-friendly".to_string())
    };
    SeoCheck {
        key: "slug",
        status,
        message,
    }
}

fn check_word_count(count: usize) -> SeoCheck {
    let (status, message) = if count == 0 {
        (CheckStatus::Fail, "Content is empty".to_string())
    } else if count < MIN_WORDS {
        (
            CheckStatus::Warning,
            format!("Content has {count} words; aim for at least {MIN_WORDS}"),
        )
    } else {
        (CheckStatus::Pass, format!("Content has {count} words"))
    };
    SeoCheck {
        key: "word_count",
        status,
        message,
    }
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|w| w == phrase)
}

fn check_keyword_in(
    key: &'static str,
    label: &str,
    tokens: &[String],
    keyword: &[String],
) -> SeoCheck {
    if contains_phrase(tokens, keyword) {
        SeoCheck {
            key,
            status: CheckStatus::Pass,
            message: format!("Focus keyword appears in the {label}"),
        }
    } else {
        SeoCheck {
            key,
            status: CheckStatus::Fail,
            message: format!("Focus keyword does not appear in the {label}"),
        }
    }
}

/// Percentage of content words covered by non-overlapping occurrences of
/// `keyword`. Never exceeds 100.
pub fn keyword_density(words: &[String], keyword: &[String]) -> f64 {
    if words.is_empty() || keyword.is_empty() || keyword.len() > words.len() {
        return 0.0;
    }
    let mut hits = 0;
    let mut i = 0;
    while i + keyword.len() <= words.len() {
        if words[i..i + keyword.len()] == *keyword {
            hits += 1;
            i += keyword.len();
        } else {
            i += 1;
        }
    }
    (hits * keyword.len()) as f64 * 100.0 / words.len() as f64
}

fn check_density(density: f64) -> SeoCheck {
    let (status, message) = if density == 0.0 {
        (CheckStatus::Fail, "Focus keyword does not appear in the content".to_string())
    } else if density < DENSITY_MIN {
        (
            CheckStatus::Warning,
            format!("Keyword density {density:.2}% is low (aim for {DENSITY_MIN}-{DENSITY_MAX}%)"),
        )
    } else if density > DENSITY_MAX {
        (
            CheckStatus::Warning,
            format!("Keyword density {density:.2}% is high (aim for {DENSITY_MIN}-{DENSITY_MAX}%)"),
        )
    } else {
        (CheckStatus::Pass, format!("Keyword density {density:.2}% is good"))
    };
    SeoCheck {
        key: "keyword_density",
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(report: &'a SeoReport, key: &str) -> &'a SeoCheck {
        report.checks.iter().find(|c| c.key == key).unwrap()
    }

    fn words(n: usize, filler: &str) -> String {
        vec![filler; n].join(" ")
    }

    #[test]
    fn empty_post_scores_low() {
        let report = analyze(&SeoInput::default());
        assert_eq!(find(&report, "title_length").status, CheckStatus::Fail);
        assert_eq!(find(&report, "word_count").status, CheckStatus::Fail);
        assert_eq!(report.keyword_density, None);
        assert!(report.score < 20);
    }

    #[test]
    fn well_formed_post_scores_full() {
        let mut content = format!("Rust ownership explained. {}", words(310, "filler"));
        content.push_str(" rust ownership rust ownership");
        let input = SeoInput {
            title: "Rust Ownership: A Practical Guide for Beginners".into(),
            slug: "rust-ownership-guide".into(),
            meta_title: None,
            meta_description: Some(format!(
                "Learn rust ownership with examples. {}",
                "x".repeat(100)
            )),
            focus_keyword: Some("Rust ownership".into()),
            content,
        };
        let report = analyze(&input);

        for check in &report.checks {
            assert_eq!(check.status, CheckStatus::Pass, "{}: {}", check.key, check.message);
        }
        assert_eq!(report.score, 100);
        assert!(report.keyword_density.unwrap() > DENSITY_MIN);
    }

    #[test]
    fn meta_title_overrides_title() {
        let input = SeoInput {
            title: "Short".into(),
            meta_title: Some("A considerably longer meta title for search".into()),
            ..SeoInput::default()
        };
        assert_eq!(find(&analyze(&input), "title_length").status, CheckStatus::Pass);
    }

    #[test]
    fn density_counts_phrase_words() {
        let w: Vec<String> = "a b a b c".split(' ').map(String::from).collect();
        let k: Vec<String> = vec!["a".into(), "b".into()];
        assert!((keyword_density(&w, &k) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_matches_count_once() {
        let w: Vec<String> = "a a a".split(' ').map(String::from).collect();
        let k: Vec<String> = vec!["a".into(), "a".into()];
        assert!((keyword_density(&w, &k) - 200.0 / 3.0).abs() < 1e-9);
        assert!(keyword_density(&w, &w) <= 100.0);
    }

    #[test]
    fn stuffed_keyword_warns() {
        let input = SeoInput {
            title: "x".into(),
            focus_keyword: Some("spam".into()),
            content: words(50, "spam"),
            ..SeoInput::default()
        };
        assert_eq!(find(&analyze(&input), "keyword_density").status, CheckStatus::Warning);
    }
}
