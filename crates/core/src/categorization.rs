//! Keyword-rule category suggestions.
//!
//! Each active rule lists keywords for one category. Content is tokenized
//! into lowercase words; a keyword (single word or phrase) matches on word
//! boundaries. Title matches count double. Scores are summed per category
//! and normalized into a confidence against the best-scoring category, so
//! the top suggestion always has confidence 1.0. Auto-apply therefore also
//! requires an absolute minimum score.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Weight multiplier for keyword hits in the title.
pub const TITLE_MULTIPLIER: u64 = 2;

/// Default confidence threshold used when auto-applying suggestions.
pub const DEFAULT_APPLY_THRESHOLD: f64 = 0.6;

/// Default minimum score for auto-applying a suggestion: one title hit, or
/// two content hits, of a weight-1 rule.
pub const DEFAULT_MIN_APPLY_SCORE: u64 = 2;

/// Maximum keywords per rule.
pub const MAX_KEYWORDS: usize = 50;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Which part of a post a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Title,
    Content,
    #[default]
    Any,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Content => "content",
            MatchField::Any => "any",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "title" => Ok(MatchField::Title),
            "content" => Ok(MatchField::Content),
            "any" => Ok(MatchField::Any),
            other => Err(CoreError::validation(format!(
                "Invalid match_field '{other}'. Must be one of: title, content, any"
            ))),
        }
    }
}

/// The scoring view of a stored rule.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub category_id: DbId,
    pub keywords: Vec<String>,
    pub match_field: MatchField,
    pub weight: u32,
}

/// A scored category suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySuggestion {
    pub category_id: DbId,
    pub score: u64,
    /// Score relative to the best suggestion, in `[0, 1]`.
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// Validate and normalize rule keywords (trimmed, lowercased, deduplicated).
pub fn normalize_keywords(keywords: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        let k = tokenize(k).join(" ");
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    if out.is_empty() {
        return Err(CoreError::validation("A rule needs at least one keyword"));
    }
    if out.len() > MAX_KEYWORDS {
        return Err(CoreError::validation(format!(
            "A rule may have at most {MAX_KEYWORDS} keywords"
        )));
    }
    Ok(out)
}

/// Lowercase word tokens of `text`, with HTML tags removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let stripped = TAG.replace_all(text, " ");
    WORD.find_iter(&stripped)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Count non-overlapping occurrences of `phrase` (pre-tokenized) in `tokens`.
fn count_phrase(tokens: &[String], phrase: &[&str]) -> u64 {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return 0;
    }
    let mut count = 0;
    let mut i = 0;
    while i + phrase.len() <= tokens.len() {
        if tokens[i..i + phrase.len()]
            .iter()
            .zip(phrase)
            .all(|(t, p)| t == p)
        {
            count += 1;
            i += phrase.len();
        } else {
            i += 1;
        }
    }
    count
}

/// Score `title` and `content` against `rules`, best first.
///
/// Categories with no keyword hits are omitted. Ties are broken by
/// category id for a stable order.
pub fn suggest_categories(
    title: &str,
    content: &str,
    rules: &[KeywordRule],
) -> Vec<CategorySuggestion> {
    let title_tokens = tokenize(title);
    let content_tokens = tokenize(content);

    let mut scores: BTreeMap<DbId, (u64, Vec<String>)> = BTreeMap::new();

    for rule in rules {
        for keyword in &rule.keywords {
            let phrase: Vec<&str> = keyword.split_whitespace().collect();
            let title_hits = match rule.match_field {
                MatchField::Title | MatchField::Any => count_phrase(&title_tokens, &phrase),
                MatchField::Content => 0,
            };
            let content_hits = match rule.match_field {
                MatchField::Content | MatchField::Any => count_phrase(&content_tokens, &phrase),
                MatchField::Title => 0,
            };

            let points = title_hits
                .saturating_mul(TITLE_MULTIPLIER)
                .saturating_add(content_hits)
                .saturating_mul(u64::from(rule.weight));
            if points == 0 {
                continue;
            }

            let entry = scores.entry(rule.category_id).or_default();
            entry.0 = entry.0.saturating_add(points);
            if !entry.1.contains(keyword) {
                entry.1.push(keyword.clone());
            }
        }
    }

    let best = scores.values().map(|(s, _)| *s).max().unwrap_or(0);

    let mut suggestions: Vec<CategorySuggestion> = scores
        .into_iter()
        .map(|(category_id, (score, matched_keywords))| CategorySuggestion {
            category_id,
            score,
            confidence: if best == 0 {
                0.0
            } else {
                score as f64 / best as f64
            },
            matched_keywords,
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score).then(a.category_id.cmp(&b.category_id)));
    suggestions
}

/// Suggestions eligible for auto-apply: confidence at least `threshold`
/// and score at least `min_score`.
pub fn select_for_apply(
    suggestions: Vec<CategorySuggestion>,
    threshold: f64,
    min_score: u64,
) -> Vec<CategorySuggestion> {
    suggestions
        .into_iter()
        .filter(|s| s.confidence >= threshold && s.score >= min_score)
        .collect()
}
