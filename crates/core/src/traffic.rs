//! Referrer classification for recorded page views.

use serde::{Deserialize, Serialize};

/// Where a visit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficSource {
    Direct,
    Search,
    Social,
    Referral,
    Internal,
}

impl TrafficSource {
    pub const ALL: [TrafficSource; 5] = [
        TrafficSource::Direct,
        TrafficSource::Search,
        TrafficSource::Social,
        TrafficSource::Referral,
        TrafficSource::Internal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficSource::Direct => "direct",
            TrafficSource::Search => "search",
            TrafficSource::Social => "social",
            TrafficSource::Referral => "referral",
            TrafficSource::Internal => "internal",
        }
    }
}

/// Registrable-name fragments of major search engines.
const SEARCH_ENGINES: &[&str] = &[
    "google", "bing", "yahoo", "duckduckgo", "baidu", "yandex", "ecosia", "startpage",
];

const SOCIAL_NETWORKS: &[&str] = &[
    "facebook.com",
    "fb.com",
    "twitter.com",
    "t.co",
    "x.com",
    "linkedin.com",
    "lnkd.in",
    "instagram.com",
    "pinterest.com",
    "reddit.com",
    "youtube.com",
    "tiktok.com",
    "mastodon.social",
];

/// Extract the lowercase host from a referrer URL, without port or `www.`.
pub fn referrer_host(referrer: &str) -> Option<String> {
    let rest = referrer.trim();
    let rest = rest.split_once("://").map(|(_, r)| r).unwrap_or(rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Classify a referrer. `site_host` identifies links from this site.
pub fn classify_referrer(referrer: Option<&str>, site_host: Option<&str>) -> TrafficSource {
    let Some(host) = referrer.and_then(referrer_host) else {
        return TrafficSource::Direct;
    };

    if let Some(site) = site_host.and_then(referrer_host) {
        if host_matches(&host, &site) {
            return TrafficSource::Internal;
        }
    }

    if SOCIAL_NETWORKS.iter().any(|d| host_matches(&host, d)) {
        return TrafficSource::Social;
    }

    let is_search = host.split('.').any(|label| SEARCH_ENGINES.contains(&label));
    if is_search {
        return TrafficSource::Search;
    }

    TrafficSource::Referral
}

/// Share of `part` in `total`, as a percentage rounded to one decimal.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_referrer_is_direct() {
        assert_eq!(classify_referrer(None, None), TrafficSource::Direct);
        assert_eq!(classify_referrer(Some("  "), None), TrafficSource::Direct);
    }

    #[test]
    fn search_and_social_hosts() {
        assert_eq!(
            classify_referrer(Some("https://www.google.co.uk/search?q=rust"), None),
            TrafficSource::Search
        );
        assert_eq!(
            classify_referrer(Some("https://duckduckgo.com/"), None),
            TrafficSource::Search
        );
        assert_eq!(
            classify_referrer(Some("https://m.facebook.com/story"), None),
            TrafficSource::Social
        );
        assert_eq!(classify_referrer(Some("https://t.co/abc"), None), TrafficSource::Social);
    }

    #[test]
    fn own_site_is_internal() {
        assert_eq!(
            classify_referrer(Some("https://blog.example.com/posts/1"), Some("example.com")),
            TrafficSource::Internal
        );
        assert_eq!(
            classify_referrer(Some("https://notexample.com/"), Some("example.com")),
            TrafficSource::Referral
        );
    }

    #[test]
    fn host_extraction_strips_noise() {
        assert_eq!(
            referrer_host("HTTP://user@WWW.Example.com:8080/path").as_deref(),
            Some("example.com")
        );
        assert_eq!(referrer_host("example.org").as_deref(), Some("example.org"));
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(2, 2), 100.0);
    }
}
