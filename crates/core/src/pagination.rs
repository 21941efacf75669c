//! Limit/offset clamping and LIKE-pattern escaping for list endpoints.

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` substring pattern, escaping `%`, `_` and `\`.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 20);
        assert_eq!(clamp_limit(Some(0), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 1);
        assert_eq!(clamp_limit(Some(5000), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 100);
        assert_eq!(clamp_offset(Some(-3)), 0);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern(" news "), "%news%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
