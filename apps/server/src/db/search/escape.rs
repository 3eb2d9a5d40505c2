//! Escaping for user text placed inside SQL patterns.

/// Escape LIKE meta-characters so user input matches literally (`ESCAPE '\'`).
pub(crate) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// `%value%` pattern for a case-insensitive substring match.
pub(crate) fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like_pattern(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like_pattern("100%_CASH\\"), "100\\%\\_CASH\\\\");
        assert_eq!(escape_like_pattern("apple"), "apple");
    }

    #[test]
    fn contains_pattern_wraps_value() {
        assert_eq!(contains_pattern("AAPL"), "%AAPL%");
        assert_eq!(contains_pattern("5%"), "%5\\%%");
    }
}
