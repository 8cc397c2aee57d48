//! Query string parsing.

use std::collections::HashMap;

/// Parses a form-urlencoded query string. Later duplicates win.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_flags() {
        let q = parse_query("a=1&flag&b=two%20words");
        assert_eq!(q.get("a").map(String::as_str), Some("1"));
        assert_eq!(q.get("flag").map(String::as_str), Some(""));
        assert_eq!(q.get("b").map(String::as_str), Some("two words"));
    }

    #[test]
    fn last_duplicate_wins() {
        let q = parse_query("k=1&k=2");
        assert_eq!(q.get("k").map(String::as_str), Some("2"));
    }

    #[test]
    fn empty_and_leading_question_mark() {
        assert!(parse_query("").is_empty());
        assert_eq!(parse_query("?x=y").get("x").map(String::as_str), Some("y"));
    }
}
