//! Target URL construction.
//!
//! The raw query string is appended byte-for-byte. It is never parsed,
//! re-encoded or re-ordered: some backends care about parameter order and
//! encoding.

/// Build the backend URL for one call.
///
/// `base` is a validated base URL, `suffix` a literal path tail, and
/// `raw_query` the inbound query string when the operation forwards it.
pub fn build(base: &str, suffix: Option<&str>, raw_query: Option<&str>) -> String {
    let capacity = base.len()
        + suffix.map_or(0, str::len)
        + raw_query.map_or(0, |q| q.len() + 1);

    let mut url = String::with_capacity(capacity);
    url.push_str(base);
    if let Some(suffix) = suffix {
        url.push_str(suffix);
    }
    if let Some(query) = raw_query {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8082/api/todos";

    #[test]
    fn base_only() {
        assert_eq!(build(BASE, None, None), BASE);
    }

    #[test]
    fn appends_suffix() {
        assert_eq!(build(BASE, Some("/1002"), None), "http://localhost:8082/api/todos/1002");
    }

    #[test]
    fn appends_query_verbatim() {
        assert_eq!(
            build(BASE, None, Some("pageSize=10")),
            "http://localhost:8082/api/todos?pageSize=10"
        );
        // Order and encoding survive untouched.
        assert_eq!(
            build(BASE, Some("/getTotalCategory"), Some("b=2&a=%20x+y&a=1")),
            "http://localhost:8082/api/todos/getTotalCategory?b=2&a=%20x+y&a=1"
        );
    }

    #[test]
    fn empty_query_still_gets_separator() {
        assert_eq!(build(BASE, None, Some("")), "http://localhost:8082/api/todos?");
    }

    #[test]
    fn is_deterministic() {
        let first = build(BASE, Some("/7"), Some("x=1"));
        let second = build(BASE, Some("/7"), Some("x=1"));
        assert_eq!(first, second);
    }
}
