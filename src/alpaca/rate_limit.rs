//! Parsing of the `X-RateLimit-*` response headers.

use reqwest::header::HeaderMap;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";

/// What a single rate-limit header held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitHeader {
    Absent,
    Value(i64),
    Invalid(String),
}

/// Reads header `name` as a decimal integer.
///
/// A header that is present but blank counts as absent.
pub fn parse_header(headers: &HeaderMap, name: &str) -> RateLimitHeader {
    let Some(raw) = headers.get(name) else {
        return RateLimitHeader::Absent;
    };
    let text = String::from_utf8_lossy(raw.as_bytes());
    if text.trim().is_empty() {
        return RateLimitHeader::Absent;
    }
    match text.parse::<i64>() {
        Ok(value) => RateLimitHeader::Value(value),
        Err(_) => RateLimitHeader::Invalid(text.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn missing_header_is_absent() {
        assert_eq!(
            parse_header(&headers(&[]), REMAINING_HEADER),
            RateLimitHeader::Absent
        );
    }

    #[test]
    fn empty_header_is_absent() {
        let map = headers(&[(REMAINING_HEADER, ""), (LIMIT_HEADER, "  ")]);
        assert_eq!(parse_header(&map, REMAINING_HEADER), RateLimitHeader::Absent);
        assert_eq!(parse_header(&map, LIMIT_HEADER), RateLimitHeader::Absent);
    }

    #[test]
    fn numeric_header_is_parsed() {
        let map = headers(&[(REMAINING_HEADER, "199"), (LIMIT_HEADER, "200")]);
        assert_eq!(parse_header(&map, REMAINING_HEADER), RateLimitHeader::Value(199));
        assert_eq!(parse_header(&map, LIMIT_HEADER), RateLimitHeader::Value(200));
    }

    #[test]
    fn lookup_ignores_header_name_case() {
        let map = headers(&[(REMAINING_HEADER, "7")]);
        assert_eq!(
            parse_header(&map, "X-RateLimit-Remaining"),
            RateLimitHeader::Value(7)
        );
    }

    #[test]
    fn non_numeric_header_keeps_raw_text() {
        let map = headers(&[(REMAINING_HEADER, "abc")]);
        assert_eq!(
            parse_header(&map, REMAINING_HEADER),
            RateLimitHeader::Invalid("abc".to_string())
        );
    }

    #[test]
    fn fractional_value_is_invalid() {
        let map = headers(&[(LIMIT_HEADER, "12.5")]);
        assert!(matches!(
            parse_header(&map, LIMIT_HEADER),
            RateLimitHeader::Invalid(_)
        ));
    }
}
