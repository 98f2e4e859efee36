//! Lexical helpers: the case-sensitive token tables and the small anchored
//! recognizers shared by the selector parsers.

/// Weekday abbreviations, Monday first — bit 0 of a weekday selector.
pub const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Month abbreviations, January first.
pub const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Full month names, for diagnostics.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Upper day-of-month bound per month. February allows 29: leap days are
/// accepted, real-calendar validation is out of scope.
pub const MONTH_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Month index (0-based) when `s` starts with a month abbreviation that is
/// not the prefix of a longer word.
pub fn month_id(s: &str) -> Option<usize> {
    if s.as_bytes().get(3).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    MONTHS.iter().position(|m| s.starts_with(m))
}

/// Weekday index (0-based, Monday first) under the same anchoring contract
/// as [`month_id`].
pub fn weekday_id(s: &str) -> Option<usize> {
    if s.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    WEEKDAYS.iter().position(|w| s.starts_with(w))
}

/// Exactly four digits, not followed by a fifth.
pub fn at_year(s: &str) -> bool {
    regex!(r"^[0-9]{4}([^0-9]|$)").is_match(s)
}

/// `- YYYY` continuation of a year range, spaces tolerated.
pub fn at_year_range_tail(s: &str) -> bool {
    regex!(r"^ *- *[0-9]{4}([^0-9]|$)").is_match(s)
}

/// Byte length of a leading quoted comment, when it is closed. The quotes
/// are included in the length; the text is everything between them.
pub fn quoted_comment(s: &str) -> Option<usize> {
    regex!("^\"[^\"]*\"").find(s).map(|m| m.end())
}

/// Truncate an annotation to the storage bound, on a character boundary.
pub fn clamp_comment(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_tokens_are_anchored_and_case_sensitive() {
        assert_eq!(month_id("Mar 06"), Some(2));
        assert_eq!(month_id("Dec"), Some(11));
        assert_eq!(month_id("March"), None, "longer word");
        assert_eq!(month_id("mar"), None, "case matters");
        assert_eq!(month_id("toto"), None);
    }

    #[test]
    fn weekday_tokens_are_anchored() {
        assert_eq!(weekday_id("Mo-Fr"), Some(0));
        assert_eq!(weekday_id("Su"), Some(6));
        assert_eq!(weekday_id("Sun"), None);
        assert_eq!(weekday_id("Ta"), None);
    }

    #[test]
    fn year_recognizer_wants_exactly_four_digits() {
        assert!(at_year("2016 Mar"));
        assert!(at_year("2016"));
        assert!(!at_year("20161"));
        assert!(!at_year("216"));
        assert!(at_year_range_tail(" - 2020,"));
        assert!(!at_year_range_tail("- 20"));
    }

    #[test]
    fn quoted_comment_needs_the_closing_quote() {
        assert_eq!(quoted_comment("\"on demand\": rest"), Some(11));
        assert_eq!(quoted_comment("\"\""), Some(2));
        assert_eq!(quoted_comment("\"dangling"), None);
        assert_eq!(quoted_comment("plain"), None);
    }

    #[test]
    fn comments_are_clamped_on_char_boundaries() {
        assert_eq!(clamp_comment("short", 128), "short");
        assert_eq!(clamp_comment("héllo", 2), "h");
    }
}
