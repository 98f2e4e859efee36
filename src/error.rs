//! Parse error taxonomy.
//!
//! A selector parser either matches, reports that its nonterminal is absent,
//! or fails with a [`ParseError`]. Failure is never recovered locally: the
//! whole build is discarded and the error carries the byte offset of the
//! offending token so callers can render a caret diagnostic against the
//! original input.

use thiserror::Error;

use crate::bitvec::AllocError;

/// What went wrong, one variant per diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty element in a list of ranges, expected a value before the comma")]
    EmptyListElement,
    #[error("year {0} is before 1900")]
    YearTooEarly(u32),
    #[error("year {0} is past 2923, nobody will still read these opening hours")]
    YearTooLate(u32),
    #[error("expected a month in the month-day range")]
    ExpectedMonth,
    #[error("month range is not closed by another month")]
    UnclosedMonthRange,
    #[error("day {day} does not exist in {month}")]
    DayOutOfRange { day: u32, month: &'static str },
    #[error("ranges involving easter are not supported")]
    EasterRange,
    #[error("week {0} does not exist")]
    WeekOutOfRange(u32),
    #[error("unclosed quote in a comment")]
    UnclosedComment,
    #[error("missing colon right after the closing quote of a comment selector")]
    MissingColon,
    #[error("empty comment")]
    EmptyComment,
    #[error("empty wide range selector before ':'")]
    EmptyWideRange,
    #[error("a holiday marker must be followed by a space or a comma")]
    HolidaySeparator,
    #[error("expected a weekday")]
    ExpectedWeekday,
    #[error("weekday range is not closed by another weekday")]
    UnclosedWeekdayRange,
    #[error("expected a value between 1 and 5 in the nth-of-month selector")]
    NthOutOfRange,
    #[error("unclosed bracket, expected ']' after the nth-of-month selector")]
    UnclosedBracket,
    #[error("a weekday range cannot involve an nth-of-month selector")]
    NthInRange,
    #[error("hour {0} does not exist")]
    HourOutOfRange(u32),
    #[error("hour {0} is past 47, even for an extended time range")]
    EndHourOutOfRange(u32),
    #[error("minute {0} does not exist in an hour")]
    MinuteOutOfRange(u32),
    #[error("expected ':' or 'h' between hours and minutes, found {0:?}")]
    BadTimeSeparator(char),
    #[error("expected a number of minutes")]
    ExpectedMinutes,
    #[error("expected a time range, separated by '-'")]
    ExpectedRange,
    #[error("expected the enclosing hour of the time range")]
    ExpectedEndTime,
    #[error("the end of a time range must be after its start; use an hour past 23 to reach into the next day")]
    EndNotAfterStart,
    #[error("expected another time range after the comma")]
    ExpectedTime,
    #[error("unknown rule modifier")]
    UnknownModifier,
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("allocation of {0} bytes failed, parse aborted")]
    Resource(usize),
}

/// A failed parse: the kind of failure and the zero-based byte offset of the
/// offending token in the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parse error at offset {offset}: {kind}")]
pub struct ParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Render the two-line diagnostic: the original input, then a caret
    /// under the failing offset.
    pub fn caret_diagnostic(&self, input: &str) -> String {
        let upto = self.offset.min(input.len());
        let pad = input[..upto].chars().count();
        format!("{input}\n{:pad$}^", "")
    }
}

impl From<AllocError> for ParseErrorKind {
    fn from(err: AllocError) -> Self {
        ParseErrorKind::Resource(err.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_lands_under_the_offending_token() {
        let err = ParseError { offset: 5, kind: ParseErrorKind::UnknownModifier };
        assert_eq!(err.caret_diagnostic("Mo-Fr toto"), "Mo-Fr toto\n     ^");
    }

    #[test]
    fn caret_offset_is_clamped() {
        let err = ParseError { offset: 99, kind: ParseErrorKind::UnexpectedToken };
        assert_eq!(err.caret_diagnostic("ab"), "ab\n  ^");
    }

    #[test]
    fn messages_distinguish_the_comment_failures() {
        assert_ne!(
            ParseErrorKind::EmptyComment.to_string(),
            ParseErrorKind::UnclosedComment.to_string()
        );
        assert!(ParseErrorKind::EmptyComment.to_string().contains("empty comment"));
    }
}
