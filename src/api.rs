//! Public API.
//!
//! [`parse_rules`] turns an availability expression into a [`RuleSet`]; the
//! set is immutable afterwards and can be shared across threads for
//! concurrent queries.

use chrono::NaiveDateTime;

use crate::error::ParseError;
use crate::eval::{self, Instant, Status};
use crate::parse;
use crate::rule::RuleSequence;

/// A parsed availability expression: the rules in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleSequence>,
}

impl RuleSet {
    /// The parsed rules, in source order.
    pub fn rules(&self) -> &[RuleSequence] {
        &self.rules
    }

    /// State at an instant. Later matching rules override earlier ones;
    /// `||` fallbacks only answer when nothing else matched; no match at all
    /// is [`Status::Closed`].
    pub fn status_at(&self, when: &Instant) -> Status {
        eval::status(&self.rules, when)
    }

    /// [`Self::status_at`] for callers holding a [`chrono::NaiveDateTime`].
    pub fn status_at_datetime(&self, when: NaiveDateTime) -> Status {
        self.status_at(&Instant::from(when))
    }

    /// True when the state at `when` is [`Status::Open`].
    pub fn is_open(&self, when: &Instant) -> bool {
        self.status_at(when) == Status::Open
    }

    /// [`Self::is_open`] for callers holding a [`chrono::NaiveDateTime`].
    pub fn is_open_at(&self, when: NaiveDateTime) -> bool {
        self.status_at_datetime(when) == Status::Open
    }
}

/// Parse an availability expression.
///
/// On failure the whole chain is discarded; the returned [`ParseError`]
/// carries the byte offset of the offending token, and
/// [`ParseError::caret_diagnostic`] renders the two-line display.
///
/// # Example
/// ```
/// use aperto::parse_rules;
///
/// let rules = parse_rules("Mo-Fr 09:00-19:00").unwrap();
/// assert!(!rules.rules().is_empty());
/// ```
pub fn parse_rules(input: &str) -> Result<RuleSet, ParseError> {
    let rules = parse::build_rule_set(input)?;
    Ok(RuleSet { rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::rule::RuleKind;
    use chrono::{NaiveDate, NaiveTime};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        )
    }

    #[test]
    fn off_is_one_unconditional_closed_rule() {
        let rules = parse_rules("off").unwrap();
        assert_eq!(rules.rules().len(), 1);
        assert!(rules.rules()[0].selector.anyway);
        assert_eq!(rules.rules()[0].modifier.kind, RuleKind::Closed);
        assert!(!rules.is_open_at(at(2016, 7, 20, 12, 0)));
    }

    #[test]
    fn year_and_month_restriction() {
        let rules = parse_rules("2016 Mar: off").unwrap();
        assert_eq!(rules.rules().len(), 1);
        let crate::rule::WideRangeSelector::Date { years, monthdays, .. } =
            &rules.rules()[0].selector.wide_range
        else {
            panic!("expected a date selector");
        };
        assert_eq!(years.runs().collect::<Vec<_>>(), vec![(116, 116)]);
        assert_eq!(monthdays[0].days.runs().collect::<Vec<_>>(), vec![(64, 94)]);
        assert_eq!(rules.rules()[0].modifier.kind, RuleKind::Closed);
    }

    #[test]
    fn weekday_window_round_trip() {
        let rules = parse_rules("Mo-Fr 09:00-19:00").unwrap();
        // 2016-07-20 is a Wednesday
        assert_eq!(rules.status_at_datetime(at(2016, 7, 20, 12, 24)), Status::Open);
        assert!(rules.is_open_at(at(2016, 7, 20, 12, 24)));
        assert_eq!(rules.status_at_datetime(at(2016, 7, 20, 20, 0)), Status::Closed);

        let gated = parse_rules("2016 Mar-Dec: Mo-Fr 09:00-19:00").unwrap();
        assert_eq!(gated.status_at_datetime(at(2016, 1, 20, 12, 24)), Status::Closed);
    }

    #[test]
    fn instants_can_be_built_from_fields() {
        let rules = parse_rules("Mo-Fr 09:00-19:00").unwrap();
        let when = Instant {
            year: 2016,
            month: 7,
            day: 20,
            hour: 12,
            minute: 24,
            weekday: chrono::Weekday::Wed,
            day_of_year: 202,
        };
        assert_eq!(rules.status_at(&when), Status::Open);
    }

    #[test]
    fn errors_carry_offsets_for_the_caret() {
        let err = parse_rules("toto").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.kind, ParseErrorKind::UnknownModifier);
        assert_eq!(err.caret_diagnostic("toto"), "toto\n^");

        let err = parse_rules("\"\":").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyComment);

        let err = parse_rules("2016 Feb 30").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DayOutOfRange { day: 30, month: "February" });
        assert!(parse_rules("2016 Feb 29").is_ok());
    }

    #[test]
    fn rule_sets_are_reusable_and_cloneable() {
        let rules = parse_rules("24/7").unwrap();
        let copy = rules.clone();
        assert_eq!(rules, copy);
        assert!(copy.is_open_at(at(2020, 2, 29, 23, 59)));
    }
}
