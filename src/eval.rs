//! Point-in-time evaluation of a parsed rule chain.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::rule::{
    DAY_MINUTES, RuleKind, RuleModifier, RuleSequence, SelectorSequence, Separator,
    SmallRangeSelector, WeekdayPattern, WeekdaySelector, WideRangeSelector, YEAR_BASE,
};

/// Answer of a query against a rule set.
///
/// `Comment` is the state of a rule that only carries an annotation; it is
/// deliberately not folded into `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,
    Closed,
    Unknown,
    Comment,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Open => "open",
            Status::Closed => "closed",
            Status::Unknown => "unknown",
            Status::Comment => "comment",
        })
    }
}

/// A calendar instant, reduced to the fields the selectors test.
///
/// Build one from a [`chrono::NaiveDateTime`] via `From`, or fill the fields
/// directly when no native calendar value is at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instant {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    /// 1-based day of month.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub weekday: Weekday,
    /// 1-based day of the year; drives week numbering.
    pub day_of_year: u32,
}

impl From<NaiveDateTime> for Instant {
    fn from(when: NaiveDateTime) -> Self {
        Instant {
            year: when.year(),
            month: when.month(),
            day: when.day(),
            hour: when.hour(),
            minute: when.minute(),
            weekday: when.weekday(),
            day_of_year: when.ordinal(),
        }
    }
}

/// Evaluate a chain in source order. Every matching non-fallback rule
/// overrides the result so far; a `||` rule is consulted only while nothing
/// has matched yet. No match at all is closed.
pub fn status(rules: &[RuleSequence], when: &Instant) -> Status {
    let mut result = None;
    for (index, rule) in rules.iter().enumerate() {
        if rule.separator == Separator::Fallback && result.is_some() {
            continue;
        }
        if selector_matches(&rule.selector, when) {
            log::trace!("rule {index} matches at {when:?}");
            result = Some(modifier_status(&rule.modifier));
        }
    }
    result.unwrap_or(Status::Closed)
}

fn modifier_status(modifier: &RuleModifier) -> Status {
    match modifier.kind {
        RuleKind::Open => Status::Open,
        RuleKind::Closed => Status::Closed,
        RuleKind::Unknown => Status::Unknown,
        RuleKind::Comment => Status::Comment,
    }
}

fn selector_matches(selector: &SelectorSequence, when: &Instant) -> bool {
    if selector.anyway {
        return true;
    }
    wide_matches(&selector.wide_range, when) && small_matches(&selector.small_range, when)
}

fn wide_matches(wide: &WideRangeSelector, when: &Instant) -> bool {
    let WideRangeSelector::Date { years, monthdays, weeks } = wide else {
        // an annotation selector carries no date restriction
        return true;
    };
    let year = when.year - YEAR_BASE;
    if year < 0 || year as usize >= years.len() || !years.get(year as usize) {
        return false;
    }
    if when.month < 1 || when.month > 12 || when.day < 1 || when.day > 31 {
        return false;
    }
    let day_bit = (when.month as usize - 1) * 32 + when.day as usize - 1;
    if !monthdays.iter().any(|range| range.days.get(day_bit)) {
        return false;
    }
    let week = (when.day_of_year.max(1) as usize - 1) / 7;
    week < weeks.len() && weeks.get(week)
}

fn small_matches(small: &SmallRangeSelector, when: &Instant) -> bool {
    let minute = (when.hour * 60 + when.minute) as usize;
    if minute >= DAY_MINUTES {
        return false;
    }
    if weekday_matches(&small.weekday, when.weekday, Some(when.day)) && small.hours.time_range.get(minute) {
        return true;
    }
    // past-midnight continuation of the previous day's span
    let previous_day = when.day.checked_sub(1).filter(|&day| day >= 1);
    weekday_matches(&small.weekday, when.weekday.pred(), previous_day)
        && small.hours.extended_time_range.get(minute)
}

fn weekday_matches(selector: &WeekdaySelector, weekday: Weekday, day_of_month: Option<u32>) -> bool {
    let index = weekday.num_days_from_monday() as usize;
    match &selector.pattern {
        WeekdayPattern::Range(days) => days.get(index),
        WeekdayPattern::NthOfMonth { day, nth } => {
            *day as usize == index
                && day_of_month.is_some_and(|day| (day - 1) / 7 + 1 == u32::from(*nth))
        }
    }
}
