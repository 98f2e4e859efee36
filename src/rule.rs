//! Rule data model.
//!
//! Everything the parser produces lives here: the selector records backed by
//! [`BitVec`]s, the rule modifier, and the chaining metadata. The evaluator
//! and the text renderer only ever read these.

use bitflags::bitflags;

use crate::bitvec::BitVec;

/// First year representable in a year selector.
pub const YEAR_BASE: i32 = 1900;
/// Width of the year selector: 1900 through 2923.
pub const YEAR_BITS: usize = 1024;
/// Width of a month-day selector: 12 months of 32 day slots. Slot 32 of each
/// month is padding from the 31-day encoding offset.
pub const MONTHDAY_BITS: usize = 12 * 32;
/// Width of a week selector, 1-based week numbers.
pub const WEEK_BITS: usize = 54;
/// Width of a time selector: minutes of one day.
pub const DAY_MINUTES: usize = 24 * 60;
/// Longest stored annotation, in bytes.
pub const COMMENT_SIZE: usize = 128;

/// One `Mon[ DD][-Mon[ DD]]` item: a 384-bit day selector plus the `easter`
/// marker. An `easter` item carries no day bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthdayRange {
    pub days: BitVec,
    pub easter: bool,
}

/// The year/month-day/week portion of a rule, or a free-text annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WideRangeSelector {
    Date {
        years: BitVec,
        monthdays: Vec<MonthdayRange>,
        weeks: BitVec,
    },
    Comment(String),
}

bitflags! {
    /// Holiday markers on a weekday selector; `SH` is the school-holiday
    /// marker, `PH` the public-holiday one. They combine freely with either
    /// weekday pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HolidayFlags: u8 {
        const SCHOOL = 1 << 0;
        const PUBLIC = 1 << 1;
    }
}

/// Which days of the week a rule covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekdayPattern {
    /// 7-bit selector, Monday = bit 0 through Sunday = bit 6.
    Range(BitVec),
    /// A single weekday restricted to its nth occurrence in the month,
    /// `nth` in 1..=5.
    NthOfMonth { day: u8, nth: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySelector {
    pub pattern: WeekdayPattern,
    pub holidays: HolidayFlags,
}

/// Minutes-of-day selectors. `extended_time_range` holds the minutes past
/// midnight that logically continue the previous day's span, folded back
/// into `[0, 1440)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSelector {
    pub time_range: BitVec,
    pub extended_time_range: BitVec,
}

/// The weekday/time-of-day portion of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallRangeSelector {
    pub weekday: WeekdaySelector,
    pub hours: TimeSelector,
}

/// Everything restricting when one rule applies. `anyway` is the `24/7`
/// short-circuit: the wide and small ranges are present but never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSequence {
    pub anyway: bool,
    pub wide_range: WideRangeSelector,
    pub small_range: SmallRangeSelector,
}

/// State a matching rule assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Open,
    Closed,
    Unknown,
    /// Only an annotation was given; a distinguishable outcome, not a
    /// synonym for closed.
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleModifier {
    pub kind: RuleKind,
    pub comment: Option<String>,
}

/// Token chaining one rule to the next. The first rule of an input is
/// `Head`; space-chained rules stay `NotSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    NotSet,
    Head,
    Semicolon,
    Comma,
    Fallback,
}

/// One parsed rule: how it was chained, when it applies, what it assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSequence {
    pub separator: Separator,
    pub selector: SelectorSequence,
    pub modifier: RuleModifier,
}
