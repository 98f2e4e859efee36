//! `aperto` parses compact "opening hours" style availability expressions —
//! years, month-day ranges, week numbers, weekdays with holiday markers and
//! nth-of-month qualifiers, times of day with overnight extensions — into a
//! rule set, and evaluates calendar instants against it.
//!
//! Every range in the grammar reduces to bits in a [`BitVec`]; the parser is
//! a recursive descent over an explicit cursor, so independent parses are
//! reentrant and a built [`RuleSet`] can serve concurrent queries.
//!
//! ```
//! use aperto::{parse_rules, Status};
//! use chrono::NaiveDateTime;
//!
//! let rules = parse_rules("Mo-Fr 09:00-19:00; Sa 10:00-14:00 || unknown").unwrap();
//! let noon: NaiveDateTime = "2016-07-20T12:00:00".parse().unwrap();
//! assert_eq!(rules.status_at_datetime(noon), Status::Open);
//! ```

#[macro_use]
mod macros;
mod api;
mod bitvec;
mod error;
mod eval;
mod parse;
mod rule;

pub use api::{RuleSet, parse_rules};
pub use bitvec::{AllocError, BitVec, Runs};
pub use error::{ParseError, ParseErrorKind};
pub use eval::{Instant, Status};
pub use rule::{
    HolidayFlags, MonthdayRange, RuleKind, RuleModifier, RuleSequence, SelectorSequence,
    Separator, SmallRangeSelector, TimeSelector, WeekdayPattern, WeekdaySelector,
    WideRangeSelector,
};
