//! Wide-range selector parsing: year ranges, month-day ranges, week numbers,
//! and the quoted-comment selector form.

use crate::error::{ParseError, ParseErrorKind};
use crate::parse::cursor::{Cursor, Parsed};
use crate::parse::lex;
use crate::rule::{COMMENT_SIZE, MONTHDAY_BITS, MonthdayRange, WEEK_BITS, WideRangeSelector, YEAR_BITS};

/// `YYYY` or `YYYY-YYYY`, comma-separated, onto a 1024-bit vector for the
/// years 1900 through 2923. Absent: every year.
pub fn year_range(cur: &mut Cursor) -> Result<(crate::bitvec::BitVec, Parsed), ParseError> {
    cur.skip_spaces();
    let mut years = cur.bitvec(YEAR_BITS)?;
    if cur.rest().starts_with(',') {
        return Err(cur.error(ParseErrorKind::EmptyListElement));
    }
    if !lex::at_year(cur.rest()) {
        years.set_range(0, YEAR_BITS - 1, true);
        return Ok((years, Parsed::Empty));
    }
    loop {
        if !lex::at_year(cur.rest()) {
            return Err(cur.error(ParseErrorKind::EmptyListElement));
        }
        let from = parse_year(cur)?;
        if lex::at_year_range_tail(cur.rest()) {
            cur.skip_spaces();
            cur.eat("-");
            cur.skip_spaces();
            let to = parse_year(cur)?;
            years.set_range(from as usize - 1900, to as usize - 1900, true);
        } else {
            years.set(from as usize - 1900, true);
        }
        if !cur.eat(",") {
            break;
        }
    }
    Ok((years, Parsed::Matched))
}

fn parse_year(cur: &mut Cursor) -> Result<u32, ParseError> {
    let start = cur.pos();
    let year = cur.number().unwrap_or(0);
    if year < 1900 {
        return Err(cur.error_at(start, ParseErrorKind::YearTooEarly(year)));
    }
    if year > 2923 {
        return Err(cur.error_at(start, ParseErrorKind::YearTooLate(year)));
    }
    Ok(year)
}

fn at_easter(s: &str) -> bool {
    s.starts_with("easter") && !s.as_bytes().get(6).is_some_and(u8::is_ascii_alphabetic)
}

/// `Mon[ DD][-Mon[ DD]]` or `easter`, comma-separated. A descending range
/// wraps through the end of the year: everything is selected except the
/// exclusive gap between its endpoints. Absent: the whole year.
pub fn monthday_range(cur: &mut Cursor) -> Result<(Vec<MonthdayRange>, Parsed), ParseError> {
    cur.skip_spaces();
    if lex::month_id(cur.rest()).is_none() && !at_easter(cur.rest()) {
        let mut days = cur.bitvec(MONTHDAY_BITS)?;
        days.set_range(0, MONTHDAY_BITS - 1, true);
        return Ok((vec![MonthdayRange { days, easter: false }], Parsed::Empty));
    }
    let mut ranges = Vec::new();
    loop {
        cur.skip_spaces();
        let mut days = cur.bitvec(MONTHDAY_BITS)?;
        if at_easter(cur.rest()) {
            cur.eat("easter");
            cur.skip_spaces();
            if cur.rest().starts_with('-') {
                return Err(cur.error(ParseErrorKind::EasterRange));
            }
            ranges.push(MonthdayRange { days, easter: true });
        } else {
            let Some(month_from) = lex::month_id(cur.rest()) else {
                return Err(cur.error(ParseErrorKind::ExpectedMonth));
            };
            cur.eat(lex::MONTHS[month_from]);
            cur.skip_spaces();
            let day_from = parse_day(cur, month_from)?;
            cur.skip_spaces();
            if cur.eat("-") {
                cur.skip_spaces();
                if at_easter(cur.rest()) {
                    return Err(cur.error(ParseErrorKind::EasterRange));
                }
                let Some(month_to) = lex::month_id(cur.rest()) else {
                    return Err(cur.error(ParseErrorKind::UnclosedMonthRange));
                };
                cur.eat(lex::MONTHS[month_to]);
                cur.skip_spaces();
                let day_to = parse_day(cur, month_to)?.unwrap_or(31);
                let day_from = day_from.unwrap_or(1);
                let from = month_from * 32 + day_from as usize - 1;
                let to = month_to * 32 + day_to as usize - 1;
                if from <= to {
                    days.set_range(from, to, true);
                } else {
                    days.set_range(0, MONTHDAY_BITS - 1, true);
                    days.set_range(to + 1, from - 1, false);
                }
            } else if let Some(day) = day_from {
                days.set(month_from * 32 + day as usize - 1, true);
            } else {
                days.set_range(month_from * 32, month_from * 32 + 30, true);
            }
            ranges.push(MonthdayRange { days, easter: false });
        }
        if !cur.eat(",") {
            break;
        }
    }
    Ok((ranges, Parsed::Matched))
}

fn parse_day(cur: &mut Cursor, month: usize) -> Result<Option<u32>, ParseError> {
    if !cur.at_digit() {
        return Ok(None);
    }
    let start = cur.pos();
    let day = cur.number().unwrap_or(0);
    if day == 0 || day > lex::MONTH_DAYS[month] {
        return Err(cur.error_at(start, ParseErrorKind::DayOutOfRange { day, month: lex::MONTH_NAMES[month] }));
    }
    Ok(Some(day))
}

/// `week N[,N...]`, N in 1..=54, onto a 54-bit vector. Absent: weeks 1
/// through 53.
pub fn week_selector(cur: &mut Cursor) -> Result<(crate::bitvec::BitVec, Parsed), ParseError> {
    cur.skip_spaces();
    let mut weeks = cur.bitvec(WEEK_BITS)?;
    if !cur.eat("week ") {
        weeks.set_range(0, 52, true);
        return Ok((weeks, Parsed::Empty));
    }
    loop {
        cur.skip_spaces();
        let start = cur.pos();
        let week = cur.number().unwrap_or(0);
        if !(1..=WEEK_BITS as u32).contains(&week) {
            return Err(cur.error_at(start, ParseErrorKind::WeekOutOfRange(week)));
        }
        weeks.set(week as usize - 1, true);
        if !cur.eat(",") {
            break;
        }
    }
    Ok((weeks, Parsed::Matched))
}

/// Either a quoted annotation selector (`"..." :`) or the year / month-day /
/// week triple, with a trailing `:` consumed when anything matched.
pub fn wide_range_selector(cur: &mut Cursor) -> Result<(WideRangeSelector, Parsed), ParseError> {
    cur.skip_spaces();
    if cur.rest().starts_with('"') {
        let open = cur.pos();
        let Some(quoted_len) = lex::quoted_comment(cur.rest()) else {
            return Err(cur.error_at(open, ParseErrorKind::UnclosedComment));
        };
        let text = &cur.rest()[1..quoted_len - 1];
        let after_quote = open + quoted_len;
        // the colon check comes before the empty check, so `""` without a
        // colon reports the colon
        let mut probe = cur.clone();
        probe.seek(after_quote);
        probe.skip_spaces();
        if !probe.rest().starts_with(':') {
            return Err(cur.error_at(after_quote, ParseErrorKind::MissingColon));
        }
        if text.is_empty() {
            return Err(cur.error_at(open + 1, ParseErrorKind::EmptyComment));
        }
        let comment = lex::clamp_comment(text, COMMENT_SIZE);
        cur.seek(after_quote);
        cur.skip_spaces();
        cur.eat(":");
        return Ok((WideRangeSelector::Comment(comment), Parsed::Matched));
    }
    let (years, year_res) = year_range(cur)?;
    let (monthdays, monthday_res) = monthday_range(cur)?;
    let (weeks, week_res) = week_selector(cur)?;
    let selector = WideRangeSelector::Date { years, monthdays, weeks };
    if year_res == Parsed::Empty && monthday_res == Parsed::Empty && week_res == Parsed::Empty {
        cur.skip_spaces();
        if cur.rest().starts_with(':') {
            return Err(cur.error(ParseErrorKind::EmptyWideRange));
        }
        return Ok((selector, Parsed::Empty));
    }
    cur.skip_spaces();
    cur.eat(":");
    Ok((selector, Parsed::Matched))
}

/// The unrestricted wide range: every year, every day, every week. Used for
/// `24/7` rules and rules whose wide range is absent.
pub fn default_wide_range(cur: &Cursor) -> Result<WideRangeSelector, ParseError> {
    let mut years = cur.bitvec(YEAR_BITS)?;
    years.set_range(0, YEAR_BITS - 1, true);
    let mut days = cur.bitvec(MONTHDAY_BITS)?;
    days.set_range(0, MONTHDAY_BITS - 1, true);
    let mut weeks = cur.bitvec(WEEK_BITS)?;
    weeks.set_range(0, 52, true);
    Ok(WideRangeSelector::Date {
        years,
        monthdays: vec![MonthdayRange { days, easter: false }],
        weeks,
    })
}
