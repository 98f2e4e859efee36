//! Small-range selector parsing: weekdays (holiday markers, ranges,
//! nth-of-month) and times of day (minute bitsets, extended overnight
//! ranges).

use crate::error::{ParseError, ParseErrorKind};
use crate::parse::cursor::{Cursor, Parsed};
use crate::parse::lex;
use crate::rule::{
    DAY_MINUTES, HolidayFlags, SmallRangeSelector, TimeSelector, WeekdayPattern, WeekdaySelector,
};

fn at_marker(s: &str, marker: &str) -> bool {
    s.starts_with(marker) && !s.as_bytes().get(marker.len()).is_some_and(u8::is_ascii_alphabetic)
}

// A holiday marker must be followed by a space, a comma, or the end of the
// input. Returns the offset of the comma when that was the separator, so a
// dangling `SH,` can rewind onto it.
fn marker_separator(cur: &mut Cursor) -> Result<Option<usize>, ParseError> {
    match cur.peek() {
        None | Some(' ') => Ok(None),
        Some(',') => {
            let comma = cur.pos();
            cur.eat(",");
            Ok(Some(comma))
        }
        Some(_) => Err(cur.error(ParseErrorKind::HolidaySeparator)),
    }
}

/// Weekday selector: optional `SH`/`PH` holiday markers, then a weekday, a
/// weekday range (descending wraps around the week), or a single weekday
/// with an `[n]` nth-of-month qualifier. Comma-chained; the comma is only
/// taken when lookahead shows another item, otherwise it is left for the
/// rule separator. Absent: every day.
pub fn weekday_selector(cur: &mut Cursor) -> Result<(WeekdaySelector, Parsed), ParseError> {
    let mut range = cur.bitvec(7)?;
    let mut holidays = HolidayFlags::empty();
    let mut nth: Option<(u8, u8)> = None;
    let mut matched_any = false;
    loop {
        cur.skip_spaces();
        let mut marker_comma = None;
        if at_marker(cur.rest(), "SH") {
            cur.eat("SH");
            marker_comma = marker_separator(cur)?;
            holidays |= HolidayFlags::SCHOOL;
        }
        cur.skip_spaces();
        if at_marker(cur.rest(), "PH") {
            cur.eat("PH");
            marker_comma = marker_separator(cur)?;
            holidays |= HolidayFlags::PUBLIC;
        }
        cur.skip_spaces();
        let Some(day_from) = lex::weekday_id(cur.rest()) else {
            if let Some(comma) = marker_comma {
                cur.seek(comma);
                return Err(cur.error(ParseErrorKind::ExpectedWeekday));
            }
            if matched_any {
                return Err(cur.error(ParseErrorKind::ExpectedWeekday));
            }
            range.set_range(0, 6, true);
            let outcome = if holidays.is_empty() { Parsed::Empty } else { Parsed::Matched };
            let selector = WeekdaySelector { pattern: WeekdayPattern::Range(range), holidays };
            return Ok((selector, outcome));
        };
        cur.eat(lex::WEEKDAYS[day_from]);
        matched_any = true;
        cur.skip_spaces();
        if cur.eat("-") {
            cur.skip_spaces();
            let Some(day_to) = lex::weekday_id(cur.rest()) else {
                return Err(cur.error(ParseErrorKind::UnclosedWeekdayRange));
            };
            cur.eat(lex::WEEKDAYS[day_to]);
            if day_from < day_to {
                range.set_range(day_from, day_to, true);
            } else {
                range.set_range(0, 6, true);
                range.set_range(day_to + 1, day_from.saturating_sub(1), false);
            }
        } else {
            range.set(day_from, true);
            cur.skip_spaces();
            if cur.eat("[") {
                cur.skip_spaces();
                let ordinal = cur.pos();
                match cur.peek() {
                    Some(digit @ '1'..='5') => {
                        cur.seek(ordinal + 1);
                        nth = Some((day_from as u8, digit as u8 - b'0'));
                    }
                    _ => return Err(cur.error_at(ordinal, ParseErrorKind::NthOutOfRange)),
                }
                cur.skip_spaces();
                if !cur.eat("]") {
                    return Err(cur.error(ParseErrorKind::UnclosedBracket));
                }
            }
            cur.skip_spaces();
            if cur.rest().starts_with('-') {
                return Err(cur.error(ParseErrorKind::NthInRange));
            }
        }
        cur.skip_spaces();
        if !eat_list_comma(cur) {
            break;
        }
    }
    let pattern = match nth {
        Some((day, nth)) => WeekdayPattern::NthOfMonth { day, nth },
        None => WeekdayPattern::Range(range),
    };
    Ok((WeekdaySelector { pattern, holidays }, Parsed::Matched))
}

// Take the comma only when another weekday item follows; a comma followed by
// anything else chains the next rule instead.
fn eat_list_comma(cur: &mut Cursor) -> bool {
    if !cur.rest().starts_with(',') {
        return false;
    }
    let mut probe = cur.clone();
    probe.eat(",");
    probe.skip_spaces();
    let continues = lex::weekday_id(probe.rest()).is_some()
        || at_marker(probe.rest(), "SH")
        || at_marker(probe.rest(), "PH");
    if continues {
        cur.eat(",");
    }
    continues
}

/// Time selector: `HH:MM-HH:MM` ranges (`h` also separates hours from
/// minutes, with the minutes then optional), or an open-ended `HH:MM+`. An
/// end hour past 23 reaches into the next day; the folded-back part lands in
/// the extended range. Comma-chained with digit lookahead. Absent: the whole
/// day.
pub fn time_selector(cur: &mut Cursor) -> Result<(TimeSelector, Parsed), ParseError> {
    let mut time_range = cur.bitvec(DAY_MINUTES)?;
    let mut extended_time_range = cur.bitvec(DAY_MINUTES)?;
    let mut matched_any = false;
    loop {
        cur.skip_spaces();
        if !cur.at_digit() {
            if matched_any {
                return Err(cur.error(ParseErrorKind::ExpectedTime));
            }
            time_range.set_range(0, DAY_MINUTES - 1, true);
            return Ok((TimeSelector { time_range, extended_time_range }, Parsed::Empty));
        }
        let (start_hour, start_minute) = parse_time_of_day(cur, 23)?;
        let start = (start_hour * 60 + start_minute) as usize;
        cur.skip_spaces();
        let end = if cur.eat("+") {
            DAY_MINUTES
        } else {
            if !cur.eat("-") {
                return Err(cur.error(ParseErrorKind::ExpectedRange));
            }
            cur.skip_spaces();
            if !cur.at_digit() {
                return Err(cur.error(ParseErrorKind::ExpectedEndTime));
            }
            let end_token = cur.pos();
            let (end_hour, end_minute) = parse_time_of_day(cur, 47)?;
            let end = (end_hour * 60 + end_minute) as usize;
            if end <= start {
                return Err(cur.error_at(end_token, ParseErrorKind::EndNotAfterStart));
            }
            end
        };
        time_range.set_range(start, end - 1, true);
        if end > DAY_MINUTES {
            extended_time_range.set_range(0, end - DAY_MINUTES - 1, true);
        }
        matched_any = true;
        cur.skip_spaces();
        if cur.rest().starts_with(',') {
            let mut probe = cur.clone();
            probe.eat(",");
            probe.skip_spaces();
            if probe.at_digit() {
                cur.eat(",");
                continue;
            }
        }
        break;
    }
    Ok((TimeSelector { time_range, extended_time_range }, Parsed::Matched))
}

fn parse_time_of_day(cur: &mut Cursor, max_hour: u32) -> Result<(u32, u32), ParseError> {
    let hour_token = cur.pos();
    let Some(hour) = cur.number() else {
        return Err(cur.error(ParseErrorKind::ExpectedEndTime));
    };
    if hour > max_hour {
        let kind = if max_hour > 23 {
            ParseErrorKind::EndHourOutOfRange(hour)
        } else {
            ParseErrorKind::HourOutOfRange(hour)
        };
        return Err(cur.error_at(hour_token, kind));
    }
    let separator = cur.peek();
    if separator != Some(':') && separator != Some('h') {
        return Err(cur.error(ParseErrorKind::BadTimeSeparator(separator.unwrap_or('\0'))));
    }
    let lenient = separator == Some('h');
    cur.seek(cur.pos() + 1);
    cur.skip_spaces();
    if !cur.at_digit() {
        if lenient {
            return Ok((hour, 0));
        }
        return Err(cur.error(ParseErrorKind::ExpectedMinutes));
    }
    let minute_token = cur.pos();
    let minute = cur.number().unwrap_or(0);
    if minute > 59 {
        return Err(cur.error_at(minute_token, ParseErrorKind::MinuteOutOfRange(minute)));
    }
    Ok((hour, minute))
}

/// Weekday then time; the pair is absent only when both halves are.
pub fn small_range_selector(cur: &mut Cursor) -> Result<(SmallRangeSelector, Parsed), ParseError> {
    cur.skip_spaces();
    let (weekday, weekday_res) = weekday_selector(cur)?;
    let (hours, time_res) = time_selector(cur)?;
    let outcome = if weekday_res == Parsed::Empty && time_res == Parsed::Empty {
        Parsed::Empty
    } else {
        Parsed::Matched
    };
    Ok((SmallRangeSelector { weekday, hours }, outcome))
}

/// The unrestricted small range: every weekday, every minute.
pub fn default_small_range(cur: &Cursor) -> Result<SmallRangeSelector, ParseError> {
    let mut range = cur.bitvec(7)?;
    range.set_range(0, 6, true);
    let mut time_range = cur.bitvec(DAY_MINUTES)?;
    time_range.set_range(0, DAY_MINUTES - 1, true);
    Ok(SmallRangeSelector {
        weekday: WeekdaySelector {
            pattern: WeekdayPattern::Range(range),
            holidays: HolidayFlags::empty(),
        },
        hours: TimeSelector { time_range, extended_time_range: cur.bitvec(DAY_MINUTES)? },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekday_of(input: &str) -> (WeekdaySelector, Parsed) {
        weekday_selector(&mut Cursor::new(input)).unwrap()
    }

    fn day_bits(selector: &WeekdaySelector) -> Vec<usize> {
        match &selector.pattern {
            WeekdayPattern::Range(range) => {
                (0..7).filter(|&day| range.get(day)).collect()
            }
            WeekdayPattern::NthOfMonth { .. } => panic!("expected a range pattern"),
        }
    }

    #[test]
    fn ranges_lists_and_wraparound() {
        let (selector, res) = weekday_of("Mo-Fr");
        assert_eq!(res, Parsed::Matched);
        assert_eq!(day_bits(&selector), vec![0, 1, 2, 3, 4]);

        let (selector, _) = weekday_of("Mo,We,Fr");
        assert_eq!(day_bits(&selector), vec![0, 2, 4]);

        // Sa-Tu wraps: Saturday through Tuesday
        let (selector, _) = weekday_of("Sa-Tu");
        assert_eq!(day_bits(&selector), vec![0, 1, 5, 6]);

        let (selector, _) = weekday_of("Tu -Mo");
        assert_eq!(day_bits(&selector), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn absent_weekdays_default_to_all() {
        let (selector, res) = weekday_of("09:00-19:00");
        assert_eq!(res, Parsed::Empty);
        assert_eq!(day_bits(&selector), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unclosed_range_is_invalid() {
        let err = weekday_selector(&mut Cursor::new("Tu -Ma")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedWeekdayRange);
    }

    #[test]
    fn nth_of_month_qualifier() {
        let (selector, _) = weekday_of("Mo[2]");
        assert_eq!(selector.pattern, WeekdayPattern::NthOfMonth { day: 0, nth: 2 });

        let (selector, _) = weekday_of("Su [ 5 ]");
        assert_eq!(selector.pattern, WeekdayPattern::NthOfMonth { day: 6, nth: 5 });

        let err = weekday_selector(&mut Cursor::new("Mo[6]")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NthOutOfRange);
        let err = weekday_selector(&mut Cursor::new("Mo[2")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedBracket);
        let err = weekday_selector(&mut Cursor::new("Mo[1]-Fr")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NthInRange);
    }

    #[test]
    fn holiday_markers_combine_with_either_form() {
        let (selector, res) = weekday_of("SH Mo-Fr");
        assert_eq!(res, Parsed::Matched);
        assert_eq!(selector.holidays, HolidayFlags::SCHOOL);
        assert_eq!(day_bits(&selector), vec![0, 1, 2, 3, 4]);

        let (selector, _) = weekday_of("SH PH Su[1]");
        assert_eq!(selector.holidays, HolidayFlags::SCHOOL | HolidayFlags::PUBLIC);
        assert_eq!(selector.pattern, WeekdayPattern::NthOfMonth { day: 6, nth: 1 });

        let err = weekday_selector(&mut Cursor::new("SH%")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HolidaySeparator);

        let err = weekday_selector(&mut Cursor::new("PH,")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedWeekday);
        assert_eq!(err.offset, 2, "rewound onto the comma");
    }

    #[test]
    fn list_comma_is_left_for_the_next_rule() {
        let mut cur = Cursor::new("Mo,Tu, 10:00-12:00");
        let (selector, _) = weekday_selector(&mut cur).unwrap();
        assert_eq!(day_bits(&selector), vec![0, 1]);
        assert_eq!(cur.rest(), ", 10:00-12:00");
    }

    fn time_of(input: &str) -> (TimeSelector, Parsed) {
        time_selector(&mut Cursor::new(input)).unwrap()
    }

    #[test]
    fn minute_ranges() {
        let (hours, res) = time_of("09:00-19:00");
        assert_eq!(res, Parsed::Matched);
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(540, 1139)]);
        assert!(!hours.extended_time_range.any());

        let (hours, _) = time_of("09:00-12:00,14:00-18:00");
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(540, 719), (840, 1079)]);
    }

    #[test]
    fn h_separator_allows_bare_hours() {
        let (hours, _) = time_of("9h-12h30");
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(540, 749)]);
    }

    #[test]
    fn open_ended_time_runs_to_end_of_day() {
        let (hours, _) = time_of("22:00+");
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(1320, 1439)]);
        assert!(!hours.extended_time_range.any());
    }

    #[test]
    fn extended_time_folds_past_midnight() {
        let (hours, _) = time_of("20:00-26:00");
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(1200, 1439)]);
        assert_eq!(hours.extended_time_range.runs().collect::<Vec<_>>(), vec![(0, 119)]);
    }

    #[test]
    fn absent_times_default_to_the_whole_day() {
        let (hours, res) = time_of("open");
        assert_eq!(res, Parsed::Empty);
        assert_eq!(hours.time_range.runs().collect::<Vec<_>>(), vec![(0, 1439)]);
    }

    #[test]
    fn time_bounds_are_checked() {
        let err = time_selector(&mut Cursor::new("24:00-26:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HourOutOfRange(24));
        let err = time_selector(&mut Cursor::new("10:00-48:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EndHourOutOfRange(48));
        let err = time_selector(&mut Cursor::new("10:75-12:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MinuteOutOfRange(75));
        let err = time_selector(&mut Cursor::new("10.30-12:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BadTimeSeparator('.'));
        let err = time_selector(&mut Cursor::new("10:-12:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedMinutes);
        let err = time_selector(&mut Cursor::new("10:00 12:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedRange);
    }

    #[test]
    fn end_must_be_after_start() {
        let err = time_selector(&mut Cursor::new("12:00-09:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EndNotAfterStart);
        assert_eq!(err.offset, 6, "rewound to the end token");
        let err = time_selector(&mut Cursor::new("12:00-12:00")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EndNotAfterStart);
    }

    #[test]
    fn rule_comma_is_not_a_time_comma() {
        let mut cur = Cursor::new("09:00-12:00, Sa off");
        let (_, res) = time_selector(&mut cur).unwrap();
        assert_eq!(res, Parsed::Matched);
        assert_eq!(cur.rest(), ", Sa off");
    }

    #[test]
    fn weekday_and_time_compose() {
        let mut cur = Cursor::new("Tu-Sa 09:00-12:00,14:00-18:00");
        let (selector, res) = small_range_selector(&mut cur).unwrap();
        assert_eq!(res, Parsed::Matched);
        assert_eq!(day_bits(&selector.weekday), vec![1, 2, 3, 4, 5]);
        assert_eq!(selector.hours.time_range.runs().count(), 2);
        assert!(cur.is_eof());

        let (_, res) = small_range_selector(&mut Cursor::new("open")).unwrap();
        assert_eq!(res, Parsed::Empty);
    }
}
