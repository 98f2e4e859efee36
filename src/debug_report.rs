//! Section-by-section dump of a parsed rule set. Everything shown here is
//! derived from the public read API — run-length spans come straight out of
//! `BitVec::runs`.

use aperto::{
    BitVec, HolidayFlags, MonthdayRange, ParseError, RuleKind, RuleSequence, RuleSet, Separator,
    Status, TimeSelector, WeekdayPattern, WeekdaySelector, WideRangeSelector,
};
use chrono::NaiveDateTime;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const MONTHS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const MONTH_DAYS: [usize; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn print_rules(input: &str, rules: &RuleSet, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsed: \"{input}\""), ansi::CYAN)));

    if rules.rules().is_empty() {
        println!("{}", palette.dim("  No rules"));
        return;
    }
    for (index, rule) in rules.rules().iter().enumerate() {
        print_rule(index, rule, &palette);
    }
    println!();
}

pub fn print_status(when: NaiveDateTime, status: Status, color: bool) {
    let palette = ansi::Palette::new(color);
    let color = match status {
        Status::Open => ansi::GREEN,
        Status::Closed => ansi::YELLOW,
        Status::Unknown | Status::Comment => ansi::BLUE,
    };
    println!("{} {} {}", palette.dim("At"), when, palette.bold(palette.paint(status.to_string(), color)));
    println!();
}

pub fn print_error(input: &str, err: &ParseError, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("{}", palette.paint(format!("error: {err}"), ansi::YELLOW));
    eprintln!("{}", err.caret_diagnostic(input));
}

fn print_rule(index: usize, rule: &RuleSequence, palette: &ansi::Palette) {
    println!("\n{}", palette.paint(format!("━━━ Rule {} ━━━", index + 1), ansi::GRAY));
    line(palette, "separator", separator_name(rule.separator));
    line(palette, "unconditional", if rule.selector.anyway { "yes" } else { "no" }.to_string());

    if !rule.selector.anyway {
        match &rule.selector.wide_range {
            WideRangeSelector::Comment(text) => line(palette, "selector", format!("\"{text}\"")),
            WideRangeSelector::Date { years, monthdays, weeks } => {
                line(palette, "years", spans(years, |i| (i + 1900).to_string()));
                line(palette, "monthdays", monthday_spans(monthdays));
                line(palette, "weeks", spans(weeks, |i| (i + 1).to_string()));
            }
        }
        line(palette, "weekdays", weekday_spans(&rule.selector.small_range.weekday));
        line(palette, "hours", hour_spans(&rule.selector.small_range.hours));
    }

    let state = match (&rule.modifier.kind, &rule.modifier.comment) {
        (RuleKind::Open, _) => "open".to_string(),
        (RuleKind::Closed, _) => "closed".to_string(),
        (RuleKind::Unknown, _) => "unknown".to_string(),
        (RuleKind::Comment, Some(text)) => format!("\"{text}\""),
        (RuleKind::Comment, None) => "comment".to_string(),
    };
    line(palette, "state", state);
}

fn line(palette: &ansi::Palette, label: &str, value: String) {
    println!("  {} {}", palette.dim(format!("{label}:")), palette.paint(value, ansi::BLUE));
}

fn separator_name(separator: Separator) -> String {
    match separator {
        Separator::NotSet => "none",
        Separator::Head => "head",
        Separator::Semicolon => "semicolon",
        Separator::Comma => "comma",
        Separator::Fallback => "fallback",
    }
    .to_string()
}

// Run-length rendering: each maximal run of set bits becomes "A" or "A - B".
fn spans(bits: &BitVec, fmt: impl Fn(usize) -> String) -> String {
    let rendered: Vec<String> = bits
        .runs()
        .map(|(a, b)| if a == b { fmt(a) } else { format!("{} - {}", fmt(a), fmt(b)) })
        .collect();
    if rendered.is_empty() { "-".to_string() } else { rendered.join(", ") }
}

fn monthday(slot: usize) -> String {
    let month = slot / 32;
    let day = (slot % 32 + 1).min(MONTH_DAYS[month]);
    format!("{} {}", MONTHS[month], day)
}

fn monthday_spans(monthdays: &[MonthdayRange]) -> String {
    let mut rendered = Vec::new();
    for range in monthdays {
        if range.easter {
            rendered.push("easter".to_string());
        }
        if range.days.any() {
            rendered.push(spans(&range.days, monthday));
        }
    }
    if rendered.is_empty() { "-".to_string() } else { rendered.join(", ") }
}

fn weekday_spans(selector: &WeekdaySelector) -> String {
    let mut out = match &selector.pattern {
        WeekdayPattern::Range(days) => spans(days, |i| WEEKDAYS[i].to_string()),
        WeekdayPattern::NthOfMonth { day, nth } => {
            format!("{}[{}]", WEEKDAYS[*day as usize], nth)
        }
    };
    if selector.holidays.contains(HolidayFlags::SCHOOL) {
        out.push_str(" SH");
    }
    if selector.holidays.contains(HolidayFlags::PUBLIC) {
        out.push_str(" PH");
    }
    out
}

fn clock(minute: usize) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn hour_spans(hours: &TimeSelector) -> String {
    let overnight_end = hours.extended_time_range.runs().next().and_then(
        |(start, end)| {
            if start == 0 { Some(end + 1) } else { None }
        },
    );
    let rendered: Vec<String> = hours
        .time_range
        .runs()
        .map(|(a, b)| {
            if b == 24 * 60 - 1 {
                match overnight_end {
                    // the run continues past midnight: show the folded hours
                    Some(extra) => format!("{} - {}", clock(a), clock(24 * 60 + extra)),
                    None => format!("{}+", clock(a)),
                }
            } else {
                format!("{} - {}", clock(a), clock(b + 1))
            }
        })
        .collect();
    if rendered.is_empty() { "-".to_string() } else { rendered.join(", ") }
}
