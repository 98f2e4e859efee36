//! Rule-level parsing: the selector sequence, the rule modifier, separator
//! recognition, and the builder loop behind [`crate::parse_rules`].

use crate::error::{ParseError, ParseErrorKind};
use crate::parse::cursor::{Cursor, Parsed};
use crate::parse::lex;
use crate::parse::small_range::{default_small_range, small_range_selector};
use crate::parse::wide_range::{default_wide_range, wide_range_selector};
use crate::rule::{COMMENT_SIZE, RuleKind, RuleModifier, RuleSequence, SelectorSequence, Separator};

fn at_always_open(s: &str) -> bool {
    s.starts_with("24/7") && matches!(s.as_bytes().get(4), None | Some(b' '))
}

/// The full applicability of one rule. `24/7` short-circuits everything;
/// otherwise the wide range is parsed before the small range, and a sequence
/// where both are absent is the unconditional one.
pub fn selector_sequence(cur: &mut Cursor) -> Result<(SelectorSequence, Parsed), ParseError> {
    cur.skip_spaces();
    if at_always_open(cur.rest()) {
        cur.eat("24/7");
        let sequence = SelectorSequence {
            anyway: true,
            wide_range: default_wide_range(cur)?,
            small_range: default_small_range(cur)?,
        };
        return Ok((sequence, Parsed::Matched));
    }
    let (wide_range, wide_res) = wide_range_selector(cur)?;
    let (small_range, small_res) = small_range_selector(cur)?;
    let anyway = wide_res == Parsed::Empty && small_res == Parsed::Empty;
    let outcome = if anyway { Parsed::Empty } else { Parsed::Matched };
    Ok((SelectorSequence { anyway, wide_range, small_range }, outcome))
}

/// `open`, `closed`, `off`, `unknown`, or a quoted annotation. A rule
/// without a modifier is open.
pub fn rule_modifier(cur: &mut Cursor) -> Result<(RuleModifier, Parsed), ParseError> {
    cur.skip_spaces();
    let (modifier, outcome) = if cur.eat("open") {
        (RuleModifier { kind: RuleKind::Open, comment: None }, Parsed::Matched)
    } else if cur.eat("closed") || cur.eat("off") {
        (RuleModifier { kind: RuleKind::Closed, comment: None }, Parsed::Matched)
    } else if cur.eat("unknown") {
        (RuleModifier { kind: RuleKind::Unknown, comment: None }, Parsed::Matched)
    } else if cur.rest().starts_with('"') {
        let open_quote = cur.pos();
        let Some(quoted_len) = lex::quoted_comment(cur.rest()) else {
            return Err(cur.error_at(open_quote, ParseErrorKind::UnclosedComment));
        };
        let text = &cur.rest()[1..quoted_len - 1];
        if text.is_empty() {
            return Err(cur.error_at(open_quote + 1, ParseErrorKind::EmptyComment));
        }
        let comment = lex::clamp_comment(text, COMMENT_SIZE);
        cur.seek(open_quote + quoted_len);
        (RuleModifier { kind: RuleKind::Comment, comment: Some(comment) }, Parsed::Matched)
    } else if cur.peek().is_some_and(char::is_alphabetic) {
        return Err(cur.error(ParseErrorKind::UnknownModifier));
    } else {
        (RuleModifier { kind: RuleKind::Open, comment: None }, Parsed::Empty)
    };
    cur.skip_spaces();
    Ok((modifier, outcome))
}

/// One chained rule: leading separator (unless this is the head rule), then
/// selectors, then the modifier. `Empty` means neither half was present.
pub fn rule_sequence(cur: &mut Cursor, first: bool) -> Result<(RuleSequence, Parsed), ParseError> {
    cur.skip_spaces();
    let mut separator = if first { Separator::Head } else { Separator::NotSet };
    if !first {
        if cur.eat("||") {
            separator = Separator::Fallback;
        } else if cur.eat(";") {
            separator = Separator::Semicolon;
        } else if cur.eat(",") {
            separator = Separator::Comma;
        }
    }
    let (selector, selector_res) = selector_sequence(cur)?;
    let (modifier, modifier_res) = rule_modifier(cur)?;
    let outcome = if selector_res == Parsed::Empty && modifier_res == Parsed::Empty {
        Parsed::Empty
    } else {
        Parsed::Matched
    };
    Ok((RuleSequence { separator, selector, modifier }, outcome))
}

/// Drive the whole input. On failure the chain built so far is discarded and
/// the error points at the exact offending offset.
pub fn build_rule_set(input: &str) -> Result<Vec<RuleSequence>, ParseError> {
    let mut cur = Cursor::new(input);
    let mut rules: Vec<RuleSequence> = Vec::new();
    let mut first = true;
    loop {
        let iteration_start = cur.pos();
        let (rule, outcome) = rule_sequence(&mut cur, first)?;
        if cur.pos() == iteration_start && !cur.is_eof() {
            return Err(cur.error(ParseErrorKind::UnexpectedToken));
        }
        if outcome == Parsed::Matched {
            first = false;
            rules.push(rule);
        }
        if cur.is_eof() {
            break;
        }
    }
    log::debug!("parsed {} rule(s) from {input:?}", rules.len());
    Ok(rules)
}
