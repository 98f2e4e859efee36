//! Recursive-descent parser for the availability grammar.
//!
//! The grammar is a chain of rules; each rule is a wide range (years,
//! month-days, weeks — or a quoted annotation), a small range (weekdays and
//! times of day), and a modifier. Every nonterminal gets one parser, and all
//! of them share the same three-way contract (see `cursor.rs`): matched,
//! legitimately absent, or invalid with an offset.
//!
//! ```text
//! input ── build_rule_set (sequence.rs)
//!            │  one iteration per chained rule
//!            v
//!        rule_sequence ──┬─ separator token        (`,` `;` `||`)
//!                        ├─ selector_sequence ──┬─ `24/7`
//!                        │                      ├─ wide_range_selector
//!                        │                      │    years / month-days / weeks
//!                        │                      │    (wide_range.rs)
//!                        │                      └─ small_range_selector
//!                        │                           weekdays / times
//!                        │                           (small_range.rs)
//!                        └─ rule_modifier          open / closed / unknown / "…"
//! ```
//!
//! Selector parsers populate [`crate::rule`] records backed by
//! [`crate::bitvec::BitVec`]s; every range construct reduces to a ranged bit
//! set. An `Invalid` outcome anywhere discards the whole chain — the offset
//! it carries feeds the caret diagnostic.

#[path = "parse/cursor.rs"]
mod cursor;
#[path = "parse/lex.rs"]
mod lex;
#[path = "parse/sequence.rs"]
mod sequence;
#[path = "parse/small_range.rs"]
mod small_range;
#[path = "parse/wide_range.rs"]
mod wide_range;

#[allow(unused_imports)]
pub use cursor::{Cursor, Parsed};
pub use sequence::build_rule_set;
