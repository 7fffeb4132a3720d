//! The phrase grammar: an ordered rule catalogue and the matcher that walks it.
//!
//! Rules are plain data. [`find_match`] tries them in priority order and the
//! first rule that matches anywhere in the token stream wins; within one rule
//! the leftmost span wins. Every matched span must be word-boundary delimited
//! on both ends, and the words inside it must be separated by whitespace only.

use serde::{Serialize, Serializer};

use crate::tokenizer::{Token, TokenClass};
use crate::vocabulary::{Keyword, NumeralValue, Unit};

// ── Classification ──────────────────────────────────────────────────────────

/// What kind of match produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContextFlag {
    /// Nothing matched; the reference is returned unchanged.
    NoMatch = 0,
    /// A date was resolved; the time of day is inherited or anchored.
    DateOnly = 1,
    /// A full date and time was resolved.
    DateTime = 2,
    /// A date was resolved through an explicit "from now" / "before now" / "ago".
    RelativeModifier = 3,
}

impl ContextFlag {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for ContextFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// How a rule treats the time of day of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultTimePolicy {
    /// Return the reference untouched.
    Identity,
    /// Shift the date by `day_shift` days and force the anchor time of day.
    AnchorTime { day_shift: i64 },
    /// Apply the bound quantity and unit. Day and week offsets keep the
    /// reference time of day.
    ApplyOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Future,
    Past,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Future => 1,
            Direction::Past => -1,
        }
    }
}

// ── Patterns ────────────────────────────────────────────────────────────────

/// Whether an optional part of a quantity pattern may, may not, or must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Forbidden,
    Optional,
    Required,
}

/// Which units a quantity pattern accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitScope {
    Minutes,
    DaysOrWeeks,
}

impl UnitScope {
    pub fn contains(self, unit: Unit) -> bool {
        match self {
            UnitScope::Minutes => unit == Unit::Minute,
            UnitScope::DaysOrWeeks => matches!(unit, Unit::Day | Unit::Week),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Fixed words that must make up the entire input, case-insensitively.
    Literal(&'static [&'static str]),
    /// `[in] <numeral> <unit> [from now | before now | ago]`
    Quantity {
        lead_in: Presence,
        scope: UnitScope,
        trailer: Presence,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    pub flag: ContextFlag,
    pub policy: DefaultTimePolicy,
}

static CATALOGUE: [Rule; 9] = [
    Rule {
        name: "now",
        pattern: Pattern::Literal(&["now"]),
        flag: ContextFlag::DateTime,
        policy: DefaultTimePolicy::Identity,
    },
    Rule {
        name: "today",
        pattern: Pattern::Literal(&["today"]),
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::AnchorTime { day_shift: 0 },
    },
    Rule {
        name: "tomorrow",
        pattern: Pattern::Literal(&["tomorrow"]),
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::AnchorTime { day_shift: 1 },
    },
    Rule {
        name: "next day",
        pattern: Pattern::Literal(&["next", "day"]),
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::AnchorTime { day_shift: 1 },
    },
    Rule {
        name: "yesterday",
        pattern: Pattern::Literal(&["yesterday"]),
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::AnchorTime { day_shift: -1 },
    },
    Rule {
        name: "minutes",
        pattern: Pattern::Quantity {
            lead_in: Presence::Optional,
            scope: UnitScope::Minutes,
            trailer: Presence::Optional,
        },
        flag: ContextFlag::DateTime,
        policy: DefaultTimePolicy::ApplyOffset,
    },
    Rule {
        name: "in days",
        pattern: Pattern::Quantity {
            lead_in: Presence::Required,
            scope: UnitScope::DaysOrWeeks,
            trailer: Presence::Forbidden,
        },
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::ApplyOffset,
    },
    Rule {
        name: "days relative",
        pattern: Pattern::Quantity {
            lead_in: Presence::Forbidden,
            scope: UnitScope::DaysOrWeeks,
            trailer: Presence::Required,
        },
        flag: ContextFlag::RelativeModifier,
        policy: DefaultTimePolicy::ApplyOffset,
    },
    Rule {
        name: "bare days",
        pattern: Pattern::Quantity {
            lead_in: Presence::Forbidden,
            scope: UnitScope::DaysOrWeeks,
            trailer: Presence::Forbidden,
        },
        flag: ContextFlag::DateOnly,
        policy: DefaultTimePolicy::ApplyOffset,
    },
];

/// The rule catalogue, highest priority first.
pub fn catalogue() -> &'static [Rule] {
    &CATALOGUE
}

// ── Matching ────────────────────────────────────────────────────────────────

/// A signed quantity bound by a quantity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub quantity: NumeralValue,
    pub unit: Unit,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'r> {
    pub rule: &'r Rule,
    /// `None` for literal rules.
    pub offset: Option<Offset>,
    /// Byte range of the matched phrase in the input.
    pub span: (usize, usize),
}

/// Find the highest-priority rule matching `tokens`, which must come from `text`.
pub fn find_match<'r>(rules: &'r [Rule], text: &str, tokens: &[Token]) -> Option<Match<'r>> {
    rules.iter().find_map(|rule| match rule.pattern {
        Pattern::Literal(words) => match_literal(text, tokens, words).map(|span| Match {
            rule,
            offset: None,
            span,
        }),
        Pattern::Quantity {
            lead_in,
            scope,
            trailer,
        } => (0..tokens.len()).find_map(|start| {
            match_quantity(text, tokens, start, lead_in, scope, trailer).map(|(offset, span)| {
                Match {
                    rule,
                    offset: Some(offset),
                    span,
                }
            })
        }),
    })
}

/// `a` and `b` are separate words with only whitespace between them.
fn spaced(text: &str, a: &Token, b: &Token) -> bool {
    a.end < b.start && text[a.end..b.start].chars().all(char::is_whitespace)
}

fn match_literal(text: &str, tokens: &[Token], words: &[&str]) -> Option<(usize, usize)> {
    if tokens.len() != words.len() {
        return None;
    }
    let words_match = tokens
        .iter()
        .zip(words)
        .all(|(t, w)| t.is_bounded() && t.text.to_lowercase() == *w);
    let gaps_ok = tokens.windows(2).all(|w| spaced(text, &w[0], &w[1]));
    if words_match && gaps_ok {
        Some((tokens.first()?.start, tokens.last()?.end))
    } else {
        None
    }
}

fn match_quantity(
    text: &str,
    tokens: &[Token],
    start: usize,
    lead_in: Presence,
    scope: UnitScope,
    trailer: Presence,
) -> Option<(Offset, (usize, usize))> {
    let first = tokens.get(start)?;
    if !first.left_bounded {
        return None;
    }

    // Lead-in "in".
    let mut pos = start;
    if first.is_keyword(Keyword::In) {
        if lead_in == Presence::Forbidden {
            return None;
        }
        let next = tokens.get(pos + 1)?;
        if !spaced(text, first, next) {
            return None;
        }
        pos += 1;
    } else {
        if lead_in == Presence::Required {
            return None;
        }
        // Never skip past a lead-in, bare or glued ("xin 5 min", "5in 5 min").
        if start > 0 {
            let prev = &tokens[start - 1];
            if spaced(text, prev, first) && prev.text.to_lowercase().ends_with("in") {
                return None;
            }
        }
    }

    // Quantity and unit.
    let (quantity, unit, mut last) = match tokens[pos].class {
        TokenClass::Quantity(value, unit) => (value, unit, pos),
        TokenClass::Numeral(value) => {
            let unit_tok = tokens.get(pos + 1)?;
            match unit_tok.class {
                TokenClass::UnitWord(unit) if spaced(text, &tokens[pos], unit_tok) => {
                    (value, unit, pos + 1)
                }
                _ => return None,
            }
        }
        _ => return None,
    };
    if !scope.contains(unit) {
        return None;
    }

    // Trailing directional phrase.
    let direction = match (directional_phrase(text, tokens, last), trailer) {
        (Trailer::Glued, _)
        | (Trailer::Present(..), Presence::Forbidden)
        | (Trailer::Absent, Presence::Required) => return None,
        (Trailer::Present(direction, end), _) => {
            last = end;
            direction
        }
        (Trailer::Absent, _) => Direction::Future,
    };

    let end_tok = &tokens[last];
    if !end_tok.right_bounded {
        return None;
    }
    Some((
        Offset {
            quantity,
            unit,
            direction,
        },
        (first.start, end_tok.end),
    ))
}

enum Trailer {
    Absent,
    /// Direction and the index of the phrase's last token.
    Present(Direction, usize),
    /// A directional word with text glued on ("agox", "before nowfoo").
    Glued,
}

/// Recognise "from now", "before now" or "ago" right after `tokens[after]`.
fn directional_phrase(text: &str, tokens: &[Token], after: usize) -> Trailer {
    let Some(head) = tokens.get(after + 1) else {
        return Trailer::Absent;
    };
    if !spaced(text, &tokens[after], head) {
        return Trailer::Absent;
    }
    match head.class {
        TokenClass::Keyword(Keyword::Ago) => Trailer::Present(Direction::Past, after + 1),
        TokenClass::Keyword(k @ (Keyword::From | Keyword::Before)) => {
            let Some(now) = tokens.get(after + 2) else {
                return Trailer::Absent;
            };
            if !spaced(text, head, now) {
                Trailer::Absent
            } else if now.is_keyword(Keyword::Now) {
                let direction = if k == Keyword::From {
                    Direction::Future
                } else {
                    Direction::Past
                };
                Trailer::Present(direction, after + 2)
            } else if begins_with_word(now, "now") {
                Trailer::Glued
            } else {
                Trailer::Absent
            }
        }
        _ if begins_with_word(head, "ago") => Trailer::Glued,
        _ => Trailer::Absent,
    }
}

/// `token` begins with `word`, possibly with more alphanumerics glued on.
fn begins_with_word(token: &Token, word: &str) -> bool {
    token.text.to_lowercase().starts_with(word)
}

// ── Tests ───────────────────────────────────────────────────────────────────
