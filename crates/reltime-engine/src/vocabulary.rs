//! Static word tables: numerals, units and grammar keywords.
//!
//! All lookups are case-insensitive exact matches. The tables are built once
//! per [`Resolver`](crate::resolver::Resolver) and never change afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// Granularity of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Minute,
    Day,
    Week,
}

/// One unit expressed in the base quantity the offset calculator works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDelta {
    /// Exact elapsed seconds, applied to the full instant.
    Seconds(i64),
    /// Whole calendar days, applied to the date only.
    Days(i64),
}

impl Unit {
    pub fn base_delta(self) -> BaseDelta {
        match self {
            Unit::Minute => BaseDelta::Seconds(60),
            Unit::Day => BaseDelta::Days(1),
            Unit::Week => BaseDelta::Days(7),
        }
    }
}

/// The value of a numeral token.
///
/// Digit runs are always numerals, however long. Runs that do not fit in an
/// `i64` are kept as `OutOfRange` so that a phrase using one fails loudly
/// instead of silently not matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumeralValue {
    Exact(i64),
    OutOfRange,
}

/// Words with a fixed grammatical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    In,
    From,
    Before,
    Now,
    Ago,
    Today,
    Tomorrow,
    Next,
    Yesterday,
}

impl Keyword {
    fn parse(word: &str) -> Option<Keyword> {
        match word {
            "in" => Some(Keyword::In),
            "from" => Some(Keyword::From),
            "before" => Some(Keyword::Before),
            "now" => Some(Keyword::Now),
            "ago" => Some(Keyword::Ago),
            "today" => Some(Keyword::Today),
            "tomorrow" => Some(Keyword::Tomorrow),
            "next" => Some(Keyword::Next),
            "yesterday" => Some(Keyword::Yesterday),
            _ => None,
        }
    }
}

const DEFAULT_NUMERALS: &[(&str, i64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
];

const DEFAULT_UNITS: &[(&str, Unit)] = &[
    ("minute", Unit::Minute),
    ("minutes", Unit::Minute),
    ("min", Unit::Minute),
    ("mins", Unit::Minute),
    ("m", Unit::Minute),
    ("day", Unit::Day),
    ("days", Unit::Day),
    ("week", Unit::Week),
    ("weeks", Unit::Week),
    ("wk", Unit::Week),
    ("wks", Unit::Week),
];

/// Numeral and unit tables.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    numerals: HashMap<String, i64>,
    units: HashMap<String, Unit>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            numerals: DEFAULT_NUMERALS
                .iter()
                .map(|&(w, n)| (w.to_string(), n))
                .collect(),
            units: DEFAULT_UNITS
                .iter()
                .map(|&(w, u)| (w.to_string(), u))
                .collect(),
        }
    }
}

impl Vocabulary {
    /// Add a numeral word.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInput`] if `word` is not a single
    /// alphabetic word, is a grammar keyword or unit, or `value` is negative.
    pub fn with_numeral(mut self, word: &str, value: i64) -> Result<Self> {
        let word = self.check_new_word(word)?;
        if self.units.contains_key(&word) {
            return Err(ResolveError::InvalidInput(format!(
                "'{word}' is already a unit"
            )));
        }
        if value < 0 {
            return Err(ResolveError::InvalidInput(format!(
                "numeral '{word}' must not be negative, got {value}"
            )));
        }
        self.numerals.insert(word, value);
        Ok(self)
    }

    /// Add a unit spelling.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInput`] if `word` is not a single
    /// alphabetic word, or is a grammar keyword or numeral.
    pub fn with_unit(mut self, word: &str, unit: Unit) -> Result<Self> {
        let word = self.check_new_word(word)?;
        if self.numerals.contains_key(&word) {
            return Err(ResolveError::InvalidInput(format!(
                "'{word}' is already a numeral"
            )));
        }
        self.units.insert(word, unit);
        Ok(self)
    }

    fn check_new_word(&self, word: &str) -> Result<String> {
        let word = word.to_lowercase();
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return Err(ResolveError::InvalidInput(format!(
                "vocabulary entry '{word}' must be a single alphabetic word"
            )));
        }
        if Keyword::parse(&word).is_some() {
            return Err(ResolveError::InvalidInput(format!(
                "'{word}' is reserved by the grammar"
            )));
        }
        Ok(word)
    }

    /// Numeral value of `word`: any run of ASCII digits, or a known numeral word.
    pub fn lookup_numeral(&self, word: &str) -> Option<NumeralValue> {
        if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
            return Some(
                word.parse::<i64>()
                    .map(NumeralValue::Exact)
                    .unwrap_or(NumeralValue::OutOfRange),
            );
        }
        self.numerals
            .get(&word.to_lowercase())
            .copied()
            .map(NumeralValue::Exact)
    }

    pub fn lookup_unit(&self, word: &str) -> Option<Unit> {
        self.units.get(&word.to_lowercase()).copied()
    }

    pub fn lookup_keyword(&self, word: &str) -> Option<Keyword> {
        Keyword::parse(&word.to_lowercase())
    }
}
