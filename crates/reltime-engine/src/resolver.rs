//! The resolver facade: text + reference instant → result instant + flag.
//!
//! A [`Resolver`] owns the compiled vocabulary and borrows the static rule
//! catalogue. It holds no interior mutability, so one instance can be shared
//! by reference across any number of threads.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::grammar::{self, ContextFlag, Rule};
use crate::instant::{ReferenceInstant, ResultInstant};
use crate::offset;
use crate::tokenizer::tokenize;
use crate::vocabulary::{Unit, Vocabulary};

/// Options for [`Resolver::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveOptions {
    /// Time of day used by "today", "tomorrow", "next day" and "yesterday".
    pub anchor_time: NaiveTime,
    /// Extra numeral words, e.g. `"dozen" = 12`.
    pub numerals: BTreeMap<String, i64>,
    /// Extra unit spellings, e.g. `"wek" = "week"`.
    pub units: BTreeMap<String, Unit>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            anchor_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            numerals: BTreeMap::new(),
            units: BTreeMap::new(),
        }
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub instant: ResultInstant,
    pub flag: ContextFlag,
    /// Name of the rule that fired, `None` on no match.
    pub rule: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    vocabulary: Vocabulary,
    rules: &'static [Rule],
    anchor_time: NaiveTime,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            rules: grammar::catalogue(),
            anchor_time: ResolveOptions::default().anchor_time,
        }
    }
}

impl Resolver {
    /// Compile a resolver from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInput`](crate::ResolveError::InvalidInput)
    /// if a vocabulary extension is rejected.
    pub fn new(options: &ResolveOptions) -> Result<Self> {
        let mut vocabulary = Vocabulary::default();
        for (word, &value) in &options.numerals {
            vocabulary = vocabulary.with_numeral(word, value)?;
        }
        for (word, &unit) in &options.units {
            vocabulary = vocabulary.with_unit(word, unit)?;
        }
        debug!(
            numerals = options.numerals.len(),
            units = options.units.len(),
            anchor = %options.anchor_time,
            "resolver compiled"
        );
        Ok(Self {
            vocabulary,
            rules: grammar::catalogue(),
            anchor_time: options.anchor_time,
        })
    }

    /// Resolve `text` relative to `reference`.
    ///
    /// Unrecognised text is not an error: it yields
    /// [`ContextFlag::NoMatch`] and `reference` unchanged.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidInput`](crate::ResolveError::InvalidInput) if
    ///   `reference` is structurally invalid, whatever `text` says.
    /// - [`ResolveError::Overflow`](crate::ResolveError::Overflow) if the
    ///   matched quantity or the resulting date is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use reltime_engine::{ContextFlag, ReferenceInstant, Resolver};
    ///
    /// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(14, 30, 0).unwrap();
    /// let reference = ReferenceInstant::from_naive(now, 0);
    ///
    /// let out = Resolver::default().resolve("1 week from now", &reference).unwrap();
    /// assert_eq!(out.flag, ContextFlag::RelativeModifier);
    /// assert_eq!((out.instant.month, out.instant.day), (2, 25));
    /// ```
    pub fn resolve(&self, text: &str, reference: &ReferenceInstant) -> Result<Resolution> {
        reference.to_naive()?;

        let tokens = tokenize(text, &self.vocabulary);
        let Some(m) = grammar::find_match(self.rules, text, &tokens) else {
            debug!(input = text, "no rule matched");
            return Ok(Resolution {
                instant: *reference,
                flag: ContextFlag::NoMatch,
                rule: None,
            });
        };

        let instant = offset::apply(
            reference,
            m.offset.as_ref(),
            m.rule.policy,
            self.anchor_time,
        )?;
        debug!(
            input = text,
            rule = m.rule.name,
            flag = m.rule.flag.code(),
            start = m.span.0,
            end = m.span.1,
            "rule matched"
        );
        Ok(Resolution {
            instant,
            flag: m.rule.flag,
            rule: Some(m.rule.name),
        })
    }

    /// [`resolve`](Self::resolve) as a plain `(instant, flag)` pair.
    pub fn resolve_pair(
        &self,
        text: &str,
        reference: &ReferenceInstant,
    ) -> Result<(ResultInstant, ContextFlag)> {
        self.resolve(text, reference).map(|r| (r.instant, r.flag))
    }
}

/// The process-wide resolver with default options, built on first use.
pub fn default_resolver() -> &'static Resolver {
    static DEFAULT: OnceLock<Resolver> = OnceLock::new();
    DEFAULT.get_or_init(Resolver::default)
}

/// Resolve `text` against `reference` with the default resolver.
///
/// See [`Resolver::resolve`] for the grammar and error conditions.
pub fn resolve(text: &str, reference: &ReferenceInstant) -> Result<(ResultInstant, ContextFlag)> {
    default_resolver().resolve_pair(text, reference)
}
