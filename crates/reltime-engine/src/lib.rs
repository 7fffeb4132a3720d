//! # reltime-engine
//!
//! Deterministic resolution of relative time phrases.
//!
//! Turns phrases like `"5 minutes from now"`, `"in one week"` or
//! `"tomorrow"` into an absolute instant, anchored to a reference instant the
//! caller supplies. The engine never reads a clock, performs no I/O and keeps
//! no mutable state, so the same inputs always give the same output.
//!
//! Every resolution is tagged with a [`ContextFlag`] saying what kind of
//! phrase matched. Unrecognised text is not an error: it resolves to
//! [`ContextFlag::NoMatch`] with the reference returned unchanged.
//!
//! ## Modules
//!
//! - [`vocabulary`] — Numeral, unit and keyword tables
//! - [`tokenizer`] — Text → classified tokens with word-boundary metadata
//! - [`grammar`] — Ordered rule catalogue and first-match-wins matcher
//! - [`offset`] — Calendar-exact minute, day and week arithmetic
//! - [`resolver`] — The `resolve(text, reference)` facade and its options
//! - [`instant`] — The nine-field reference/result time tuple
//! - [`error`] — Error types

pub mod error;
pub mod grammar;
pub mod instant;
pub mod offset;
pub mod resolver;
pub mod tokenizer;
pub mod vocabulary;

pub use error::ResolveError;
pub use grammar::{ContextFlag, DefaultTimePolicy, Direction, Rule};
pub use instant::{ReferenceInstant, ResultInstant};
pub use resolver::{default_resolver, resolve, Resolution, ResolveOptions, Resolver};
pub use vocabulary::{NumeralValue, Unit, Vocabulary};
