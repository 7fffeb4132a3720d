//! Splits input text into classified tokens with word-boundary metadata.
//!
//! Tokens come from maximal alphanumeric runs. A run made only of digits or
//! only of letters is one token. A run of digits directly followed by a unit
//! spelling ("5m", "10min") is one compound [`TokenClass::Quantity`] token.
//! Any other mixed run ("foo5", "5mph") is split at digit/letter transitions,
//! and the pieces inside the run are marked as not bounded on the inner side,
//! so no rule can start or end there.

use tracing::trace;

use crate::vocabulary::{Keyword, NumeralValue, Unit, Vocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Numeral(NumeralValue),
    UnitWord(Unit),
    /// Digits glued to a unit spelling, e.g. "5m".
    Quantity(NumeralValue, Unit),
    Keyword(Keyword),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Byte offset of the first character in the input.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub class: TokenClass,
    /// Starts the input or follows a non-alphanumeric character.
    pub left_bounded: bool,
    /// Ends the input or precedes a non-alphanumeric character.
    pub right_bounded: bool,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.class == TokenClass::Keyword(keyword)
    }

    pub fn is_bounded(&self) -> bool {
        self.left_bounded && self.right_bounded
    }
}

/// Tokenize `text` against `vocab`.
pub fn tokenize(text: &str, vocab: &Vocabulary) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        match (ch.is_alphanumeric(), run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                push_run(text, start, idx, vocab, &mut tokens);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_run(text, start, text.len(), vocab, &mut tokens);
    }

    trace!(input = text, count = tokens.len(), "tokenized");
    tokens
}

/// Emit the token(s) for the alphanumeric run `text[start..end]`.
fn push_run(text: &str, start: usize, end: usize, vocab: &Vocabulary, out: &mut Vec<Token>) {
    let run = &text[start..end];
    let segments = split_digit_letter(run);

    if let [(_, digits), (_, letters)] = segments.as_slice() {
        if is_digits(digits) && !is_digits(letters) {
            if let (Some(value), Some(unit)) =
                (vocab.lookup_numeral(digits), vocab.lookup_unit(letters))
            {
                out.push(Token {
                    text: run.to_string(),
                    start,
                    end,
                    class: TokenClass::Quantity(value, unit),
                    left_bounded: true,
                    right_bounded: true,
                });
                return;
            }
            trace!(run, suffix = *letters, "compound rejected, unit lookup failed");
        }
    }

    for (offset, piece) in segments {
        let piece_start = start + offset;
        let piece_end = piece_start + piece.len();
        out.push(Token {
            text: piece.to_string(),
            start: piece_start,
            end: piece_end,
            class: classify(piece, vocab),
            left_bounded: piece_start == start,
            right_bounded: piece_end == end,
        });
    }
}

/// Split a run at every digit/letter transition, keeping byte offsets.
fn split_digit_letter(run: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut seg_start = 0;
    let mut prev_digit: Option<bool> = None;

    for (idx, ch) in run.char_indices() {
        let digit = ch.is_ascii_digit();
        if prev_digit.is_some_and(|p| p != digit) {
            segments.push((seg_start, &run[seg_start..idx]));
            seg_start = idx;
        }
        prev_digit = Some(digit);
    }
    if seg_start < run.len() {
        segments.push((seg_start, &run[seg_start..]));
    }
    segments
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn classify(word: &str, vocab: &Vocabulary) -> TokenClass {
    if let Some(k) = vocab.lookup_keyword(word) {
        TokenClass::Keyword(k)
    } else if let Some(n) = vocab.lookup_numeral(word) {
        TokenClass::Numeral(n)
    } else if let Some(u) = vocab.lookup_unit(word) {
        TokenClass::UnitWord(u)
    } else {
        TokenClass::Other
    }
}
