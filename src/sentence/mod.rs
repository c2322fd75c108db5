//! Sentence model: annotated tokens with dependency-tree links, and the
//! token spans that mentions are expressed as.
//!
//! A `Sentence` is built once per input record from parallel annotation
//! arrays (see [`Sentence::from_arrays`]) and is immutable afterwards.

mod parse;

use std::ops::Range;

use crate::error::{FeatgenError, Result};

/// One annotated token. Identity is its position in the sentence.
#[derive(Debug, Clone)]
pub struct Token {
    /// Surface text
    pub word: String,
    /// Normalized base form
    pub lemma: String,
    /// Part-of-speech tag
    pub pos: String,
    /// Named-entity tag
    pub ner: String,
    /// Character offset of the first character
    pub begin_char: usize,
    /// Character offset one past the last character
    pub end_char: usize,
    /// Index of the dependency parent; `None` for roots
    pub parent: Option<usize>,
    /// Label of the edge to the parent (`"ROOT"` for roots)
    pub dep_label: String,
}

/// An ordered sequence of tokens in reading order.
///
/// Invariant: every parent index is a valid token index and the parent
/// links form a forest (no cycles). Both are enforced at construction.
#[derive(Debug, Clone)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Sentence { tokens }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at index `i`. Panics if out of range; generator entry points
    /// validate spans up front so internal accesses are always in range.
    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// Tokens covered by a span.
    pub fn span_tokens(&self, span: Span) -> &[Token] {
        &self.tokens[span.range()]
    }

    /// Space-joined projection of a token range (possibly empty).
    pub(crate) fn join_range<F>(&self, range: Range<usize>, project: F) -> String
    where
        F: Fn(&Token) -> &str,
    {
        self.tokens[range]
            .iter()
            .map(project)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Space-joined surface text of a span.
    pub fn span_words(&self, span: Span) -> String {
        self.join_range(span.range(), |t| &t.word)
    }

    /// Space-joined lemmas of a span.
    pub fn span_lemmas(&self, span: Span) -> String {
        self.join_range(span.range(), |t| &t.lemma)
    }

    /// Tokens strictly between two spans, in reading order. Empty when the
    /// spans are adjacent or overlap.
    pub fn tokens_between(&self, a: Span, b: Span) -> &[Token] {
        let (first, second) = if a.begin() <= b.begin() { (a, b) } else { (b, a) };
        if first.end() >= second.begin() {
            return &[];
        }
        &self.tokens[first.end()..second.begin()]
    }
}

/// A contiguous, non-empty token range within a sentence.
///
/// A span carries no reference to its sentence; it is a view checked
/// against the sentence it is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    begin: usize,
    length: usize,
}

impl Span {
    /// Create a span. Fails if `length` is zero.
    pub fn new(begin: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(FeatgenError::Bounds(format!(
                "span at {} must cover at least one token",
                begin
            )));
        }
        Ok(Span { begin, length })
    }

    /// Span over a known-good, non-empty half-open range.
    pub(crate) fn from_range(range: Range<usize>) -> Self {
        debug_assert!(range.end > range.start);
        Span {
            begin: range.start,
            length: range.end - range.start,
        }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Index one past the last covered token.
    pub fn end(&self) -> usize {
        self.begin + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end()
    }

    /// Whether the half-open token range `[start, end)` overlaps this span.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end() && end > self.begin
    }

    /// Validate this span against a sentence.
    pub fn check(&self, sentence: &Sentence) -> Result<()> {
        if self.end() > sentence.len() {
            return Err(FeatgenError::Bounds(format!(
                "span {}+{} exceeds sentence of {} tokens",
                self.begin,
                self.length,
                sentence.len()
            )));
        }
        Ok(())
    }
}
