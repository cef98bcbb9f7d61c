//! Heuristic extraction of workbook level/book identifiers from OCR text.
//!
//! Each field is searched by an ordered list of independent rules. The first
//! rule that matches wins, and within a rule the first match in the text wins.
//! Anchored rules come first to keep incidental letters and numbers on the page
//! from being picked up; the unanchored fallbacks catch pages where the
//! recognizer mangled or dropped the anchor word.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

//
// ─── RESULT ───────────────────────────────────────────────────────────────────
//

/// Best-effort level/book candidates. Empty strings mean "no match".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub level: String,
    pub book: String,
}

/// How much of an `ExtractionResult` was populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Complete,
    Partial,
    Empty,
}

impl ExtractionResult {
    #[must_use]
    pub fn outcome(&self) -> ExtractionOutcome {
        match (self.level.is_empty(), self.book.is_empty()) {
            (false, false) => ExtractionOutcome::Complete,
            (true, true) => ExtractionOutcome::Empty,
            _ => ExtractionOutcome::Partial,
        }
    }
}

//
// ─── RULES ────────────────────────────────────────────────────────────────────
//

/// A single pattern-matching attempt for one field.
///
/// The pattern's first capture group is the candidate value; `normalize` turns
/// it into the stored form.
pub struct ExtractionRule {
    name: &'static str,
    pattern: Regex,
    normalize: fn(&str) -> String,
}

impl ExtractionRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the pattern does not compile.
    pub fn new(
        name: &'static str,
        pattern: &str,
        normalize: fn(&str) -> String,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            normalize,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value of the first match in `text`, if any.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| (self.normalize)(m.as_str()))
    }
}

impl std::fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn uppercase(value: &str) -> String {
    value.to_ascii_uppercase()
}

fn verbatim(value: &str) -> String {
    value.to_string()
}

fn compile(name: &'static str, pattern: &str, normalize: fn(&str) -> String) -> ExtractionRule {
    ExtractionRule::new(name, pattern, normalize).expect("built-in extraction pattern is valid")
}

// `lvl` must precede `lv`; otherwise "lvl B" reads as level L.
static LEVEL_RULES: LazyLock<[ExtractionRule; 2]> = LazyLock::new(|| {
    [
        compile(
            "level-anchor",
            r"(?i:\b(?:level|lvl|lv))\s*[:.#-]?\s*([A-Ma-m])\b",
            uppercase,
        ),
        compile("level-isolated-letter", r"\b([A-Ma-m])\b", uppercase),
    ]
});

static BOOK_RULES: LazyLock<[ExtractionRule; 2]> = LazyLock::new(|| {
    [
        compile(
            "book-anchor",
            r"(?i:\b(?:book|bk|no))\s*[:.#-]?\s*([0-9]{1,2})\b",
            verbatim,
        ),
        compile("book-isolated-number", r"\b([0-9]{1,2})\b", verbatim),
    ]
});

/// Ordered rules used for the level field.
#[must_use]
pub fn level_rules() -> &'static [ExtractionRule] {
    LEVEL_RULES.as_slice()
}

/// Ordered rules used for the book field.
#[must_use]
pub fn book_rules() -> &'static [ExtractionRule] {
    BOOK_RULES.as_slice()
}

/// Run `rules` in order and return the first value any of them produces.
#[must_use]
pub fn first_match(rules: &[ExtractionRule], text: &str) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(text))
}

/// Extract level and book candidates from raw recognized text.
///
/// Never fails: anything that does not match yields an empty field.
#[must_use]
pub fn extract(raw_text: &str) -> ExtractionResult {
    ExtractionResult {
        level: first_match(level_rules(), raw_text).unwrap_or_default(),
        book: first_match(book_rules(), raw_text).unwrap_or_default(),
    }
}
