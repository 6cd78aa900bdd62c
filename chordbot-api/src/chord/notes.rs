//! Note name normalization
//!
//! Raw input is a comma-delimited list of note tokens typed by a user.
//! Normalized tokens are trimmed and upper-cased; no enharmonic folding
//! is applied ("C#" and "DB" stay distinct).

use std::collections::BTreeSet;
use std::fmt;

/// Token delimiter accepted on input
pub const NOTE_DELIMITER: char = ',';

/// Split raw input into canonical note names
///
/// Preserves input order and repetition. Empty tokens produced by
/// consecutive, leading or trailing delimiters are dropped.
pub fn normalize(raw: &str) -> Vec<String> {
    raw.split(NOTE_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Unordered, duplicate-free collection of canonical note names
///
/// Identity of a chord query: order and repetition in the input do not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NoteSet(BTreeSet<String>);

impl NoteSet {
    /// Build a set from already-normalized note names
    pub fn from_notes<I, S>(notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(notes.into_iter().map(|n| n.as_ref().to_uppercase()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, note: &str) -> bool {
        self.0.contains(&note.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for NoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", joined.join(", "))
    }
}
