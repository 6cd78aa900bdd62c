//! Fixed chord lookup table
//!
//! Maps an exact note set to a human-readable chord label. Built once at
//! startup and shared read-only between requests.

use std::collections::HashMap;

use super::notes::NoteSet;

/// Seed entries for the standard table: (notes, label)
const STANDARD_CHORDS: &[(&[&str], &str)] = &[
    (&["C", "E", "G"], "C Major"),
    (&["A", "C#", "E"], "A Major"),
    (&["A", "C", "E"], "A Minor"),
    (&["D", "F#", "A"], "D Major"),
    (&["E", "G#", "B"], "E Major"),
    (&["G", "B", "D"], "G Major"),
    (&["F", "A", "C"], "F Major"),
];

/// Immutable mapping from note set to chord label
#[derive(Debug, Clone, Default)]
pub struct ChordTable {
    entries: HashMap<NoteSet, String>,
}

impl ChordTable {
    /// Table seeded with the seven standard triads
    pub fn standard() -> Self {
        Self::from_entries(
            STANDARD_CHORDS
                .iter()
                .map(|(notes, label)| (notes.iter().copied(), *label)),
        )
    }

    /// Build a table from (notes, label) pairs
    ///
    /// Notes are case-normalized here so they line up with normalizer output.
    /// If two entries share a note set the later one wins.
    pub fn from_entries<E, N, S, L>(entries: E) -> Self
    where
        E: IntoIterator<Item = (N, L)>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(notes, label)| (NoteSet::from_notes(notes), label.into()))
            .collect();
        Self { entries }
    }

    /// Exact-set lookup; `None` when no entry matches
    pub fn lookup(&self, notes: &NoteSet) -> Option<&str> {
        self.entries.get(notes).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
