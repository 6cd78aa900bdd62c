//! Chord identification
//!
//! - `notes`: raw input → canonical note names and note sets
//! - `table`: fixed note-set → label mapping
//! - `resolver`: lookup with model fallback, wrapped in instrumentation

pub mod notes;
pub mod resolver;
pub mod table;

pub use notes::{normalize, NoteSet};
pub use resolver::{ChordResolver, InvalidInputReason, ResolutionOutcome, PREDICT_ENDPOINT};
pub use table::ChordTable;
