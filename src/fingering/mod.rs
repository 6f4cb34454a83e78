//! # Fingering Module
//!
//! Guitar chord fingerings: the canonical six-string representation, the
//! normalizer that reads every stored shape into it, and the chord stores the
//! song renderer looks chords up in.
//!
//! ## Sub-modules
//! - `normalize` - Legacy shape reconciliation (`positions`, `strings`, `frets`)
//! - `library` - Built-in reference chords, user custom chords, resolvers,
//!   auto-import of a song's chords
//!
//! ## Canonical Form
//! Arrays run from the low E string (index 0, string "6") to the high e string
//! (index 5, string "1").
//!
//! - `frets[i]`: `-1` muted, `0` open, `n > 0` fretted at absolute fret `n`
//! - `fingers[i]`: `0` unassigned, `1..=4` index to little finger
//!
//! ## Stored Shapes
//! Chord data has been saved in three shapes over time and old records were
//! never migrated, so every read goes through [`normalize`]:
//!
//! ```text
//! { "strings": { "6": -1, "5": 3, ... }, "fingers": { "5": 3, ... } }
//! { "frets": [-1, 3, 2, 0, 1, 0], "fingers": [0, 3, 2, 0, 1, 0] }
//! { "positions": [ { "frets": [...] }, { "strings": {...} } ] }
//! ```

mod library;
mod normalize;

pub use library::{
    chord_stats, ChordDefinition, ChordLibrary, ChordResolver, ChordStats, CustomChordStore, LayeredResolver,
    AUTO_IMPORT_CATEGORY, AUTO_IMPORT_TAG,
};
pub use normalize::{fingers_from_value, frets_from_value, normalize, normalize_to_positions, variations};

use serde::{Deserialize, Serialize};

pub const STRING_COUNT: usize = 6;

/// String numbers in array order: index 0 is string 6 (low E).
pub const STRING_ORDER: [u8; STRING_COUNT] = [6, 5, 4, 3, 2, 1];

pub const MUTED: i32 = -1;
pub const OPEN: i32 = 0;

/// Canonical six-string fingering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingering {
    pub frets: [i32; STRING_COUNT],
    pub fingers: [u8; STRING_COUNT],
}

impl Default for Fingering {
    fn default() -> Self {
        Self {
            frets: [MUTED; STRING_COUNT],
            fingers: [0; STRING_COUNT],
        }
    }
}

impl Fingering {
    pub fn new(frets: [i32; STRING_COUNT], fingers: [u8; STRING_COUNT]) -> Self {
        Self { frets, fingers }
    }

    /// True when every string is muted (nothing to draw).
    pub fn is_silent(&self) -> bool {
        self.frets.iter().all(|&f| f == MUTED)
    }

    /// Fretted (> 0) positions across all strings.
    pub fn active_frets(&self) -> impl Iterator<Item = i32> + '_ {
        self.frets.iter().copied().filter(|&f| f > OPEN)
    }

    /// Lowest fretted position, if any string is fretted.
    pub fn min_fret(&self) -> Option<i32> {
        self.active_frets().min()
    }

    /// Highest fretted position, if any string is fretted.
    pub fn max_fret(&self) -> Option<i32> {
        self.active_frets().max()
    }

    /// Serialize as the `frets` array shape, the shape new variations are stored in.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "frets": self.frets,
            "fingers": self.fingers,
        })
    }
}
