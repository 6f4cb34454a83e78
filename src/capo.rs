//! Capo suggestions.
//!
//! Scores how hard a set of chord shapes is to play and looks for a capo fret
//! that makes the same song noticeably easier. A capo on fret N sounds N
//! semitones higher, so the shapes to play are the song's chords transposed
//! down by N.
//!
//! This is a rough heuristic over chord names only, not a playability model.

use serde::Serialize;

use crate::config::CapoConfig;
use crate::transpose::transpose_chord;

/// Open-position shapes that cost nothing.
pub const OPEN_CHORDS: [&str; 15] = [
    "C", "A", "G", "E", "D", "Am", "Em", "Dm", "Cmaj7", "A7", "E7", "D7", "G7", "C7", "B7",
];

/// Chords with an accidental usually mean a barre.
pub const BARRE_PENALTY: u32 = 5;
/// Common semi-barre shapes.
pub const SEMI_BARRE_PENALTY: u32 = 4;
pub const SEMI_BARRE_CHORDS: [&str; 2] = ["F", "Bm"];
/// Natural chords that are not open shapes (B, Cm, ...).
pub const OTHER_PENALTY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapoSuggestion {
    pub capo: u8,
    pub original_score: u32,
    pub new_score: u32,
}

fn chord_cost(chord: &str) -> u32 {
    let bare = chord.split('/').next().unwrap_or(chord);
    if OPEN_CHORDS.contains(&bare) {
        0
    } else if bare.contains('#') || bare.contains('b') {
        BARRE_PENALTY
    } else if SEMI_BARRE_CHORDS.contains(&bare) {
        SEMI_BARRE_PENALTY
    } else {
        OTHER_PENALTY
    }
}

fn unique<'a>(chords: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for chord in chords {
        if !seen.contains(&chord) {
            seen.push(chord);
        }
    }
    seen
}

/// Difficulty of a chord set (lower is easier). Duplicates count once and
/// slash basses are ignored.
pub fn difficulty<S: AsRef<str>>(chords: &[S]) -> u32 {
    unique(chords.iter().map(|c| c.as_ref()))
        .into_iter()
        .map(chord_cost)
        .sum()
}

/// Suggest a capo with the default thresholds (frets 1-9, 30% easier).
///
/// ```
/// use chordsheet::capo::suggest;
///
/// assert!(suggest(&["C", "G", "Am", "Em"]).is_none());
///
/// let suggestion = suggest(&["F#", "C#", "A#m"]).unwrap();
/// assert!(suggestion.new_score < suggestion.original_score);
/// ```
pub fn suggest<S: AsRef<str>>(chords: &[S]) -> Option<CapoSuggestion> {
    suggest_with(chords, &CapoConfig::default())
}

pub fn suggest_with<S: AsRef<str>>(chords: &[S], config: &CapoConfig) -> Option<CapoSuggestion> {
    let chords = unique(chords.iter().map(|c| c.as_ref()));
    let original_score = difficulty(&chords);

    if original_score < config.easy_floor {
        return None;
    }

    let mut best_capo = 0;
    let mut min_score = original_score;

    for capo in 1..=config.max_capo {
        let shapes: Vec<String> = chords
            .iter()
            .map(|c| transpose_chord(c, -i32::from(capo)))
            .collect();
        let score = difficulty(&shapes);
        if score < min_score {
            min_score = score;
            best_capo = capo;
        }
    }

    let threshold = f64::from(original_score) * (1.0 - config.min_improvement);
    if best_capo > 0 && f64::from(min_score) < threshold {
        log::debug!(
            "capo {} lowers difficulty from {} to {}",
            best_capo,
            original_score,
            min_score
        );
        Some(CapoSuggestion {
            capo: best_capo,
            original_score,
            new_score: min_score,
        })
    } else {
        None
    }
}
