//! # Public API
//!
//! Entry points that tie the components together for the common cases.
//!
//! - [`render_song()`] - Parse and transpose a song into display lines
//! - [`render_song_with_config()`] - Same, with diagram settings from a [`ReaderConfig`]
//! - [`suggest_capo()`] - Capo advice for the chords used in a song
//! - [`chord_diagram()`] - Diagram for a chord name from any resolver
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordsheet::{render_song, suggest_capo};
//!
//! let song = "{title: Example}\n[F#]One [C#]two [A#m]three";
//!
//! let rendered = render_song(song, 0);
//! assert_eq!(rendered.lines.len(), 1);
//!
//! let capo = suggest_capo(song).unwrap();
//! assert_eq!(capo.capo, 6);
//! ```

use crate::capo::{self, CapoSuggestion};
use crate::config::ReaderConfig;
use crate::fingering::ChordResolver;
use crate::parser::extract_chords;
use crate::render::{select_chord_with, ChordSelection, RenderedSong, SongRenderer};

/// Render song text with every chord transposed by `transpose` semitones.
pub fn render_song(content: &str, transpose: i32) -> RenderedSong {
    SongRenderer::new(transpose).render(content)
}

pub fn render_song_with_config(content: &str, transpose: i32, config: &ReaderConfig) -> RenderedSong {
    SongRenderer::new(transpose)
        .with_diagram_config(config.diagram.clone())
        .render(content)
}

/// Capo advice for the chords a song uses, with default thresholds.
pub fn suggest_capo(content: &str) -> Option<CapoSuggestion> {
    capo::suggest(&extract_chords(content))
}

pub fn suggest_capo_with_config(content: &str, config: &ReaderConfig) -> Option<CapoSuggestion> {
    capo::suggest_with(&extract_chords(content), &config.capo)
}

/// Diagram for `name` as the reader sees it (already transposed).
pub fn chord_diagram<R: ChordResolver>(name: &str, resolver: &R, config: &ReaderConfig) -> Option<ChordSelection> {
    select_chord_with(name, 0, resolver, &config.diagram)
}
