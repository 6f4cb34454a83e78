pub mod api;
pub mod capo;
pub mod chord;
pub mod config;
pub mod convert;
pub mod diagram;
pub mod error;
pub mod fingering;
pub mod metronome;
pub mod parser;
pub mod render;
pub mod scroll;
pub mod transpose;

pub use api::*;
pub use capo::CapoSuggestion;
pub use chord::{normalize_chord_name, ChordName};
pub use config::ReaderConfig;
pub use diagram::Diagram;
pub use error::*;
pub use fingering::{chord_stats, ChordLibrary, ChordResolver, ChordStats, CustomChordStore, Fingering, LayeredResolver};
pub use parser::{extract_chords, extract_metadata, parse, Line, SongMetadata, Token};
pub use render::{RenderedSong, SongRenderer};
pub use scroll::AutoScroller;
pub use transpose::transpose_chord;
