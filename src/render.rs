//! # Song Renderer
//!
//! Builds the display model of a song: one [`RenderedLine`] per source line,
//! each a row of chord/text groups with the transposed chord label that is
//! painted above the lyric. Directive lines are dropped.
//!
//! Diagrams are looked up on demand with [`select_chord`] when the reader
//! hovers or taps a chord label. A name the resolver does not know simply has
//! no diagram.
//!
//! ```
//! use chordsheet::render::SongRenderer;
//!
//! let song = SongRenderer::new(2).render("[Am]Hello [C]World");
//! let groups = &song.lines[0].groups;
//! assert_eq!(groups[0].label.as_deref(), Some("Bm"));
//! assert_eq!(groups[0].text, "Hello ");
//! assert_eq!(groups[1].label.as_deref(), Some("D"));
//! ```

use serde::Serialize;

use crate::config::DiagramConfig;
use crate::diagram::{render_with, Diagram};
use crate::fingering::{normalize, variations, ChordResolver, Fingering};
use crate::parser::{parse, Line, Token};
use crate::transpose::transpose_chord;

pub const DEFAULT_FONT_SIZE: f64 = 16.0;

pub const TOOLTIP_WIDTH: f64 = 140.0;
pub const TOOLTIP_HEIGHT: f64 = 180.0;
pub const TOOLTIP_MARGIN: f64 = 10.0;
/// Extra room left under the anchor when the tooltip flips below it.
const TOOLTIP_FLIP_GAP: f64 = 20.0;

/// A chord annotation and the lyric text it sits over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChordGroup {
    pub chord: Option<String>,
    pub text: String,
}

/// Group a line's tokens so each chord owns the text that follows it.
///
/// A chord opens a new group, a text token closes the current one. A chord
/// followed directly by another chord keeps an empty text; text before the
/// first chord forms a group without a chord.
pub fn group_tokens(tokens: &[Token]) -> Vec<ChordGroup> {
    let mut groups = Vec::new();
    let mut current = ChordGroup::default();

    for token in tokens {
        match token {
            Token::Chord(name) => {
                if !current.text.is_empty() || current.chord.is_some() {
                    groups.push(std::mem::take(&mut current));
                }
                // `[]` carries no chord
                current.chord = Some(name.clone()).filter(|n| !n.is_empty());
            }
            Token::Text(text) => {
                current.text = text.clone();
                groups.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.text.is_empty() || current.chord.is_some() {
        groups.push(current);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGroup {
    /// Chord as written in the source.
    pub chord: Option<String>,
    /// Chord after transposition; this is what gets displayed.
    pub label: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    pub groups: Vec<RenderedGroup>,
}

impl RenderedLine {
    pub fn is_blank(&self) -> bool {
        self.groups.is_empty()
    }

    /// Chord row and lyric row as plain text, each chord left-aligned over
    /// its lyric.
    pub fn to_text_rows(&self) -> (String, String) {
        let mut chords = String::new();
        let mut lyrics = String::new();
        for group in &self.groups {
            let label = group.label.as_deref().unwrap_or("");
            let width = group.text.chars().count().max(label.chars().count() + 1);
            chords.push_str(&format!("{:<width$}", label, width = width));
            lyrics.push_str(&format!("{:<width$}", group.text, width = width));
        }
        (chords.trim_end().to_string(), lyrics.trim_end().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSong {
    pub font_size: f64,
    pub transpose: i32,
    pub lines: Vec<RenderedLine>,
}

impl RenderedSong {
    /// Unique displayed chord labels in first-seen order.
    pub fn chords(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let labels = self
            .lines
            .iter()
            .flat_map(|line| &line.groups)
            .filter_map(|group| group.label.as_deref());
        for label in labels {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }

    /// Plain-text rendering with chords above lyrics.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let (chords, lyrics) = line.to_text_rows();
            if !chords.is_empty() {
                out.push_str(&chords);
                out.push('\n');
            }
            out.push_str(&lyrics);
            out.push('\n');
        }
        out
    }
}

/// The chord picked by the reader, with its fingerings and the diagram of
/// the default variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordSelection {
    pub name: String,
    pub variations: Vec<Fingering>,
    pub diagram: Diagram,
}

#[derive(Debug, Clone)]
pub struct SongRenderer {
    pub transpose: i32,
    pub font_size: f64,
    pub diagram: DiagramConfig,
}

impl Default for SongRenderer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SongRenderer {
    pub fn new(transpose: i32) -> Self {
        Self {
            transpose,
            font_size: DEFAULT_FONT_SIZE,
            diagram: DiagramConfig::default(),
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_diagram_config(mut self, diagram: DiagramConfig) -> Self {
        self.diagram = diagram;
        self
    }

    pub fn render(&self, content: &str) -> RenderedSong {
        let lines = parse(content)
            .into_iter()
            .filter_map(|line| match line {
                Line::Directive { .. } => None,
                Line::Line { tokens } => Some(self.render_tokens(&tokens)),
            })
            .collect();

        RenderedSong {
            font_size: self.font_size,
            transpose: self.transpose,
            lines,
        }
    }

    fn render_tokens(&self, tokens: &[Token]) -> RenderedLine {
        let groups = group_tokens(tokens)
            .into_iter()
            .map(|group| RenderedGroup {
                label: group.chord.as_deref().map(|c| transpose_chord(c, self.transpose)),
                chord: group.chord,
                text: group.text,
            })
            .collect();
        RenderedLine { groups }
    }

    /// Resolve the diagram for a chord as written in the source.
    pub fn select<R: ChordResolver>(&self, chord: &str, resolver: &R) -> Option<ChordSelection> {
        select_chord_with(chord, self.transpose, resolver, &self.diagram)
    }
}

/// Look up a chord label for display: trim, transpose, resolve, normalize,
/// lay out. Returns `None` when the transposed name is unknown.
pub fn select_chord<R: ChordResolver>(chord: &str, transpose: i32, resolver: &R) -> Option<ChordSelection> {
    select_chord_with(chord, transpose, resolver, &DiagramConfig::default())
}

pub fn select_chord_with<R: ChordResolver>(
    chord: &str,
    transpose: i32,
    resolver: &R,
    config: &DiagramConfig,
) -> Option<ChordSelection> {
    let name = transpose_chord(chord.trim(), transpose);
    let Some(data) = resolver.resolve(&name) else {
        log::debug!("no fingering for chord '{}'", name);
        return None;
    };

    let diagram = render_with(&normalize(data), config);
    Some(ChordSelection {
        variations: variations(data),
        name,
        diagram,
    })
}

/// Bounding box of the element the tooltip points at, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Where the tooltip's anchor point goes: `x` is its horizontal center, `y`
/// its bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
}

/// Keep the chord tooltip inside the viewport. It is centered above the
/// anchor and flipped below it when there is no room on top.
pub fn place_tooltip(anchor: AnchorRect, viewport_width: f64) -> TooltipPosition {
    let half = TOOLTIP_WIDTH / 2.0;
    let mut x = anchor.left + anchor.width / 2.0;
    let mut y = anchor.top;

    if x - half < TOOLTIP_MARGIN {
        x = half + TOOLTIP_MARGIN;
    }
    if x + half > viewport_width - TOOLTIP_MARGIN {
        x = viewport_width - half - TOOLTIP_MARGIN;
    }
    if y - TOOLTIP_HEIGHT < TOOLTIP_MARGIN {
        y = anchor.bottom() + TOOLTIP_HEIGHT + TOOLTIP_FLIP_GAP;
    }

    TooltipPosition { x, y }
}
