//! # Chord Diagram Module
//!
//! Turns a canonical [`Fingering`](crate::Fingering) into drawing geometry for a five-fret
//! chord box: nut or fret label, fret and string lines, and one marker per
//! string (X for muted, ring for open, dot for fretted).
//!
//! ## Sub-modules
//! - `geometry` - Layout computation (pure, no drawing surface)
//! - `svg` - SVG serialization of the geometry
//!
//! ## Base Fret
//! When the lowest fretted note sits above fret 2 the window slides up the
//! neck: `base_fret = min_fret - 1`, a `"{base_fret}fr"` label replaces the
//! nut, and each dot is drawn at `fret - (base_fret - 1)`. Dots that still
//! fall outside frets 1..=5 of the window are not drawn.
//!
//! ```
//! use chordsheet::{Fingering, diagram};
//!
//! let fingering = Fingering::new([-1, 3, 5, 5, 4, 3], [0, 1, 3, 4, 2, 1]);
//! let chart = diagram::render(&fingering, 100.0, 120.0);
//! assert_eq!(chart.base_fret(), Some(2));
//! ```

mod geometry;
mod svg;

pub use geometry::{
    base_fret, render, render_with, ChordChart, Diagram, Label, Marker, MarkerKind, Placeholder, Segment,
};
