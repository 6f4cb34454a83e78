//! Chord box layout.

use serde::Serialize;

use crate::config::DiagramConfig;
use crate::fingering::{Fingering, MUTED, OPEN, STRING_COUNT};

pub const NO_DATA: &str = "No Data";

const NUT_WIDTH: f64 = 4.0;
const FRET_WIDTH: f64 = 1.0;
const BASS_STRING_WIDTH: f64 = 1.5;
const TREBLE_STRING_WIDTH: f64 = 1.0;
const LABEL_SIZE: f64 = 10.0;
const MUTE_SIZE: f64 = 12.0;
const OPEN_RADIUS: f64 = 3.0;
const DOT_RADIUS: f64 = 5.0;

/// A straight line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
}

/// A text label anchored at its start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkerKind {
    /// "X" above the nut.
    Muted,
    /// Small ring above the nut.
    Open,
    /// Filled dot between two frets of the window.
    #[serde(rename_all = "camelCase")]
    Fretted { fret: i32, relative_fret: i32, finger: u8 },
}

/// What is drawn for one string. `x`/`y` is the marker's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Array index, 0 = low E.
    pub string: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub kind: MarkerKind,
}

/// Grid and markers for a drawable fingering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordChart {
    pub width: f64,
    pub height: f64,
    pub base_fret: i32,
    /// Drawn only when the window starts at the first fret.
    pub nut: Option<Segment>,
    /// `"{base_fret}fr"`, drawn instead of the nut.
    pub fret_label: Option<Label>,
    pub frets: Vec<Segment>,
    pub strings: Vec<Segment>,
    pub markers: Vec<Marker>,
}

/// Neutral box shown when there is nothing to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub width: f64,
    pub height: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagram {
    Chart(ChordChart),
    Placeholder(Placeholder),
}

impl Diagram {
    pub fn base_fret(&self) -> Option<i32> {
        match self {
            Diagram::Chart(chart) => Some(chart.base_fret),
            Diagram::Placeholder(_) => None,
        }
    }

    pub fn chart(&self) -> Option<&ChordChart> {
        match self {
            Diagram::Chart(chart) => Some(chart),
            Diagram::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Diagram::Placeholder(_))
    }
}

/// First fret of the visible window.
pub fn base_fret(fingering: &Fingering) -> i32 {
    match fingering.min_fret() {
        Some(min) if min > 2 => min - 1,
        _ => 1,
    }
}

/// Lay out a diagram with the default paddings at the given size.
pub fn render(fingering: &Fingering, width: f64, height: f64) -> Diagram {
    let config = DiagramConfig {
        width,
        height,
        ..DiagramConfig::default()
    };
    render_with(fingering, &config)
}

/// Lay out a diagram using a full diagram configuration.
pub fn render_with(fingering: &Fingering, config: &DiagramConfig) -> Diagram {
    let width = config.width;
    let height = config.height;

    if fingering.is_silent() {
        return Diagram::Placeholder(Placeholder {
            width,
            height,
            label: NO_DATA.to_string(),
        });
    }

    let visible_frets = i32::from(config.visible_frets.max(1));
    let pad_x = config.padding_x;
    let pad_y = config.padding_y;
    let string_spacing = (width - 2.0 * pad_x) / (STRING_COUNT - 1) as f64;
    let fret_spacing = (height - 2.0 * pad_y) / f64::from(visible_frets);
    let string_x = |i: usize| pad_x + i as f64 * string_spacing;

    let base = base_fret(fingering);

    let (nut, fret_label) = if base > 1 {
        let label = Label {
            x: pad_x - 8.0,
            y: pad_y + fret_spacing / 2.0,
            text: format!("{}fr", base),
            font_size: LABEL_SIZE,
        };
        (None, Some(label))
    } else {
        let nut = Segment {
            x1: pad_x,
            y1: pad_y,
            x2: width - pad_x,
            y2: pad_y,
            stroke_width: NUT_WIDTH,
        };
        (Some(nut), None)
    };

    let frets = (0..=visible_frets)
        .map(|i| {
            let y = pad_y + f64::from(i) * fret_spacing;
            Segment {
                x1: pad_x,
                y1: y,
                x2: width - pad_x,
                y2: y,
                stroke_width: FRET_WIDTH,
            }
        })
        .collect();

    let strings = (0..STRING_COUNT)
        .map(|i| Segment {
            x1: string_x(i),
            y1: pad_y,
            x2: string_x(i),
            y2: height - pad_y,
            stroke_width: if i > 2 { TREBLE_STRING_WIDTH } else { BASS_STRING_WIDTH },
        })
        .collect();

    let markers = fingering
        .frets
        .iter()
        .zip(fingering.fingers)
        .enumerate()
        .filter_map(|(string, (&fret, finger))| {
            let x = string_x(string);
            match fret {
                MUTED => Some(Marker {
                    string,
                    x,
                    y: pad_y - 5.0,
                    radius: MUTE_SIZE / 2.0,
                    kind: MarkerKind::Muted,
                }),
                OPEN => Some(Marker {
                    string,
                    x,
                    y: pad_y - 8.0,
                    radius: OPEN_RADIUS,
                    kind: MarkerKind::Open,
                }),
                fret => {
                    let relative_fret = fret - (base - 1);
                    if relative_fret < 1 || relative_fret > visible_frets {
                        return None;
                    }
                    Some(Marker {
                        string,
                        x,
                        y: pad_y + (f64::from(relative_fret) - 0.5) * fret_spacing,
                        radius: DOT_RADIUS,
                        kind: MarkerKind::Fretted {
                            fret,
                            relative_fret,
                            finger,
                        },
                    })
                }
            }
        })
        .collect();

    Diagram::Chart(ChordChart {
        width,
        height,
        base_fret: base,
        nut,
        fret_label,
        frets,
        strings,
        markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(frets: [i32; 6]) -> ChordChart {
        match render(&Fingering::new(frets, [0; 6]), 100.0, 120.0) {
            Diagram::Chart(chart) => chart,
            Diagram::Placeholder(_) => panic!("expected a chart"),
        }
    }

    fn fretted(chart: &ChordChart, string: usize) -> Option<(i32, i32)> {
        chart.markers.iter().find(|m| m.string == string).and_then(|m| match m.kind {
            MarkerKind::Fretted { fret, relative_fret, .. } => Some((fret, relative_fret)),
            _ => None,
        })
    }

    #[test]
    fn test_base_fret_rule() {
        let chart = chart([-1, 3, 5, 5, 4, 3]);
        assert_eq!(chart.base_fret, 2);
        assert_eq!(fretted(&chart, 1), Some((3, 2)));
        assert_eq!(fretted(&chart, 2), Some((5, 4)));
        assert!(chart.nut.is_none());
        assert_eq!(chart.fret_label.as_ref().map(|l| l.text.as_str()), Some("2fr"));
    }

    #[test]
    fn test_open_position_draws_nut() {
        let chart = chart([-1, 3, 2, 0, 1, 0]);
        assert_eq!(chart.base_fret, 1);
        assert!(chart.nut.is_some());
        assert!(chart.fret_label.is_none());
        assert_eq!(chart.markers.len(), 6);
        assert_eq!(chart.markers[0].kind, MarkerKind::Muted);
        assert_eq!(chart.markers[3].kind, MarkerKind::Open);
    }

    #[test]
    fn test_min_fret_two_keeps_nut() {
        assert_eq!(chart([-1, 2, 4, 4, 4, 2]).base_fret, 1);
    }

    #[test]
    fn test_grid_dimensions() {
        let chart = chart([0, 2, 2, 1, 0, 0]);
        assert_eq!(chart.frets.len(), 6);
        assert_eq!(chart.strings.len(), 6);
        assert_eq!(chart.strings[0].x1, 15.0);
        assert_eq!(chart.strings[5].x1, 85.0);
        assert_eq!(chart.frets[5].y1, 100.0);
        assert_eq!(chart.strings[0].stroke_width, 1.5);
        assert_eq!(chart.strings[5].stroke_width, 1.0);
    }

    #[test]
    fn test_dot_position() {
        let chart = chart([0, 2, 2, 1, 0, 0]);
        let dot = chart.markers.iter().find(|m| m.string == 3).unwrap();
        // fret spacing is (120 - 40) / 5 = 16; fret 1 sits half a fret below the nut
        assert_eq!(dot.y, 28.0);
        assert_eq!(dot.x, 57.0);
    }

    #[test]
    fn test_notes_outside_window_are_dropped() {
        // span of 8 frets: window starts at 2 and shows 2..=6
        let chart = chart([3, -1, -1, -1, -1, 10]);
        assert_eq!(chart.base_fret, 2);
        assert_eq!(fretted(&chart, 0), Some((3, 2)));
        assert!(chart.markers.iter().all(|m| m.string != 5));
    }

    #[test]
    fn test_all_muted_is_placeholder() {
        let diagram = render(&Fingering::default(), 100.0, 120.0);
        assert!(diagram.is_placeholder());
        assert_eq!(diagram.base_fret(), None);
    }

    #[test]
    fn test_finger_carried_on_dot() {
        let diagram = render(&Fingering::new([-1, 0, 2, 2, 1, 0], [0, 0, 2, 3, 1, 0]), 100.0, 120.0);
        let chart = diagram.chart().unwrap();
        let dot = chart.markers.iter().find(|m| m.string == 4).unwrap();
        assert_eq!(dot.kind, MarkerKind::Fretted { fret: 1, relative_fret: 1, finger: 1 });
    }
}
