//! SVG output for chord diagrams.

use super::geometry::{ChordChart, Diagram, Label, MarkerKind, Placeholder, Segment};

const INK: &str = "black";
const GRID: &str = "#444";
const MUTE: &str = "red";
const MUTED_TEXT: &str = "#888";

/// Accumulates SVG elements and produces the final document.
struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="4" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    fn line(&mut self, segment: &Segment, color: &str) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            segment.x1, segment.y1, segment.x2, segment.y2, color, segment.stroke_width
        ));
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: Option<&str>) {
        match stroke {
            Some(stroke) => self.elements.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" stroke="{}" stroke-width="1"/>"#,
                cx, cy, r, fill, stroke
            )),
            None => self.elements.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                cx, cy, r, fill
            )),
        }
    }

    fn text(&mut self, x: f64, y: f64, content: &str, size: f64, weight: &str, fill: &str, anchor: &str) {
        let escaped = content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x, y, size, weight, fill, anchor, escaped
        ));
    }

    fn label(&mut self, label: &Label) {
        self.text(label.x, label.y, &label.text, label.font_size, "bold", INK, "start");
    }
}

impl Diagram {
    /// Serialize the diagram as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        match self {
            Diagram::Chart(chart) => chart_svg(chart),
            Diagram::Placeholder(placeholder) => placeholder_svg(placeholder),
        }
    }
}

fn chart_svg(chart: &ChordChart) -> String {
    let mut svg = SvgBuilder::new(chart.width, chart.height);
    svg.rect(0.0, 0.0, chart.width, chart.height, "white");

    match (&chart.nut, &chart.fret_label) {
        (Some(nut), _) => svg.line(nut, INK),
        (None, Some(label)) => svg.label(label),
        (None, None) => {}
    }

    for fret in &chart.frets {
        svg.line(fret, GRID);
    }
    for string in &chart.strings {
        svg.line(string, GRID);
    }

    for marker in &chart.markers {
        match marker.kind {
            MarkerKind::Muted => svg.text(marker.x, marker.y, "X", marker.radius * 2.0, "normal", MUTE, "middle"),
            MarkerKind::Open => svg.circle(marker.x, marker.y, marker.radius, "white", Some(INK)),
            MarkerKind::Fretted { .. } => svg.circle(marker.x, marker.y, marker.radius, INK, None),
        }
    }

    svg.build()
}

fn placeholder_svg(placeholder: &Placeholder) -> String {
    let mut svg = SvgBuilder::new(placeholder.width, placeholder.height);
    svg.rect(0.0, 0.0, placeholder.width, placeholder.height, "rgba(255,255,255,0.05)");
    svg.text(
        placeholder.width / 2.0,
        placeholder.height / 2.0,
        &placeholder.label,
        10.0,
        "normal",
        MUTED_TEXT,
        "middle",
    );
    svg.build()
}

#[cfg(test)]
mod tests {
    use crate::diagram::render;
    use crate::fingering::Fingering;

    #[test]
    fn test_open_chord_svg() {
        let svg = render(&Fingering::new([-1, 3, 2, 0, 1, 0], [0; 6]), 100.0, 120.0).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"stroke-width="4.0""#));
        assert!(svg.contains(">X</text>"));
        assert!(svg.contains(r#"fill="white" stroke="black""#));
        assert!(!svg.contains("fr</text>"));
    }

    #[test]
    fn test_barre_chord_svg_has_fret_label() {
        let svg = render(&Fingering::new([-1, 3, 5, 5, 4, 3], [0; 6]), 100.0, 120.0).to_svg();
        assert!(svg.contains(">2fr</text>"));
        assert!(!svg.contains(r#"stroke-width="4.0""#));
    }

    #[test]
    fn test_placeholder_svg() {
        let svg = render(&Fingering::default(), 100.0, 120.0).to_svg();
        assert!(svg.contains(">No Data</text>"));
        assert!(!svg.contains("<line"));
    }
}
