//! Browser bindings for chordsheet.
//!
//! Values cross the boundary as JSON strings (song rendering) or as plain JS
//! objects through `serde-wasm-bindgen` (fingerings, diagrams, state).

mod scroller;

pub use scroller::ScrollController;

use chordsheet::convert::ChordSheet;
use chordsheet::fingering::{chord_stats, normalize, ChordLibrary, CustomChordStore, LayeredResolver};
use chordsheet::metronome::Metronome;
use chordsheet::render::{place_tooltip, select_chord, AnchorRect, ChordSelection, SongRenderer};
use chordsheet::{ChordSheetError, ReaderConfig};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct JsError {
    message: String,
}

fn to_js_error(e: ChordSheetError) -> JsValue {
    let message = e.to_string();
    let json = serde_json::to_string(&JsError { message: message.clone() }).unwrap_or(message);
    JsValue::from_str(&json)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn from_js(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

fn read_config(yaml: Option<String>) -> Result<ReaderConfig, JsValue> {
    match yaml {
        Some(yaml) => ReaderConfig::from_yaml(&yaml).map_err(to_js_error),
        None => Ok(ReaderConfig::default()),
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::warn!("logger was already initialized");
    }

    log::info!("chordsheet wasm module initialized");
}

/// Parse song text into lines of tokens, as JSON.
#[wasm_bindgen]
pub fn parse_song(content: &str) -> String {
    serde_json::to_string(&chordsheet::parse(content)).unwrap_or_else(|_| "[]".to_string())
}

/// Render song text for display, as JSON.
#[wasm_bindgen]
pub fn render_song(content: &str, transpose: i32, font_size: Option<f64>) -> Result<String, JsValue> {
    let mut renderer = SongRenderer::new(transpose);
    if let Some(size) = font_size {
        renderer = renderer.with_font_size(size);
    }
    serde_json::to_string(&renderer.render(content)).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn song_metadata(content: &str) -> Result<JsValue, JsValue> {
    to_js(&chordsheet::extract_metadata(content).entries)
}

#[wasm_bindgen]
pub fn song_chords(content: &str) -> Vec<String> {
    chordsheet::extract_chords(content)
}

#[wasm_bindgen]
pub fn transpose_chord(chord: &str, semitones: i32) -> String {
    chordsheet::transpose_chord(chord, semitones)
}

/// Capo advice for a song, or `null`.
#[wasm_bindgen]
pub fn suggest_capo(content: &str) -> Result<JsValue, JsValue> {
    to_js(&chordsheet::suggest_capo(content))
}

/// Canonical `{ frets, fingers }` for chord data in any stored shape.
#[wasm_bindgen]
pub fn normalize_fingering(data: JsValue) -> Result<JsValue, JsValue> {
    to_js(&normalize(&from_js(data)?))
}

/// SVG chord box for chord data in any stored shape.
#[wasm_bindgen]
pub fn chord_diagram_svg(data: JsValue, width: f64, height: f64) -> Result<String, JsValue> {
    let fingering = normalize(&from_js(data)?);
    Ok(chordsheet::diagram::render(&fingering, width, height).to_svg())
}

/// Diagram geometry (nut, grid, markers) for custom drawing.
#[wasm_bindgen]
pub fn chord_diagram(data: JsValue, width: f64, height: f64) -> Result<JsValue, JsValue> {
    let fingering = normalize(&from_js(data)?);
    to_js(&chordsheet::diagram::render(&fingering, width, height))
}

/// Tooltip anchor point for a chord label's bounding box.
#[wasm_bindgen]
pub fn tooltip_position(left: f64, top: f64, width: f64, height: f64, viewport_width: f64) -> Result<JsValue, JsValue> {
    to_js(&place_tooltip(
        AnchorRect {
            left,
            top,
            width,
            height,
        },
        viewport_width,
    ))
}

#[wasm_bindgen]
pub fn merge_chord_line(chords: &str, lyrics: &str) -> String {
    chordsheet::convert::merge_chord_line(chords, lyrics)
}

/// `{ title, artist, content }` with the header directives taken out of the body.
#[wasm_bindgen]
pub fn split_song_header(content: &str) -> Result<JsValue, JsValue> {
    to_js(&chordsheet::convert::split_header(content))
}

/// Song text from a chords-over-lyrics sheet (`{ title, sections: [...] }`).
#[wasm_bindgen]
pub fn convert_sections(sheet: JsValue) -> Result<String, JsValue> {
    let sheet: ChordSheet = serde_wasm_bindgen::from_value(sheet)?;
    Ok(chordsheet::convert::convert_sections(&sheet))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionView {
    #[serde(flatten)]
    selection: ChordSelection,
    svg: String,
}

/// The built-in chord library plus the user's own chords.
#[wasm_bindgen]
pub struct ChordBook {
    library: ChordLibrary,
    custom: CustomChordStore,
}

#[wasm_bindgen]
impl ChordBook {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ChordBook {
        ChordBook {
            library: ChordLibrary::builtin(),
            custom: CustomChordStore::new(),
        }
    }

    /// Replace the custom chords with a JSON array of definitions.
    pub fn load_custom(&mut self, json: &str) -> Result<(), JsValue> {
        self.custom = CustomChordStore::from_json(json).map_err(to_js_error)?;
        Ok(())
    }

    pub fn custom_json(&self) -> Result<String, JsValue> {
        self.custom.to_json().map_err(to_js_error)
    }

    /// Save a fingering; an existing chord gets it as a new variation.
    pub fn save_custom(&mut self, name: &str, category: &str, fingering: JsValue) -> Result<(), JsValue> {
        self.custom.save(name, category, Vec::new(), from_js(fingering)?);
        Ok(())
    }

    pub fn remove_custom(&mut self, name: &str) -> bool {
        self.custom.remove(name).is_some()
    }

    pub fn set_default_variation(&mut self, name: &str, index: usize) -> Result<(), JsValue> {
        self.custom.set_default_variation(name, index).map_err(to_js_error)
    }

    /// Copy library fingerings for a song's chords the user lacks; returns
    /// the names added.
    pub fn import_from_song(&mut self, content: &str) -> Vec<String> {
        self.custom.import_from_song(content, &self.library)
    }

    /// `{ total, existing, new, unknown }` chord coverage for a song.
    pub fn chord_stats(&self, content: &str) -> Result<JsValue, JsValue> {
        to_js(&chord_stats(content, &self.custom, &self.library))
    }

    /// Library chords matching a search string, as JSON.
    pub fn search(&self, query: &str) -> Result<String, JsValue> {
        serde_json::to_string(&self.library.search(query)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Diagram for a chord label clicked in a song, or `null` when the chord
    /// is unknown.
    pub fn select(&self, chord: &str, transpose: i32) -> Result<JsValue, JsValue> {
        let resolver = LayeredResolver::new(&self.custom, &self.library);
        let view = select_chord(chord, transpose, &resolver).map(|selection| SelectionView {
            svg: selection.diagram.to_svg(),
            selection,
        });
        to_js(&view)
    }
}

impl Default for ChordBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Metronome click timing against the page's `AudioContext` clock.
#[wasm_bindgen]
pub struct MetronomeScheduler {
    metronome: Metronome,
}

#[wasm_bindgen]
impl MetronomeScheduler {
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: Option<String>) -> Result<MetronomeScheduler, JsValue> {
        let config = read_config(config_yaml)?;
        Ok(MetronomeScheduler {
            metronome: Metronome::new(config.metronome),
        })
    }

    pub fn toggle(&mut self, now: f64) -> bool {
        self.metronome.toggle(now)
    }

    pub fn stop(&mut self) {
        self.metronome.stop();
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.metronome.set_bpm(bpm);
    }

    pub fn lookahead_ms(&self) -> f64 {
        self.metronome.lookahead_ms()
    }

    /// Clicks to queue now: `[{ time, beat, frequency }]`.
    pub fn schedule(&mut self, now: f64) -> Result<JsValue, JsValue> {
        to_js(&self.metronome.schedule(now))
    }
}
