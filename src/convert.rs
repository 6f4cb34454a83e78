//! Chord-over-lyrics conversion.
//!
//! Songs copied from the web or read from a photo usually put chords on their
//! own line, aligned by column above the lyric:
//!
//! ```text
//! Am       G        C
//! Hello darkness my old
//! ```
//!
//! [`merge_chord_line`] turns such a pair into inline notation
//! (`[Am]Hello dar[G]kness my [C]old`) and [`convert_sections`] assembles a
//! whole song with its directives.

use serde::{Deserialize, Serialize};

/// Quality fragments a chord may chain after its root, longest first.
const QUALITY_PARTS: [&str; 12] = ["maj", "min", "dim", "aug", "sus", "add", "11", "13", "m", "7", "9", "M"];

/// What the photo importer writes for a title or artist it could not read.
pub const UNKNOWN_PLACEHOLDER: &str = "Inconnu";

/// Header directives removed by [`split_header`].
const HEADER_KEYS: [&str; 4] = ["title", "artist", "key", "capo"];

/// A chords line and the lyric under it. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetLine {
    pub chords: String,
    pub lyrics: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetSection {
    /// Shown as a `{comment: ...}` header ("Verse 1", "Chorus").
    pub label: Option<String>,
    #[serde(alias = "content")]
    pub lines: Vec<SheetLine>,
}

/// A song in chords-over-lyrics form, as produced by an importer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChordSheet {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub capo: Option<u8>,
    pub sections: Vec<SheetSection>,
}

/// Chord symbols in a chords line with their character column.
pub fn find_chords(line: &str) -> Vec<(usize, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match match_chord(&chars, i) {
            Some(end) => {
                found.push((i, chars[i..end].iter().collect()));
                i = end;
            }
            None => i += 1,
        }
    }
    found
}

/// End index of the chord symbol starting at `start`, if any.
fn match_chord(chars: &[char], start: usize) -> Option<usize> {
    let mut i = match_note(chars, start)?;

    'parts: loop {
        for part in QUALITY_PARTS {
            if starts_with_at(chars, i, part) {
                i += part.len();
                continue 'parts;
            }
        }
        break;
    }

    while chars.get(i).is_some_and(char::is_ascii_digit) {
        i += 1;
    }

    if chars.get(i) == Some(&'(') {
        if let Some(close) = chars[i..].iter().position(|&c| c == ')') {
            i += close + 1;
        }
    }

    if chars.get(i) == Some(&'/') {
        if let Some(end) = match_note(chars, i + 1) {
            i = end;
        }
    }

    Some(i)
}

fn match_note(chars: &[char], start: usize) -> Option<usize> {
    match chars.get(start) {
        Some('A'..='G') => {}
        _ => return None,
    }
    match chars.get(start + 1) {
        Some('#') | Some('b') => Some(start + 2),
        _ => Some(start + 1),
    }
}

fn starts_with_at(chars: &[char], at: usize, part: &str) -> bool {
    let mut i = at;
    for c in part.chars() {
        if chars.get(i) != Some(&c) {
            return false;
        }
        i += 1;
    }
    true
}

/// Insert the chords of `chords_line` into `lyrics_line` at their columns.
///
/// Chords past the end of the lyric are appended. A blank lyric gives the
/// chords alone, space separated; a blank chords line gives the lyric.
///
/// ```
/// use chordsheet::convert::merge_chord_line;
///
/// assert_eq!(
///     merge_chord_line("Am       G        C", "Hello darkness my old"),
///     "[Am]Hello dar[G]kness my [C]old"
/// );
/// assert_eq!(merge_chord_line("G  D/F#", ""), "[G] [D/F#]");
/// ```
pub fn merge_chord_line(chords_line: &str, lyrics_line: &str) -> String {
    if chords_line.trim().is_empty() {
        return lyrics_line.to_string();
    }

    let chords = find_chords(chords_line);
    if lyrics_line.trim().is_empty() {
        return chords
            .iter()
            .map(|(_, chord)| format!("[{}]", chord))
            .collect::<Vec<_>>()
            .join(" ");
    }
    if chords.is_empty() {
        return lyrics_line.to_string();
    }

    let lyrics: Vec<char> = lyrics_line.chars().collect();
    let mut merged = String::with_capacity(lyrics_line.len() + chords.len() * 4);
    let mut last = 0;

    for (column, chord) in &chords {
        let at = (*column).min(lyrics.len());
        if at > last {
            merged.extend(&lyrics[last..at]);
        }
        merged.push('[');
        merged.push_str(chord);
        merged.push(']');
        last = at;
    }
    merged.extend(&lyrics[last..]);
    merged
}

/// Build inline-chord song text from a chord sheet: directives first, then
/// each section behind a `{comment: label}` header, separated by blank lines.
pub fn convert_sections(sheet: &ChordSheet) -> String {
    let mut lines: Vec<String> = Vec::new();

    let known = |value: &Option<String>| value.clone().filter(|v| v.trim() != UNKNOWN_PLACEHOLDER);
    let directives = [
        ("title", known(&sheet.title)),
        ("artist", known(&sheet.artist)),
        ("key", sheet.key.clone()),
        ("capo", sheet.capo.filter(|&c| c > 0).map(|c| c.to_string())),
    ];
    for (key, value) in directives {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            lines.push(format!("{{{}: {}}}", key, value.trim()));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    for section in &sheet.sections {
        if let Some(label) = section.label.as_deref().filter(|l| !l.trim().is_empty()) {
            lines.push(format!("{{comment: {}}}", label.trim()));
        }
        for line in &section.lines {
            lines.push(merge_chord_line(&line.chords, &line.lyrics));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

/// Title and artist pulled out of song text, with the header directives
/// (`title`, `artist`, `key`, `capo`) removed from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongHeader {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub content: String,
}

/// Split song text into its header and the remaining body. Directive keys
/// match in any case; the first `title` and `artist` win.
pub fn split_header(content: &str) -> SongHeader {
    let mut header = SongHeader::default();
    let mut body = content.to_string();
    for key in HEADER_KEYS {
        let (rest, value) = take_directive(&body, key);
        match key {
            "title" => header.title = value,
            "artist" => header.artist = value,
            _ => {}
        }
        body = rest;
    }
    header.content = body.trim().to_string();
    header
}

/// Remove every non-empty `{key: ...}` and return the first value.
fn take_directive(content: &str, key: &str) -> (String, Option<String>) {
    let lower = content.to_ascii_lowercase();
    let opener = format!("{{{}:", key);
    let mut rest = String::with_capacity(content.len());
    let mut first = None;
    let mut copied = 0;
    let mut search = 0;

    while let Some(found) = lower[search..].find(&opener) {
        let start = search + found;
        let value_start = start + opener.len();
        match content[value_start..].find('}') {
            Some(len) if len > 0 => {
                if first.is_none() {
                    first = Some(content[value_start..value_start + len].trim().to_string());
                }
                rest.push_str(&content[copied..start]);
                copied = value_start + len + 1;
                search = copied;
            }
            _ => search = value_start,
        }
    }
    rest.push_str(&content[copied..]);

    (rest, first.filter(|v| !v.is_empty()))
}
