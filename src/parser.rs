//! # ChordPro Parser
//!
//! Turns song text with inline `[Chord]` annotations into structured lines.
//!
//! ```text
//! "C'est un [C]beau roman"
//!   -> Text("C'est un ") Chord("C") Text("beau roman")
//! ```
//!
//! Lines whose first non-blank character is `{` are directives
//! (`{title: ...}`, `{capo: 2}`) and are kept verbatim; the renderer skips them.
//!
//! There is no escape for a literal `[`: an unterminated bracket swallows the
//! rest of the line as a chord annotation.

use serde::Serialize;
use std::collections::BTreeMap;

/// One piece of a song line: lyric text or a chord annotation (brackets stripped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Token {
    Text(String),
    Chord(String),
}

impl Token {
    pub fn content(&self) -> &str {
        match self {
            Token::Text(s) | Token::Chord(s) => s,
        }
    }
}

/// A parsed source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Line {
    Directive { content: String },
    Line { tokens: Vec<Token> },
}

/// Parse song content into lines. Never fails; empty input gives no lines.
pub fn parse(content: &str) -> Vec<Line> {
    if content.is_empty() {
        return Vec::new();
    }
    content.split('\n').map(parse_line).collect()
}

/// Parse a single line (without its trailing newline).
pub fn parse_line(line: &str) -> Line {
    if line.trim_start().starts_with('{') {
        return Line::Directive {
            content: line.to_string(),
        };
    }

    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c == '[' {
            if !buffer.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut buffer)));
            }
            // take_while also consumes the closing ']'
            let chord: String = chars.by_ref().take_while(|&c| c != ']').collect();
            tokens.push(Token::Chord(chord));
        } else {
            buffer.push(c);
        }
    }

    if !buffer.is_empty() {
        tokens.push(Token::Text(buffer));
    }

    Line::Line { tokens }
}

/// Metadata read from `{key: value}` directive lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongMetadata {
    pub entries: BTreeMap<String, String>,
}

impl SongMetadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.get("artist")
    }

    pub fn key(&self) -> Option<&str> {
        self.get("key")
    }

    /// Capo fret from `{capo: N}`; ignored when not a number.
    pub fn capo(&self) -> Option<u8> {
        self.get("capo").and_then(|v| v.parse().ok())
    }
}

/// Collect `{key: value}` pairs from every line. Keys are lower-cased and
/// trimmed, values trimmed; a later directive overrides an earlier one.
pub fn extract_metadata(content: &str) -> SongMetadata {
    let mut metadata = SongMetadata::default();
    for line in content.split('\n') {
        if let Some((key, value)) = split_directive(line) {
            metadata.entries.insert(key, value);
        }
    }
    metadata
}

fn split_directive(line: &str) -> Option<(String, String)> {
    let open = line.find('{')?;
    let body = &line[open + 1..];
    let colon = body.find(':')?;
    let close = body.rfind('}')?;
    if close < colon {
        return None;
    }
    let key = body[..colon].trim().to_lowercase();
    let value = body[colon + 1..close].trim().to_string();
    Some((key, value))
}

const QUALITIES: [&str; 8] = ["m", "maj", "min", "dim", "aug", "sus", "add", ""];

/// Unique chord names in first-seen order.
///
/// Only bracketed annotations that look like chord symbols are collected:
/// root, optional accidental, optional quality (`m`, `maj`, `min`, `dim`,
/// `aug`, `sus`, `add`), digits, an optional parenthesised extension and an
/// optional slash bass, e.g. `[Am7]`, `[A7(b9)]`, `[C/G]`. Letters match in
/// any case, so hand-typed `[am]` counts too; names keep the spelling they
/// were written with.
pub fn extract_chords(content: &str) -> Vec<String> {
    let mut chords: Vec<String> = Vec::new();
    let mut rest = content;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        if let Some(close) = after.find(']') {
            let inner = &after[..close];
            if is_chord_symbol(inner) {
                let name = inner.trim().to_string();
                if !name.is_empty() && !chords.contains(&name) {
                    chords.push(name);
                }
            }
        }
        rest = after;
    }

    chords
}

fn is_chord_symbol(s: &str) -> bool {
    let Some(rest) = strip_note(s) else {
        return false;
    };
    QUALITIES
        .iter()
        .any(|quality| strip_prefix_ignore_case(rest, quality).map_or(false, is_chord_tail))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Strip a leading `[A-G][#b]?`, ignoring case.
fn strip_note(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    match chars.next() {
        Some('A'..='G' | 'a'..='g') => {}
        _ => return None,
    }
    let rest = chars.as_str();
    Some(rest.strip_prefix(['#', 'b', 'B']).unwrap_or(rest))
}

fn is_chord_tail(s: &str) -> bool {
    let mut rest = s.trim_start_matches(|c: char| c.is_ascii_digit());

    if let Some(inner) = rest.strip_prefix('(') {
        match inner.find(')') {
            Some(close) => rest = &inner[close + 1..],
            None => return false,
        }
    }

    if let Some(bass) = rest.strip_prefix('/') {
        match strip_note(bass) {
            Some(after) => rest = after,
            None => return false,
        }
    }

    rest.is_empty()
}
