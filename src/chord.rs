//! Chord name parsing
//!
//! Splits chord symbols (`Am7`, `F#m/C#`, `A7(b9)`) into root, suffix and
//! optional bass note, and normalizes the spellings users type in.

use serde::Serialize;

use crate::transpose::split_root;

/// A chord symbol broken into parts.
///
/// `root` is `[A-G][#b]?`, `bass` is set for slash chords. Names that do not
/// start with a note keep the whole input in `root` with an empty suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordName {
    pub root: String,
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
}

impl ChordName {
    /// # Examples
    /// ```
    /// use chordsheet::ChordName;
    ///
    /// let chord = ChordName::parse("F#m7/C#");
    /// assert_eq!(chord.root, "F#");
    /// assert_eq!(chord.suffix, "m7");
    /// assert_eq!(chord.bass.as_deref(), Some("C#"));
    /// ```
    pub fn parse(name: &str) -> Self {
        let normalized = normalize_chord_name(name);

        let Some((root, remaining)) = split_root(&normalized) else {
            return ChordName {
                root: name.to_string(),
                suffix: String::new(),
                bass: None,
            };
        };

        let (suffix, bass) = match remaining.rsplit_once('/') {
            Some((suffix, bass)) if is_note(bass) => (suffix, Some(bass.to_string())),
            _ => (remaining, None),
        };

        ChordName {
            root: root.to_string(),
            suffix: suffix.to_string(),
            bass,
        }
    }

    /// The chord without its bass note (`C/G` -> `C`).
    pub fn without_bass(&self) -> String {
        format!("{}{}", self.root, self.suffix)
    }
}

fn is_note(s: &str) -> bool {
    matches!(split_root(s), Some((_, "")))
}

/// Remove whitespace and map the Unicode accidentals to `#` and `b`.
pub fn normalize_chord_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '♯' => '#',
            '♭' => 'b',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let chord = ChordName::parse("Am");
        assert_eq!(chord.root, "A");
        assert_eq!(chord.suffix, "m");
        assert_eq!(chord.bass, None);
    }

    #[test]
    fn test_parse_slash_chord() {
        let chord = ChordName::parse("C/G");
        assert_eq!(chord.root, "C");
        assert_eq!(chord.suffix, "");
        assert_eq!(chord.bass.as_deref(), Some("G"));
        assert_eq!(chord.without_bass(), "C");
    }

    #[test]
    fn test_parse_unicode_accidentals() {
        let chord = ChordName::parse("B♭ maj7");
        assert_eq!(chord.root, "Bb");
        assert_eq!(chord.suffix, "maj7");
    }

    #[test]
    fn test_parse_extension_kept_in_suffix() {
        let chord = ChordName::parse("A7(b9)");
        assert_eq!(chord.root, "A");
        assert_eq!(chord.suffix, "7(b9)");
        assert_eq!(chord.bass, None);
    }

    #[test]
    fn test_parse_unrecognised() {
        let chord = ChordName::parse("N.C.");
        assert_eq!(chord.root, "N.C.");
        assert_eq!(chord.suffix, "");
    }

    #[test]
    fn test_normalize_chord_name() {
        assert_eq!(normalize_chord_name(" F♯ m "), "F#m");
    }
}
