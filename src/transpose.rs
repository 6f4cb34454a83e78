//! Chord transposition by semitones.
//!
//! Only the root (and the bass of a slash chord) moves; the suffix is carried
//! through byte for byte. Output always uses sharp spelling, whatever the
//! input spelling or the song's key.

pub const NOTES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
pub const NOTES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Pitch class (0 = C) of a note name in sharp or flat spelling.
pub fn pitch_class(note: &str) -> Option<usize> {
    NOTES_SHARP
        .iter()
        .position(|n| *n == note)
        .or_else(|| NOTES_FLAT.iter().position(|n| *n == note))
}

/// Split a chord into its `[A-G][#b]?` root and the rest.
pub fn split_root(chord: &str) -> Option<(&str, &str)> {
    let bytes = chord.as_bytes();
    match bytes.first() {
        Some(b'A'..=b'G') => {}
        _ => return None,
    }
    let len = match bytes.get(1) {
        Some(b'#') | Some(b'b') => 2,
        _ => 1,
    };
    Some(chord.split_at(len))
}

/// Shift a pitch class by `semitones`, wrapping into 0..12.
pub fn shift_pitch_class(index: usize, semitones: i32) -> usize {
    (index as i32 + semitones.rem_euclid(12)).rem_euclid(12) as usize
}

/// Transpose a chord name by `semitones` (negative goes down).
///
/// Unrecognised roots (`H7`, `N.C.`, `Cb`) come back unchanged.
///
/// ```
/// use chordsheet::transpose::transpose_chord;
///
/// assert_eq!(transpose_chord("Am7", 2), "Bm7");
/// assert_eq!(transpose_chord("Bb", 1), "B");
/// assert_eq!(transpose_chord("C/G", -1), "B/F#");
/// ```
pub fn transpose_chord(chord: &str, semitones: i32) -> String {
    // Whole octaves keep the original spelling.
    if chord.is_empty() || semitones.rem_euclid(12) == 0 {
        return chord.to_string();
    }

    if let Some((root, bass)) = chord.split_once('/') {
        return format!(
            "{}/{}",
            transpose_chord(root, semitones),
            transpose_chord(bass, semitones)
        );
    }

    let Some((note, suffix)) = split_root(chord) else {
        return chord.to_string();
    };
    let Some(index) = pitch_class(note) else {
        return chord.to_string();
    };

    let new_index = shift_pitch_class(index, semitones);
    format!("{}{}", NOTES_SHARP[new_index], suffix)
}
