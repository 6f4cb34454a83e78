//! Reads any stored chord shape into a canonical [`Fingering`].
//!
//! Resolution order for frets:
//! 1. `positions[0].frets` array
//! 2. `positions[0].strings` (object keyed by string number, or ordered array)
//! 3. top-level `strings`
//! 4. top-level `frets` array
//! 5. six muted strings
//!
//! Fingers follow the same order independently (`positions[0].fingers`, then
//! top-level `fingers`), defaulting to unassigned. Output is always six long;
//! missing or unreadable slots become muted / unassigned.

use serde_json::Value;

use super::{Fingering, MUTED, STRING_COUNT, STRING_ORDER};

/// Normalize the default (first) variation of any chord data shape.
pub fn normalize(data: &Value) -> Fingering {
    Fingering {
        frets: resolve_frets(data),
        fingers: resolve_fingers(data),
    }
}

/// Every variation of a chord, in stored order.
///
/// A `positions` array yields one fingering per element (elements may mix
/// shapes); any other object is a single variation. `null` gives none.
pub fn variations(data: &Value) -> Vec<Fingering> {
    if data.is_null() {
        return Vec::new();
    }
    match data.get("positions").and_then(Value::as_array) {
        Some(positions) => positions.iter().map(normalize).collect(),
        None => vec![normalize(data)],
    }
}

/// Rewrap any shape as `{ "positions": [ { "frets": [...], "fingers": [...] } ] }`.
pub fn normalize_to_positions(data: &Value) -> Value {
    serde_json::json!({ "positions": [normalize(data).to_value()] })
}

fn first_position(data: &Value) -> Option<&Value> {
    data.get("positions")?.as_array()?.first()
}

fn resolve_frets(data: &Value) -> [i32; STRING_COUNT] {
    if let Some(position) = first_position(data) {
        if let Some(frets) = position.get("frets").filter(|v| v.is_array()) {
            return frets_from_value(frets);
        }
        if let Some(strings) = position.get("strings").filter(|v| is_collection(v)) {
            return frets_from_value(strings);
        }
    }

    if let Some(strings) = data.get("strings").filter(|v| is_collection(v)) {
        return frets_from_value(strings);
    }
    if let Some(frets) = data.get("frets").filter(|v| v.is_array()) {
        return frets_from_value(frets);
    }

    [MUTED; STRING_COUNT]
}

fn resolve_fingers(data: &Value) -> [u8; STRING_COUNT] {
    if let Some(fingers) = first_position(data)
        .and_then(|position| position.get("fingers"))
        .filter(|v| is_collection(v))
    {
        return fingers_from_value(fingers);
    }

    if let Some(fingers) = data.get("fingers").filter(|v| is_collection(v)) {
        return fingers_from_value(fingers);
    }

    [0; STRING_COUNT]
}

fn is_collection(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Frets from an ordered array (low E first) or an object keyed by string
/// number (`"6"` = low E ... `"1"` = high e).
pub fn frets_from_value(value: &Value) -> [i32; STRING_COUNT] {
    collect_six(value, MUTED, as_fret)
}

/// Fingers from an ordered array or an object keyed by string number.
pub fn fingers_from_value(value: &Value) -> [u8; STRING_COUNT] {
    collect_six(value, 0, as_finger)
}

fn collect_six<T: Copy>(
    value: &Value,
    missing: T,
    read: impl Fn(&Value) -> Option<T>,
) -> [T; STRING_COUNT] {
    let mut out = [missing; STRING_COUNT];
    match value {
        Value::Array(items) => {
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = read(item).unwrap_or(missing);
            }
        }
        Value::Object(map) => {
            for (slot, string_number) in out.iter_mut().zip(STRING_ORDER) {
                if let Some(item) = map.get(&string_number.to_string()) {
                    *slot = read(item).unwrap_or(missing);
                }
            }
        }
        _ => {}
    }
    out
}

fn as_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_fret(value: &Value) -> Option<i32> {
    let fret = as_number(value)?;
    if fret < 0 {
        Some(MUTED)
    } else {
        i32::try_from(fret).ok()
    }
}

fn as_finger(value: &Value) -> Option<u8> {
    as_number(value)
        .filter(|f| (0..=4).contains(f))
        .map(|f| f as u8)
}
