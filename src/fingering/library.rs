//! Chord stores and lookup.
//!
//! The built-in [`ChordLibrary`] is read-only reference data compiled into the
//! crate. User chords live in a [`CustomChordStore`]. The song renderer only
//! sees a [`ChordResolver`]; [`LayeredResolver`] checks the user's chords
//! before the library.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{normalize, variations, Fingering};
use crate::chord::normalize_chord_name;
use crate::error::ChordSheetError;
use crate::parser::extract_chords;

const BUILTIN_CHORDS: &str = include_str!("../../data/chords.json");

/// Category and tag given to chords copied in from the library for a song.
pub const AUTO_IMPORT_CATEGORY: &str = "Auto-Import";
pub const AUTO_IMPORT_TAG: &str = "auto";

/// A named chord with its stored fingering data (any legacy shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDefinition {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub data: Value,
}

impl ChordDefinition {
    pub fn new(name: impl Into<String>, category: impl Into<String>, tags: Vec<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            tags,
            data,
        }
    }

    /// The default variation (the first one).
    pub fn default_variation(&self) -> Fingering {
        normalize(&self.data)
    }

    /// All variations, normalized.
    pub fn variations(&self) -> Vec<Fingering> {
        variations(&self.data)
    }

    /// Stored variations as raw JSON, without normalizing them.
    pub fn raw_variations(&self) -> Vec<Value> {
        match self.data.get("positions").and_then(Value::as_array) {
            Some(positions) => positions.clone(),
            None if self.data.is_object() => vec![self.data.clone()],
            None => Vec::new(),
        }
    }

    /// Append a variation. Legacy single-shape data is wrapped into
    /// `positions` first so the existing fingering stays the default.
    pub fn add_variation(&mut self, variation: Value) {
        let mut positions = self.raw_variations();
        positions.push(variation);
        self.data = serde_json::json!({ "positions": positions });
    }

    /// Move variation `index` to the front so it becomes the default; the
    /// others keep their relative order.
    pub fn set_default_variation(&mut self, index: usize) -> Result<(), ChordSheetError> {
        let mut positions = self.raw_variations();
        if index >= positions.len() {
            return Err(ChordSheetError::VariationIndex {
                chord: self.name.clone(),
                index,
                count: positions.len(),
            });
        }
        let selected = positions.remove(index);
        positions.insert(0, selected);
        self.data = serde_json::json!({ "positions": positions });
        Ok(())
    }
}

fn parse_definitions(json: &str) -> Result<Vec<ChordDefinition>, ChordSheetError> {
    serde_json::from_str(json).map_err(|e| ChordSheetError::ChordDataError(e.to_string()))
}

/// Looks up fingering data by chord name.
///
/// Misses are normal (the chord simply has no diagram) and return `None`.
pub trait ChordResolver {
    fn resolve(&self, name: &str) -> Option<&Value>;
}

impl<T: ChordResolver + ?Sized> ChordResolver for &T {
    fn resolve(&self, name: &str) -> Option<&Value> {
        (**self).resolve(name)
    }
}

impl ChordResolver for std::collections::HashMap<String, Value> {
    fn resolve(&self, name: &str) -> Option<&Value> {
        self.get(&normalize_chord_name(name))
    }
}

/// Read-only reference chords.
#[derive(Debug, Clone, Default)]
pub struct ChordLibrary {
    chords: Vec<ChordDefinition>,
}

impl ChordLibrary {
    /// The reference table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CHORDS).unwrap_or_else(|e| {
            log::error!("built-in chord table is unreadable: {}", e);
            Self::default()
        })
    }

    /// Load a library from a JSON array of chord definitions.
    pub fn from_json(json: &str) -> Result<Self, ChordSheetError> {
        Ok(Self {
            chords: parse_definitions(json)?,
        })
    }

    pub fn from_definitions(chords: Vec<ChordDefinition>) -> Self {
        Self { chords }
    }

    /// First definition with this name (after name normalization).
    pub fn get(&self, name: &str) -> Option<&ChordDefinition> {
        let name = normalize_chord_name(name);
        self.chords.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChordDefinition> {
        self.chords.iter()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ChordDefinition> + 'a {
        self.chords.iter().filter(move |c| c.category == category)
    }

    /// Chords whose name or tags contain `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&ChordDefinition> {
        let query = query.trim().to_lowercase();
        self.chords
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

impl ChordResolver for ChordLibrary {
    fn resolve(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|c| &c.data)
    }
}

/// A user's own chords. Mutable; one entry per name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomChordStore {
    chords: Vec<ChordDefinition>,
}

impl CustomChordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON array of chord definitions. Later duplicates of a name
    /// are merged into the first as extra variations.
    pub fn from_json(json: &str) -> Result<Self, ChordSheetError> {
        let mut store = Self::new();
        for chord in parse_definitions(json)? {
            match store.get_mut(&chord.name) {
                Some(existing) => {
                    for variation in chord.raw_variations() {
                        existing.add_variation(variation);
                    }
                }
                None => store.chords.push(chord),
            }
        }
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String, ChordSheetError> {
        serde_json::to_string_pretty(&self.chords)
            .map_err(|e| ChordSheetError::ChordDataError(e.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&ChordDefinition> {
        let name = normalize_chord_name(name);
        self.chords.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChordDefinition> {
        let name = normalize_chord_name(name);
        self.chords.iter_mut().find(|c| c.name == name)
    }

    /// Save a fingering under `name`: a new chord is created in `positions`
    /// form; an existing chord gains it as an extra variation (its category
    /// and tags are left alone).
    pub fn save(&mut self, name: &str, category: &str, tags: Vec<String>, fingering: Value) {
        let name = normalize_chord_name(name);
        match self.get_mut(&name) {
            Some(existing) => {
                log::debug!("adding variation to custom chord {}", name);
                existing.add_variation(fingering);
            }
            None => {
                log::debug!("creating custom chord {}", name);
                self.chords.push(ChordDefinition::new(
                    name,
                    category,
                    tags,
                    serde_json::json!({ "positions": [fingering] }),
                ));
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ChordDefinition> {
        let name = normalize_chord_name(name);
        let index = self.chords.iter().position(|c| c.name == name)?;
        Some(self.chords.remove(index))
    }

    pub fn set_default_variation(&mut self, name: &str, index: usize) -> Result<(), ChordSheetError> {
        self.get_mut(name)
            .ok_or_else(|| ChordSheetError::UnknownChord(name.to_string()))?
            .set_default_variation(index)
    }

    /// Copy the library fingering of every chord in `content` the user does
    /// not have yet. Chords the library does not know are skipped. Returns
    /// the names added, in song order.
    pub fn import_from_song(&mut self, content: &str, library: &ChordLibrary) -> Vec<String> {
        let mut added = Vec::new();
        for name in extract_chords(content) {
            if self.get(&name).is_some() {
                continue;
            }
            let Some(reference) = library.get(&name) else {
                log::debug!("no reference fingering for {}", name);
                continue;
            };
            let fingering = match serde_json::to_value(reference.default_variation()) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("could not copy fingering for {}: {}", name, e);
                    continue;
                }
            };
            self.save(
                &reference.name,
                AUTO_IMPORT_CATEGORY,
                vec![AUTO_IMPORT_TAG.to_string()],
                fingering,
            );
            added.push(reference.name.clone());
        }
        if !added.is_empty() {
            log::debug!("auto-imported chords: {}", added.join(", "));
        }
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChordDefinition> {
        self.chords.iter()
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

/// How many of a song's chords each store covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChordStats {
    /// Unique chords in the song.
    pub total: usize,
    /// Already in the user's chords.
    pub existing: usize,
    /// Missing from the user's chords but in the library.
    pub new: usize,
    pub unknown: usize,
}

pub fn chord_stats(content: &str, custom: &CustomChordStore, library: &ChordLibrary) -> ChordStats {
    let chords = extract_chords(content);
    let mut stats = ChordStats {
        total: chords.len(),
        ..ChordStats::default()
    };
    for name in &chords {
        if custom.get(name).is_some() {
            stats.existing += 1;
        } else if library.get(name).is_some() {
            stats.new += 1;
        } else {
            stats.unknown += 1;
        }
    }
    stats
}

impl ChordResolver for CustomChordStore {
    fn resolve(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|c| &c.data)
    }
}

/// Tries `primary` first, then `fallback`.
#[derive(Debug, Clone)]
pub struct LayeredResolver<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P: ChordResolver, F: ChordResolver> LayeredResolver<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ChordResolver, F: ChordResolver> ChordResolver for LayeredResolver<P, F> {
    fn resolve(&self, name: &str) -> Option<&Value> {
        self.primary
            .resolve(name)
            .or_else(|| self.fallback.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builtin_library_loads() {
        let library = ChordLibrary::builtin();
        assert!(library.len() > 50);
        let c = library.get("C").unwrap();
        assert_eq!(c.variations().len(), 3);
        assert_eq!(c.default_variation().frets, [-1, 3, 2, 0, 1, 0]);
    }

    #[test]
    fn test_builtin_every_chord_has_a_drawable_default() {
        for chord in ChordLibrary::builtin().iter() {
            assert!(!chord.default_variation().is_silent(), "{} has no fingering", chord.name);
        }
    }

    #[test]
    fn test_builtin_ordered_strings_shape() {
        let library = ChordLibrary::builtin();
        assert_eq!(library.get("Bb").unwrap().default_variation().frets, [-1, 1, 3, 3, 3, 1]);
        assert_eq!(library.get("Em9").unwrap().default_variation().frets, [0, 2, 4, 0, 3, 0]);
    }

    #[test]
    fn test_library_lookup_normalizes_name() {
        let library = ChordLibrary::builtin();
        assert!(library.resolve("F♯m").is_some());
        assert!(library.resolve("A#").is_none());
    }

    #[test]
    fn test_library_search() {
        let library = ChordLibrary::builtin();
        let names: Vec<&str> = library.search("flamenco").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A7(b9)"]);
        assert_eq!(library.in_category("Bossa Nova").count(), 1);
    }

    #[test]
    fn test_custom_save_creates_then_adds_variation() {
        let mut store = CustomChordStore::new();
        store.save("Am", "Samba", vec!["Samba".to_string()], json!({ "frets": [-1, 0, 2, 2, 1, 0] }));
        store.save("Am", "Ignored", vec![], json!({ "strings": { "6": 5, "5": 7, "4": 7, "3": 5, "2": 5, "1": 5 } }));

        let am = store.get("Am").unwrap();
        assert_eq!(am.category, "Samba");
        let all = am.variations();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].frets, [5, 7, 7, 5, 5, 5]);
    }

    #[test]
    fn test_set_default_variation_moves_to_front() {
        let mut chord = ChordDefinition::new(
            "G",
            "Standard",
            vec![],
            json!({ "positions": [
                { "frets": [3, 2, 0, 0, 0, 3] },
                { "frets": [3, 5, 5, 4, 3, 3] },
                { "frets": [-1, 10, 12, 12, 12, 10] },
            ]}),
        );
        chord.set_default_variation(2).unwrap();
        let frets: Vec<[i32; 6]> = chord.variations().iter().map(|v| v.frets).collect();
        assert_eq!(
            frets,
            vec![[-1, 10, 12, 12, 12, 10], [3, 2, 0, 0, 0, 3], [3, 5, 5, 4, 3, 3]]
        );
        assert_eq!(chord.default_variation().frets, [-1, 10, 12, 12, 12, 10]);
    }

    #[test]
    fn test_set_default_variation_out_of_range() {
        let mut chord = ChordDefinition::new("E", "", vec![], json!({ "frets": [0, 2, 2, 1, 0, 0] }));
        let err = chord.set_default_variation(1).unwrap_err();
        assert!(matches!(err, ChordSheetError::VariationIndex { index: 1, count: 1, .. }));
        assert!(chord.set_default_variation(0).is_ok());
    }

    #[test]
    fn test_legacy_single_shape_wrapped_on_add() {
        let mut chord = ChordDefinition::new(
            "E7",
            "Samba",
            vec![],
            json!({ "strings": { "6": 0, "5": 2, "4": 2, "3": 1, "2": 3, "1": 0 } }),
        );
        chord.add_variation(json!({ "frets": [0, 2, 0, 1, 0, 0] }));
        assert_eq!(chord.default_variation().frets, [0, 2, 2, 1, 3, 0]);
        assert_eq!(chord.variations().len(), 2);
    }

    #[test]
    fn test_custom_store_json_round_trip_merges_duplicates() {
        let json = r#"[
            { "name": "Dm", "category": "Samba", "tags": ["Samba"], "data": { "frets": [-1, -1, 0, 2, 3, 1] } },
            { "name": "Dm", "data": { "frets": [-1, 5, 7, 7, 6, 5] } }
        ]"#;
        let store = CustomChordStore::from_json(json).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Dm").unwrap().variations().len(), 2);

        let reloaded = CustomChordStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.get("Dm"), store.get("Dm"));
    }

    #[test]
    fn test_custom_store_bad_json() {
        let err = CustomChordStore::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ChordSheetError::ChordDataError(_)));
    }

    #[test]
    fn test_layered_resolver_prefers_custom() {
        let mut custom = CustomChordStore::new();
        custom.save("Am", "Mine", vec![], json!({ "frets": [5, 7, 7, 5, 5, 5] }));
        let library = ChordLibrary::builtin();
        let resolver = LayeredResolver::new(&custom, &library);

        assert_eq!(normalize(resolver.resolve("Am").unwrap()).frets, [5, 7, 7, 5, 5, 5]);
        assert_eq!(normalize(resolver.resolve("Em").unwrap()).frets, [0, 2, 2, 0, 0, 0]);
        assert!(resolver.resolve("Xyz").is_none());
    }

    #[test]
    fn test_import_from_song_adds_only_missing_known_chords() {
        let mut store = CustomChordStore::new();
        store.save("Am", "Mine", vec![], json!({ "frets": [5, 7, 7, 5, 5, 5] }));
        let library = ChordLibrary::builtin();
        let song = "[Am]un [C]deux [Gsus2(b13)]trois [F#m]quatre [C]cinq";

        let added = store.import_from_song(song, &library);
        assert_eq!(added, vec!["C", "F#m"]);

        let c = store.get("C").unwrap();
        assert_eq!(c.category, AUTO_IMPORT_CATEGORY);
        assert_eq!(c.tags, vec![AUTO_IMPORT_TAG.to_string()]);
        assert_eq!(c.default_variation(), library.get("C").unwrap().default_variation());
        assert_eq!(c.variations().len(), 1);
        // the user's own fingering is untouched
        assert_eq!(store.get("Am").unwrap().variations().len(), 1);
        assert_eq!(store.get("Am").unwrap().category, "Mine");

        // a second run has nothing left to add
        assert!(store.import_from_song(song, &library).is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_chord_stats() {
        let mut custom = CustomChordStore::new();
        custom.save("Am", "", vec![], json!({ "frets": [-1, 0, 2, 2, 1, 0] }));
        let library = ChordLibrary::builtin();

        let stats = chord_stats("[Am]a [C]b [Am]c [Gsus2(b13)]d [Dm]e", &custom, &library);
        assert_eq!(
            stats,
            ChordStats {
                total: 4,
                existing: 1,
                new: 2,
                unknown: 1,
            }
        );
        assert_eq!(chord_stats("", &custom, &library), ChordStats::default());
    }

    #[test]
    fn test_remove_and_unknown_chord() {
        let mut store = CustomChordStore::new();
        store.save("Cadd9", "", vec![], json!({ "frets": [-1, 3, 2, 0, 3, 0] }));
        assert!(store.remove("Cadd9").is_some());
        assert!(store.is_empty());
        assert!(matches!(
            store.set_default_variation("Cadd9", 0),
            Err(ChordSheetError::UnknownChord(_))
        ));
    }
}
