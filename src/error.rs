//! # Error Types
//!
//! The rendering core never fails: malformed songs, unknown chords and empty
//! fingerings all degrade to safe defaults. Errors only exist at the edges of
//! the crate, where configuration and chord data are loaded from text.
//!
//! ## Error Types
//! - `ConfigError` - Invalid YAML reader configuration
//! - `ChordDataError` - Chord definitions that are not valid JSON
//! - `VariationIndex` - A custom chord variation index that does not exist
//! - `UnknownChord` - A custom chord operation on a name that is not stored
//!
//! ## Usage
//! ```rust
//! use chordsheet::{ReaderConfig, ChordSheetError};
//!
//! match ReaderConfig::from_yaml("scroll: [not, a, map]") {
//!     Ok(_) => println!("loaded"),
//!     Err(ChordSheetError::ConfigError(message)) => eprintln!("bad config: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordSheetError {
    /// Invalid reader configuration.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordSheetError;
    /// let err = ChordSheetError::ConfigError("scroll: invalid type".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: scroll: invalid type");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Chord definitions could not be read.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordSheetError;
    /// let err = ChordSheetError::ChordDataError("expected value at line 1 column 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord data: expected value at line 1 column 1");
    /// ```
    #[error("Invalid chord data: {0}")]
    ChordDataError(String),

    /// A variation index outside the chord's variation list.
    #[error("Chord '{chord}' has no variation {index} (it has {count})")]
    VariationIndex {
        chord: String,
        index: usize,
        count: usize,
    },

    /// A custom chord operation on a chord that is not stored.
    #[error("Unknown custom chord: {0}")]
    UnknownChord(String),
}
