//! # Reader Configuration
//!
//! Tunables for the reading view, loaded from YAML. Every key is optional;
//! missing keys keep their defaults.
//!
//! ```yaml
//! scroll:
//!   pixels-per-level: 12
//!   default-speed: 4
//! diagram:
//!   width: 140
//!   height: 168
//! capo:
//!   max-capo: 7
//! metronome:
//!   bpm: 90
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ChordSheetError;
use crate::metronome::{MAX_BPM, MIN_BPM};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReaderConfig {
    pub scroll: ScrollConfig,
    pub diagram: DiagramConfig,
    pub capo: CapoConfig,
    pub metronome: MetronomeConfig,
}

impl ReaderConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ChordSheetError> {
        // An empty document is a valid "all defaults" config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ReaderConfig =
            serde_yaml::from_str(content).map_err(|e| ChordSheetError::ConfigError(e.to_string()))?;
        config.validate()?;
        log::debug!("loaded reader config: {:?}", config);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ChordSheetError> {
        let scroll = &self.scroll;
        if scroll.min_speed == 0 || scroll.min_speed > scroll.max_speed {
            return Err(ChordSheetError::ConfigError(format!(
                "scroll speeds must satisfy 1 <= min-speed ({}) <= max-speed ({})",
                scroll.min_speed, scroll.max_speed
            )));
        }
        if scroll.pixels_per_level <= 0.0 || scroll.max_frame_delta <= 0.0 {
            return Err(ChordSheetError::ConfigError(
                "pixels-per-level and max-frame-delta must be positive".to_string(),
            ));
        }
        if self.diagram.width <= 0.0 || self.diagram.height <= 0.0 || self.diagram.visible_frets == 0 {
            return Err(ChordSheetError::ConfigError(
                "diagram width, height and visible-frets must be positive".to_string(),
            ));
        }
        let metronome = &self.metronome;
        if !(MIN_BPM..=MAX_BPM).contains(&metronome.bpm) {
            return Err(ChordSheetError::ConfigError(format!(
                "metronome bpm ({}) must be between {} and {}",
                metronome.bpm, MIN_BPM, MAX_BPM
            )));
        }
        if metronome.beats_per_bar == 0 || !(metronome.schedule_ahead.is_finite() && metronome.schedule_ahead > 0.0) {
            return Err(ChordSheetError::ConfigError(
                "metronome beats-per-bar and schedule-ahead must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Auto-scroll tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScrollConfig {
    /// Scroll speed in pixels per second for each speed level.
    pub pixels_per_level: f64,
    pub default_speed: u8,
    pub min_speed: u8,
    pub max_speed: u8,
    /// Starting within this many pixels of the bottom restarts from the top.
    pub restart_epsilon: f64,
    /// Reaching within this many pixels of the bottom ends playback.
    pub end_epsilon: f64,
    /// Frame gaps longer than this (seconds) do not move the content.
    pub max_frame_delta: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            pixels_per_level: 10.0,
            default_speed: 3,
            min_speed: 1,
            max_speed: 10,
            restart_epsilon: 5.0,
            end_epsilon: 1.0,
            max_frame_delta: 0.25,
        }
    }
}

/// Chord box size and paddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiagramConfig {
    pub width: f64,
    pub height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub visible_frets: u8,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 120.0,
            padding_x: 15.0,
            padding_y: 20.0,
            visible_frets: 5,
        }
    }
}

/// Capo advisor thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CapoConfig {
    pub max_capo: u8,
    /// Required relative improvement (0.3 = at least 30% easier).
    pub min_improvement: f64,
    /// Scores below this are already easy and are not searched.
    pub easy_floor: u32,
}

impl Default for CapoConfig {
    fn default() -> Self {
        Self {
            max_capo: 9,
            min_improvement: 0.3,
            easy_floor: 5,
        }
    }
}

/// Metronome click scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MetronomeConfig {
    pub bpm: f64,
    pub beats_per_bar: u32,
    /// How often the host should call the scheduler (milliseconds).
    pub lookahead_ms: f64,
    /// How far ahead clicks are scheduled (seconds).
    pub schedule_ahead: f64,
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        Self {
            bpm: 60.0,
            beats_per_bar: 4,
            lookahead_ms: 25.0,
            schedule_ahead: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ReaderConfig::from_yaml("").unwrap(), ReaderConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ReaderConfig::from_yaml(
            r#"
scroll:
  pixels-per-level: 12.5
  default-speed: 4
diagram:
  width: 140
metronome:
  bpm: 90
"#,
        )
        .unwrap();
        assert_eq!(config.scroll.pixels_per_level, 12.5);
        assert_eq!(config.scroll.default_speed, 4);
        assert_eq!(config.scroll.max_speed, 10);
        assert_eq!(config.diagram.width, 140.0);
        assert_eq!(config.diagram.height, 120.0);
        assert_eq!(config.metronome.bpm, 90.0);
        assert_eq!(config.capo, CapoConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ReaderConfig::from_yaml("scroll: [1, 2]").unwrap_err();
        assert!(matches!(err, ChordSheetError::ConfigError(_)));
    }

    #[test]
    fn test_metronome_bpm_out_of_range() {
        for yaml in ["metronome:\n  bpm: .inf\n", "metronome:\n  bpm: -60\n", "metronome:\n  bpm: 500\n"] {
            let err = ReaderConfig::from_yaml(yaml).unwrap_err();
            assert!(err.to_string().contains("bpm"), "{}", yaml);
        }
    }

    #[test]
    fn test_invalid_speed_range() {
        let err = ReaderConfig::from_yaml("scroll:\n  min-speed: 8\n  max-speed: 2\n").unwrap_err();
        assert!(err.to_string().contains("min-speed"));
    }
}
