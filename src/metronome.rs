//! Metronome click scheduling.
//!
//! Lookahead scheduling against an audio clock: the host wakes the scheduler
//! every `lookahead_ms` and queues every click that falls within the next
//! `schedule_ahead` seconds on its audio output. Timer jitter then never
//! reaches the clicks themselves. This module only produces the timings; the
//! host owns the sound.

use serde::Serialize;

use crate::config::MetronomeConfig;

pub const ACCENT_FREQUENCY: f64 = 880.0;
pub const BEAT_FREQUENCY: f64 = 440.0;
/// Length of one click in seconds.
pub const CLICK_DURATION: f64 = 0.03;
/// Gap between `start` and the first click, so it is never scheduled in the past.
const START_DELAY: f64 = 0.05;
/// Tempo range of the practice slider.
pub const MIN_BPM: f64 = 40.0;
pub const MAX_BPM: f64 = 200.0;
/// A wake-up later than this skips the missed clicks instead of replaying them.
const MAX_LATENESS: f64 = 1.0;

/// Clamp a tempo into `MIN_BPM..=MAX_BPM`; `None` when it is not a number.
pub fn clamp_bpm(bpm: f64) -> Option<f64> {
    bpm.is_finite().then(|| bpm.clamp(MIN_BPM, MAX_BPM))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    /// Audio clock time in seconds.
    pub time: f64,
    /// Beat within the bar, 0 is the downbeat.
    pub beat: u32,
    pub frequency: f64,
}

impl Click {
    pub fn is_accent(&self) -> bool {
        self.beat == 0
    }
}

#[derive(Debug, Clone)]
pub struct Metronome {
    config: MetronomeConfig,
    playing: bool,
    next_click_time: f64,
    beat_in_bar: u32,
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(MetronomeConfig::default())
    }
}

impl Metronome {
    /// Out-of-range tempos are clamped; unusable values fall back to the
    /// defaults.
    pub fn new(mut config: MetronomeConfig) -> Self {
        let defaults = MetronomeConfig::default();
        config.bpm = clamp_bpm(config.bpm).unwrap_or(defaults.bpm);
        if !(config.schedule_ahead.is_finite() && config.schedule_ahead > 0.0) {
            config.schedule_ahead = defaults.schedule_ahead;
        }
        Self {
            config,
            playing: false,
            next_click_time: 0.0,
            beat_in_bar: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn bpm(&self) -> f64 {
        self.config.bpm
    }

    /// Tempo changes apply from the next unscheduled click. The tempo is
    /// clamped to `MIN_BPM..=MAX_BPM`; NaN and infinities are ignored.
    pub fn set_bpm(&mut self, bpm: f64) {
        if let Some(bpm) = clamp_bpm(bpm) {
            self.config.bpm = bpm;
        }
    }

    /// How often the host should call [`Metronome::schedule`].
    pub fn lookahead_ms(&self) -> f64 {
        self.config.lookahead_ms
    }

    /// Start on a downbeat shortly after `now` (audio clock seconds).
    pub fn start(&mut self, now: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.beat_in_bar = 0;
        self.next_click_time = now + START_DELAY;
        log::debug!("metronome started at {} bpm", self.config.bpm);
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            log::debug!("metronome stopped");
        }
    }

    /// Returns whether it is playing afterwards.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.start(now);
        }
        self.playing
    }

    /// Clicks due before `now + schedule_ahead`, in order. Each click is
    /// returned once.
    pub fn schedule(&mut self, now: f64) -> Vec<Click> {
        let mut clicks = Vec::new();
        if !self.playing {
            return clicks;
        }

        let horizon = now + self.config.schedule_ahead;
        if !horizon.is_finite() {
            log::warn!("metronome asked to schedule at a non-finite time {}", now);
            return clicks;
        }
        self.skip_missed(now);
        while self.next_click_time < horizon {
            let beat = self.beat_in_bar;
            clicks.push(Click {
                time: self.next_click_time,
                beat,
                frequency: if beat == 0 { ACCENT_FREQUENCY } else { BEAT_FREQUENCY },
            });
            if !self.advance() {
                break;
            }
        }
        clicks
    }

    /// Jump over whole beats after a long stall (a suspended tab), keeping
    /// the bar position.
    fn skip_missed(&mut self, now: f64) {
        let late = now - self.next_click_time;
        if late <= MAX_LATENESS {
            return;
        }
        let step = 60.0 / self.config.bpm;
        let missed = (late / step).floor();
        let beats_per_bar = f64::from(self.config.beats_per_bar.max(1));
        self.next_click_time += missed * step;
        self.beat_in_bar = ((f64::from(self.beat_in_bar) + missed % beats_per_bar) % beats_per_bar) as u32;
        log::debug!("metronome skipped {} missed clicks", missed);
    }

    /// Move to the next beat. Returns false when the clock is too large for
    /// a beat to move it.
    fn advance(&mut self) -> bool {
        let next = self.next_click_time + 60.0 / self.config.bpm;
        self.beat_in_bar += 1;
        if self.beat_in_bar >= self.config.beats_per_bar {
            self.beat_in_bar = 0;
        }
        if next <= self.next_click_time {
            return false;
        }
        self.next_click_time = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_schedules_nothing() {
        let mut metronome = Metronome::default();
        assert!(metronome.schedule(10.0).is_empty());
    }

    #[test]
    fn test_first_click_is_accented() {
        let mut metronome = Metronome::default();
        metronome.start(0.0);

        let clicks = metronome.schedule(0.0);
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].time, 0.05);
        assert!(clicks[0].is_accent());
        assert_eq!(clicks[0].frequency, ACCENT_FREQUENCY);

        // nothing new until the next beat enters the window
        assert!(metronome.schedule(0.5).is_empty());
        let clicks = metronome.schedule(0.96);
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].beat, 1);
        assert_eq!(clicks[0].frequency, BEAT_FREQUENCY);
    }

    #[test]
    fn test_bar_wraps() {
        let mut metronome = Metronome::new(MetronomeConfig {
            bpm: 120.0,
            beats_per_bar: 3,
            ..MetronomeConfig::default()
        });
        metronome.start(0.0);

        // a slightly late wake-up catches up with every missed click
        let beats: Vec<u32> = metronome.schedule(0.98).iter().map(|c| c.beat).collect();
        assert_eq!(beats, vec![0, 1, 2]);
        let beats: Vec<u32> = metronome.schedule(1.5).iter().map(|c| c.beat).collect();
        assert_eq!(beats, vec![0]);
    }

    #[test]
    fn test_set_bpm() {
        let mut metronome = Metronome::default();
        metronome.set_bpm(0.0);
        assert_eq!(metronome.bpm(), MIN_BPM);
        metronome.set_bpm(120.0);
        metronome.start(0.0);
        metronome.schedule(0.0);
        let clicks = metronome.schedule(0.5);
        assert_eq!(clicks[0].time, 0.55);
    }

    #[test]
    fn test_unusable_tempo_never_stalls_scheduling() {
        let mut metronome = Metronome::default();
        metronome.set_bpm(f64::INFINITY);
        metronome.set_bpm(f64::NAN);
        assert_eq!(metronome.bpm(), 60.0);
        metronome.set_bpm(1000.0);
        assert_eq!(metronome.bpm(), MAX_BPM);
        metronome.set_bpm(-5.0);
        assert_eq!(metronome.bpm(), MIN_BPM);

        let mut metronome = Metronome::new(MetronomeConfig {
            bpm: -60.0,
            ..MetronomeConfig::default()
        });
        assert_eq!(metronome.bpm(), MIN_BPM);
        metronome.start(0.0);
        assert_eq!(metronome.schedule(0.0).len(), 1);
        assert!(metronome.schedule(f64::INFINITY).is_empty());

        let metronome = Metronome::new(MetronomeConfig {
            bpm: f64::INFINITY,
            schedule_ahead: f64::INFINITY,
            ..MetronomeConfig::default()
        });
        assert_eq!(metronome.bpm(), 60.0);
    }

    #[test]
    fn test_long_stall_skips_missed_clicks() {
        let mut metronome = Metronome::default();
        metronome.start(0.0);
        assert_eq!(metronome.schedule(0.0).len(), 1);

        let clicks = metronome.schedule(100.0);
        let beats: Vec<u32> = clicks.iter().map(|c| c.beat).collect();
        assert_eq!(beats, vec![3, 0]);
        assert!(clicks[0].time > 99.0);
    }

    #[test]
    fn test_huge_clock_terminates() {
        let mut metronome = Metronome::default();
        metronome.start(0.0);
        assert!(metronome.schedule(1e300).len() <= 1);
    }

    #[test]
    fn test_toggle_and_restart() {
        let mut metronome = Metronome::default();
        assert!(metronome.toggle(0.0));
        metronome.schedule(1.5);
        assert!(!metronome.toggle(2.0));
        assert!(metronome.schedule(3.0).is_empty());

        // restarting begins a new bar
        metronome.start(5.0);
        let clicks = metronome.schedule(5.0);
        assert_eq!(clicks[0].beat, 0);
        assert_eq!(clicks[0].time, 5.05);
    }
}
