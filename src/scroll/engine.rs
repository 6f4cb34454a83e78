//! Auto-scroll state machine

use crate::config::ScrollConfig;
use super::types::{FrameScheduler, ScrollContainer, ScrollState, StartOutcome, TickOutcome};

/// Drives a [`ScrollContainer`] from animation frames.
///
/// Timestamps are host milliseconds (`performance.now()` or the frame
/// callback argument). Dropping the scroller cancels any pending frame.
pub struct AutoScroller<C: ScrollContainer, S: FrameScheduler> {
    container: C,
    scheduler: S,
    config: ScrollConfig,
    speed_level: u8,
    /// Handle of the one requested frame; `Some` means playing.
    pending: Option<S::Handle>,
    last_time: f64,
    /// Sub-pixel position; browsers round `scrollTop`, which would stall slow speeds.
    position: f64,
    progress: f64,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<C: ScrollContainer, S: FrameScheduler> AutoScroller<C, S> {
    pub fn new(container: C, scheduler: S) -> Self {
        Self::with_config(container, scheduler, ScrollConfig::default())
    }

    pub fn with_config(container: C, scheduler: S, config: ScrollConfig) -> Self {
        let speed_level = config.default_speed.clamp(config.min_speed, config.max_speed);
        let mut scroller = Self {
            container,
            scheduler,
            config,
            speed_level,
            pending: None,
            last_time: 0.0,
            position: 0.0,
            progress: 0.0,
            on_complete: None,
        };
        scroller.on_scroll();
        scroller
    }

    /// Called once each time playback reaches the bottom.
    pub fn set_on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn is_playing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn speed_level(&self) -> u8 {
        self.speed_level
    }

    /// Change the speed; clamped to the configured range. Takes effect on the
    /// next frame without restarting.
    pub fn set_speed(&mut self, level: u8) -> u8 {
        self.speed_level = level.clamp(self.config.min_speed, self.config.max_speed);
        self.speed_level
    }

    pub fn pixels_per_second(&self) -> f64 {
        f64::from(self.speed_level) * self.config.pixels_per_level
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn start(&mut self, now_ms: f64) -> StartOutcome {
        if self.is_playing() {
            return StartOutcome::AlreadyPlaying;
        }

        let extent = self.container.extent();
        if extent <= 0.0 {
            log::debug!("auto-scroll rejected: nothing to scroll (extent {})", extent);
            return StartOutcome::Rejected;
        }

        let Some(handle) = self.scheduler.request_frame() else {
            log::warn!("auto-scroll rejected: no animation frame available");
            return StartOutcome::Rejected;
        };
        self.pending = Some(handle);

        let outcome = if self.container.scroll_top() >= extent - self.config.restart_epsilon {
            self.container.set_scroll_top(0.0);
            StartOutcome::Restarted
        } else {
            StartOutcome::Started
        };

        self.position = self.container.scroll_top();
        self.last_time = now_ms;
        self.on_scroll();
        log::debug!("auto-scroll {:?} at {} px, speed {}", outcome, self.position, self.speed_level);
        outcome
    }

    /// Handle one animation frame.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        // The frame that called us is now spent.
        if self.pending.take().is_none() {
            return TickOutcome::Ignored;
        }

        let delta = (now_ms - self.last_time) / 1000.0;
        self.last_time = now_ms;

        // Content can reflow while playing.
        let extent = self.container.extent();
        let current = self.container.scroll_top();
        if (current - self.position).abs() > 1.0 {
            // Moved by someone else (the reader dragged the page).
            self.position = current;
        }

        if self.at_bottom(current, extent) {
            return self.complete();
        }

        if !(0.0..=self.config.max_frame_delta).contains(&delta) {
            log::trace!("auto-scroll skipped a {:.3}s frame", delta);
            return self.reschedule(TickOutcome::Skipped);
        }

        self.position += self.pixels_per_second() * delta;
        self.container.set_scroll_top(self.position);
        let scroll_top = self.container.scroll_top();
        self.on_scroll();

        if self.at_bottom(scroll_top.max(self.position), extent) {
            return self.complete();
        }

        self.reschedule(TickOutcome::Advanced { scroll_top })
    }

    /// Request the next frame, or halt when the host has none to give.
    fn reschedule(&mut self, outcome: TickOutcome) -> TickOutcome {
        match self.scheduler.request_frame() {
            Some(handle) => {
                self.pending = Some(handle);
                outcome
            }
            None => {
                log::warn!("auto-scroll halted: no animation frame available");
                TickOutcome::Halted
            }
        }
    }

    /// Cancel the pending frame, if any.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
            log::debug!("auto-scroll stopped at {} px", self.container.scroll_top());
        }
    }

    /// Play/pause. Returns whether it is playing afterwards.
    pub fn toggle(&mut self, now_ms: f64) -> bool {
        if self.is_playing() {
            self.stop();
            false
        } else {
            self.start(now_ms).is_playing()
        }
    }

    /// Recompute the progress bar from the container. Hosts call this from
    /// the container's scroll event. An unscrollable container keeps the
    /// previous value.
    pub fn on_scroll(&mut self) -> f64 {
        let extent = self.container.extent();
        if extent > 0.0 {
            self.progress = (self.container.scroll_top() / extent * 100.0).clamp(0.0, 100.0);
        }
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            is_playing: self.is_playing(),
            speed_level: self.speed_level,
            progress_percent: self.progress,
        }
    }

    fn at_bottom(&self, top: f64, extent: f64) -> bool {
        top >= extent - self.config.end_epsilon
    }

    fn complete(&mut self) -> TickOutcome {
        log::debug!("auto-scroll reached the bottom");
        self.on_scroll();
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
        TickOutcome::Completed
    }
}

impl<C: ScrollContainer, S: FrameScheduler> Drop for AutoScroller<C, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
