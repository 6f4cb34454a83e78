//! Auto-scroll host interfaces and state types

use serde::Serialize;

/// A scrollable view, in pixels.
///
/// Mirrors the three numbers a browser element exposes. `set_scroll_top` may
/// clamp or round the value; the engine re-reads `scroll_top` afterwards.
pub trait ScrollContainer {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, top: f64);
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;

    /// How far the view can scroll. Zero or less means it cannot.
    fn extent(&self) -> f64 {
        self.scroll_height() - self.client_height()
    }
}

/// The host's animation-frame queue.
///
/// `request_frame` arranges for [`AutoScroller::tick`](super::AutoScroller::tick)
/// to be called once on the next frame and returns a handle that cancels it,
/// or `None` when the host cannot schedule one.
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self) -> Option<Self::Handle>;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Result of a play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StartOutcome {
    Started,
    /// Started from the top because the view was already at the bottom.
    Restarted,
    AlreadyPlaying,
    /// The container has nothing to scroll, or the host refused a frame;
    /// nothing changed.
    Rejected,
}

impl StartOutcome {
    pub fn is_playing(self) -> bool {
        !matches!(self, StartOutcome::Rejected)
    }
}

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TickOutcome {
    /// No frame was pending (stopped, or a stale callback).
    Ignored,
    /// Moved the view and requested the next frame.
    #[serde(rename_all = "camelCase")]
    Advanced { scroll_top: f64 },
    /// Frame came too late to move smoothly; requested the next one anyway.
    Skipped,
    /// Reached the bottom and stopped.
    Completed,
    /// The host refused the next frame; playback stopped.
    Halted,
}

/// Snapshot for the UI (play button and progress bar).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub is_playing: bool,
    pub speed_level: u8,
    pub progress_percent: f64,
}
