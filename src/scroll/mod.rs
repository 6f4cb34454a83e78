//! # Auto-Scroll Module
//!
//! Hands-free scrolling of a song while the musician plays.
//!
//! ## Sub-modules
//! - `types` - Host traits ([`ScrollContainer`], [`FrameScheduler`]) and state snapshots
//! - `engine` - The [`AutoScroller`] state machine
//!
//! ## States
//! The scroller is either idle or playing. Speed is a separate level that can
//! change at any time; the next frame picks it up.
//!
//! - **start**: rejected when the container cannot scroll or the host has no
//!   frame to give. If the view is already at the bottom it jumps back to the
//!   top first.
//! - **tick**: called by the host for each animation frame. Moves the view by
//!   `speed * elapsed`, skips the move after a long stall (backgrounded tab)
//!   and stops on reaching the bottom, or when the host refuses the next
//!   frame.
//! - **stop**: cancels the pending frame. Safe to call at any time and more
//!   than once.
//!
//! ## Frame Ownership
//! At most one frame is ever requested. The engine keeps its handle as the
//! cancellation token: a tick that arrives without a pending frame (after a
//! stop, or from a stale callback) is ignored and touches nothing.
//!
//! ## Example
//! ```rust
//! use chordsheet::scroll::{AutoScroller, FrameScheduler, ScrollContainer, TickOutcome};
//!
//! struct Page { top: f64 }
//!
//! impl ScrollContainer for Page {
//!     fn scroll_top(&self) -> f64 { self.top }
//!     fn set_scroll_top(&mut self, top: f64) { self.top = top.clamp(0.0, 600.0) }
//!     fn scroll_height(&self) -> f64 { 1000.0 }
//!     fn client_height(&self) -> f64 { 400.0 }
//! }
//!
//! struct Frames;
//!
//! impl FrameScheduler for Frames {
//!     type Handle = ();
//!     fn request_frame(&mut self) -> Option<()> { Some(()) }
//!     fn cancel_frame(&mut self, _: ()) {}
//! }
//!
//! let mut scroller = AutoScroller::new(Page { top: 0.0 }, Frames);
//! scroller.start(0.0);
//! assert_eq!(scroller.tick(125.0), TickOutcome::Advanced { scroll_top: 3.75 });
//! scroller.stop();
//! assert!(!scroller.is_playing());
//! ```

mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use engine::AutoScroller;
pub use types::{FrameScheduler, ScrollContainer, ScrollState, StartOutcome, TickOutcome};
