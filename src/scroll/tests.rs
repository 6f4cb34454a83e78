use super::*;
use crate::config::ScrollConfig;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct FakeContainer {
    top: f64,
    scroll_height: f64,
    client_height: f64,
    /// Round like a browser does.
    round: bool,
}

impl FakeContainer {
    fn new(top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            top,
            scroll_height,
            client_height,
            round: false,
        }
    }
}

impl ScrollContainer for FakeContainer {
    fn scroll_top(&self) -> f64 {
        self.top
    }

    fn set_scroll_top(&mut self, top: f64) {
        let top = top.clamp(0.0, self.extent().max(0.0));
        self.top = if self.round { top.round() } else { top };
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }
}

#[derive(Default)]
struct FrameLog {
    requested: u32,
    cancelled: Vec<u32>,
    /// Refuse every request, like a host without animation frames.
    refuse: bool,
}

#[derive(Clone, Default)]
struct FakeScheduler {
    log: Rc<RefCell<FrameLog>>,
}

impl FrameScheduler for FakeScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        let mut log = self.log.borrow_mut();
        if log.refuse {
            return None;
        }
        log.requested += 1;
        Some(log.requested)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.log.borrow_mut().cancelled.push(handle);
    }
}

/// 1000px of content in a 400px view: 600px to scroll.
fn scroller_at(top: f64) -> AutoScroller<FakeContainer, FakeScheduler> {
    AutoScroller::new(FakeContainer::new(top, 1000.0, 400.0), FakeScheduler::default())
}

fn top(scroller: &AutoScroller<FakeContainer, FakeScheduler>) -> f64 {
    scroller.container().scroll_top()
}

#[test]
fn test_start_rejected_without_extent() {
    let mut scroller = AutoScroller::new(FakeContainer::new(0.0, 400.0, 400.0), FakeScheduler::default());
    assert_eq!(scroller.start(0.0), StartOutcome::Rejected);
    assert!(!scroller.is_playing());
    assert_eq!(scroller.scheduler().log.borrow().requested, 0);
    assert_eq!(scroller.tick(16.0), TickOutcome::Ignored);
}

#[test]
fn test_start_at_bottom_restarts_from_top() {
    let mut scroller = scroller_at(597.0);
    assert_eq!(scroller.start(0.0), StartOutcome::Restarted);
    assert_eq!(top(&scroller), 0.0);
    assert!(scroller.is_playing());
}

#[test]
fn test_start_near_bottom_keeps_position() {
    let mut scroller = scroller_at(590.0);
    assert_eq!(scroller.start(0.0), StartOutcome::Started);
    assert_eq!(top(&scroller), 590.0);
    assert_eq!(scroller.start(10.0), StartOutcome::AlreadyPlaying);
    assert_eq!(scroller.scheduler().log.borrow().requested, 1);
}

#[test]
fn test_tick_advances_by_speed_and_delta() {
    let mut scroller = scroller_at(0.0);
    scroller.set_speed(4);
    scroller.start(0.0);

    assert_eq!(scroller.tick(125.0), TickOutcome::Advanced { scroll_top: 5.0 });
    assert_eq!(scroller.tick(250.0), TickOutcome::Advanced { scroll_top: 10.0 });
    assert_eq!(scroller.scheduler().log.borrow().requested, 3);
}

#[test]
fn test_speed_change_applies_next_frame() {
    let mut scroller = scroller_at(0.0);
    scroller.set_speed(4);
    scroller.start(0.0);
    scroller.tick(125.0);

    scroller.set_speed(8);
    assert!(scroller.is_playing());
    assert_eq!(scroller.tick(250.0), TickOutcome::Advanced { scroll_top: 15.0 });
}

#[test]
fn test_speed_is_clamped() {
    let mut scroller = scroller_at(0.0);
    assert_eq!(scroller.speed_level(), 3);
    assert_eq!(scroller.set_speed(0), 1);
    assert_eq!(scroller.set_speed(42), 10);
    assert_eq!(scroller.pixels_per_second(), 100.0);
}

#[test]
fn test_long_frame_is_skipped_but_rescheduled() {
    let mut scroller = scroller_at(0.0);
    scroller.start(0.0);

    assert_eq!(scroller.tick(1000.0), TickOutcome::Skipped);
    assert_eq!(top(&scroller), 0.0);
    assert!(scroller.is_playing());

    assert_eq!(scroller.tick(1125.0), TickOutcome::Advanced { scroll_top: 3.75 });
}

#[test]
fn test_reaches_bottom_and_stops() {
    let completions = Rc::new(Cell::new(0));
    let mut scroller = scroller_at(0.0);
    scroller.set_speed(10);
    let counter = Rc::clone(&completions);
    scroller.set_on_complete(move || counter.set(counter.get() + 1));
    scroller.start(0.0);

    // 100 px/s in 250ms frames: 25px each, 24 frames to 600
    let mut outcome = TickOutcome::Ignored;
    let mut frames = 0;
    for i in 1..=100 {
        outcome = scroller.tick(f64::from(i) * 250.0);
        frames = i;
        if outcome == TickOutcome::Completed {
            break;
        }
    }

    assert_eq!(outcome, TickOutcome::Completed);
    assert_eq!(frames, 24);
    assert!(!scroller.is_playing());
    assert_eq!(top(&scroller), 600.0);
    assert_eq!(scroller.progress(), 100.0);
    assert_eq!(completions.get(), 1);

    // a stale callback after completion does nothing
    assert_eq!(scroller.tick(100_000.0), TickOutcome::Ignored);
    assert_eq!(completions.get(), 1);
}

#[test]
fn test_extent_recomputed_each_tick() {
    let mut scroller = scroller_at(590.0);
    scroller.set_speed(10);
    scroller.start(0.0);

    // content grows while playing
    scroller.container_mut().scroll_height = 2000.0;
    assert_eq!(scroller.tick(250.0), TickOutcome::Advanced { scroll_top: 615.0 });

    // and shrinks below the current position
    scroller.container_mut().scroll_height = 600.0;
    assert_eq!(scroller.tick(500.0), TickOutcome::Completed);
    assert!(!scroller.is_playing());
}

#[test]
fn test_stop_is_idempotent() {
    let mut scroller = scroller_at(0.0);
    scroller.stop();
    assert!(scroller.scheduler().log.borrow().cancelled.is_empty());

    scroller.start(0.0);
    scroller.tick(125.0);
    scroller.stop();
    scroller.stop();
    assert_eq!(scroller.scheduler().log.borrow().cancelled, vec![2]);

    let before = top(&scroller);
    assert_eq!(scroller.tick(250.0), TickOutcome::Ignored);
    assert_eq!(top(&scroller), before);
}

#[test]
fn test_toggle() {
    let mut scroller = scroller_at(0.0);
    assert!(scroller.toggle(0.0));
    assert!(scroller.state().is_playing);
    assert!(!scroller.toggle(10.0));
    assert!(!scroller.state().is_playing);

    let mut empty = AutoScroller::new(FakeContainer::new(0.0, 100.0, 400.0), FakeScheduler::default());
    assert!(!empty.toggle(0.0));
}

#[test]
fn test_drop_cancels_pending_frame() {
    let scheduler = FakeScheduler::default();
    let log = Rc::clone(&scheduler.log);
    {
        let mut scroller = AutoScroller::new(FakeContainer::new(0.0, 1000.0, 400.0), scheduler);
        scroller.start(0.0);
    }
    assert_eq!(log.borrow().cancelled, vec![1]);
}

#[test]
fn test_manual_scroll_is_followed() {
    let mut scroller = scroller_at(0.0);
    scroller.start(0.0);
    scroller.tick(125.0);

    scroller.container_mut().set_scroll_top(300.0);
    assert_eq!(scroller.tick(250.0), TickOutcome::Advanced { scroll_top: 303.75 });
}

#[test]
fn test_slow_speed_survives_rounding() {
    let mut container = FakeContainer::new(0.0, 1000.0, 400.0);
    container.round = true;
    let mut scroller = AutoScroller::new(container, FakeScheduler::default());
    scroller.set_speed(1);
    scroller.start(0.0);

    // 10 px/s at 60fps is well under a pixel per frame
    for i in 1..=30 {
        scroller.tick(f64::from(i) * 16.0);
    }
    assert!(top(&scroller) >= 4.0);
    assert!(scroller.is_playing());
}

#[test]
fn test_progress_tracks_scroll_position() {
    let mut scroller = scroller_at(150.0);
    assert_eq!(scroller.progress(), 25.0);

    scroller.container_mut().set_scroll_top(300.0);
    assert_eq!(scroller.on_scroll(), 50.0);

    let state = scroller.state();
    assert_eq!(state.progress_percent, 50.0);
    assert_eq!(state.speed_level, 3);
}

#[test]
fn test_custom_config() {
    let config = ScrollConfig {
        pixels_per_level: 20.0,
        default_speed: 2,
        ..ScrollConfig::default()
    };
    let mut scroller =
        AutoScroller::with_config(FakeContainer::new(0.0, 1000.0, 400.0), FakeScheduler::default(), config);
    scroller.start(0.0);
    assert_eq!(scroller.tick(125.0), TickOutcome::Advanced { scroll_top: 5.0 });
}

#[test]
fn test_state_serializes_camel_case() {
    let scroller = scroller_at(0.0);
    let json = serde_json::to_value(scroller.state()).unwrap();
    assert_eq!(json["isPlaying"], false);
    assert_eq!(json["speedLevel"], 3);
}

#[test]
fn test_start_rejected_when_host_refuses_frames() {
    let mut scroller = scroller_at(597.0);
    scroller.scheduler().log.borrow_mut().refuse = true;

    assert_eq!(scroller.start(0.0), StartOutcome::Rejected);
    assert!(!scroller.is_playing());
    // nothing changed, not even the restart from the top
    assert_eq!(top(&scroller), 597.0);
    assert!(!scroller.toggle(10.0));
}

#[test]
fn test_refused_frame_halts_playback() {
    let mut scroller = scroller_at(0.0);
    scroller.set_speed(4);
    assert_eq!(scroller.start(0.0), StartOutcome::Started);

    scroller.scheduler().log.borrow_mut().refuse = true;
    assert_eq!(scroller.tick(125.0), TickOutcome::Halted);
    assert!(!scroller.is_playing());
    assert_eq!(top(&scroller), 5.0);
    assert_eq!(scroller.tick(250.0), TickOutcome::Ignored);

    // playback resumes once frames are available again
    scroller.scheduler().log.borrow_mut().refuse = false;
    assert_eq!(scroller.start(300.0), StartOutcome::Started);
    assert!(scroller.state().is_playing);
}
