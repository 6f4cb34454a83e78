//! Auto-scroll driven by `requestAnimationFrame` on a page element.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chordsheet::scroll::{AutoScroller, FrameScheduler, ScrollContainer, TickOutcome};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use crate::{read_config, to_js};

type FrameCallback = Closure<dyn FnMut(f64)>;
type Scroller = AutoScroller<ElementContainer, AnimationFrames>;

/// The scrollable song element.
struct ElementContainer {
    element: HtmlElement,
}

impl ScrollContainer for ElementContainer {
    fn scroll_top(&self) -> f64 {
        f64::from(self.element.scroll_top())
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.element.set_scroll_top(top.round() as i32);
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.element.scroll_height())
    }

    fn client_height(&self) -> f64 {
        f64::from(self.element.client_height())
    }
}

struct AnimationFrames {
    window: Window,
    /// Filled in once the scroller exists; it only holds a weak reference back.
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameScheduler for AnimationFrames {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.borrow();
        let function = callback.as_ref()?.as_ref().unchecked_ref();
        match self.window.request_animation_frame(function) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, id: i32) {
        if let Err(e) = self.window.cancel_animation_frame(id) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Auto-scroll for one song view. Call `free()` when the view goes away: it
/// cancels a pending frame and removes the scroll listener.
#[wasm_bindgen]
pub struct ScrollController {
    scroller: Rc<RefCell<Scroller>>,
    window: Window,
    element: HtmlElement,
    on_complete: Rc<RefCell<Option<js_sys::Function>>>,
    on_progress: Rc<RefCell<Option<js_sys::Function>>>,
    scroll_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl ScrollController {
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, config_yaml: Option<String>) -> Result<ScrollController, JsValue> {
        let config = read_config(config_yaml)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let frames = AnimationFrames {
            window: window.clone(),
            callback: Rc::clone(&callback),
        };
        let scroller = Rc::new(RefCell::new(AutoScroller::with_config(
            ElementContainer {
                element: element.clone(),
            },
            frames,
            config.scroll,
        )));
        let on_complete: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));

        let weak: Weak<RefCell<Scroller>> = Rc::downgrade(&scroller);
        let complete = Rc::clone(&on_complete);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let Some(scroller) = weak.upgrade() else {
                return;
            };
            let outcome = scroller.borrow_mut().tick(now);
            // The scroller is released before calling back into JS.
            if outcome == TickOutcome::Completed {
                if let Some(callback) = complete.borrow().as_ref() {
                    if let Err(e) = callback.call0(&JsValue::NULL) {
                        log::warn!("auto-scroll completion callback failed: {:?}", e);
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let on_progress: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
        let weak: Weak<RefCell<Scroller>> = Rc::downgrade(&scroller);
        let progress_callback = Rc::clone(&on_progress);
        let scroll_listener = Closure::wrap(Box::new(move || {
            let Some(scroller) = weak.upgrade() else {
                return;
            };
            let Ok(mut scroller) = scroller.try_borrow_mut() else {
                return;
            };
            let percent = scroller.on_scroll();
            drop(scroller);
            if let Some(callback) = progress_callback.borrow().as_ref() {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(percent)) {
                    log::warn!("auto-scroll progress callback failed: {:?}", e);
                }
            }
        }) as Box<dyn FnMut()>);
        element.add_event_listener_with_callback("scroll", scroll_listener.as_ref().unchecked_ref())?;

        Ok(ScrollController {
            scroller,
            window,
            element,
            on_complete,
            on_progress,
            scroll_listener,
        })
    }

    /// Play or pause; returns whether it is playing afterwards.
    pub fn toggle(&self) -> bool {
        let now = now(&self.window);
        self.scroller.borrow_mut().toggle(now)
    }

    pub fn play(&self) -> bool {
        let now = now(&self.window);
        self.scroller.borrow_mut().start(now).is_playing()
    }

    pub fn stop(&self) {
        self.scroller.borrow_mut().stop();
    }

    pub fn is_playing(&self) -> bool {
        self.scroller.borrow().is_playing()
    }

    pub fn set_speed(&self, level: u8) -> u8 {
        self.scroller.borrow_mut().set_speed(level)
    }

    /// Recompute progress now (the element's `scroll` event already does);
    /// returns it in percent.
    pub fn on_scroll(&self) -> f64 {
        self.scroller.borrow_mut().on_scroll()
    }

    /// `{ isPlaying, speedLevel, progressPercent }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.scroller.borrow().state())
    }

    pub fn set_on_complete(&self, callback: Option<js_sys::Function>) {
        *self.on_complete.borrow_mut() = callback;
    }

    /// Called with the progress percentage on every scroll of the element.
    pub fn set_on_progress(&self, callback: Option<js_sys::Function>) {
        *self.on_progress.borrow_mut() = callback;
    }
}

impl Drop for ScrollController {
    fn drop(&mut self) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback("scroll", self.scroll_listener.as_ref().unchecked_ref())
        {
            log::warn!("could not remove scroll listener: {:?}", e);
        }
        if let Ok(mut scroller) = self.scroller.try_borrow_mut() {
            scroller.stop();
        }
    }
}
