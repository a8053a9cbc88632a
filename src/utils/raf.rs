//! Self-rescheduling `requestAnimationFrame` loop with explicit cancellation.
//!
//! The closure and the shared control block reference each other so the loop
//! can reschedule itself; `cancel` breaks the cycle by dropping the closure,
//! which also releases the JS-side function. Components keep the handle alive
//! for the lifetime of the view; dropping it cancels the loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct RafInner {
    frame_id: Cell<Option<i32>>,
    cancelled: Cell<bool>,
    closure: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

pub struct RafHandle {
    inner: Rc<RafInner>,
}

impl RafHandle {
    /// Stops the loop. Safe to call more than once.
    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        if let Some(id) = self.inner.frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.inner.closure.borrow_mut().take();
    }
}

impl Drop for RafHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts an animation-frame loop calling `tick` with the frame timestamp
/// until the returned handle is cancelled or dropped.
pub fn start_raf_loop(mut tick: impl FnMut(f64) + 'static) -> RafHandle {
    let inner = Rc::new(RafInner {
        frame_id: Cell::new(None),
        cancelled: Cell::new(false),
        closure: RefCell::new(None),
    });

    let loop_inner = Rc::clone(&inner);
    let closure = Closure::wrap(Box::new(move |timestamp: f64| {
        if loop_inner.cancelled.get() {
            return;
        }
        tick(timestamp);
        if loop_inner.cancelled.get() {
            return;
        }
        schedule(&loop_inner);
    }) as Box<dyn FnMut(f64)>);

    inner.closure.replace(Some(closure));
    schedule(&inner);

    RafHandle { inner }
}

fn schedule(inner: &Rc<RafInner>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = inner.closure.borrow();
    if let Some(closure) = closure.as_ref() {
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => inner.frame_id.set(Some(id)),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }
}
