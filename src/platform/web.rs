//! Browser scheduler: `requestAnimationFrame` and `setInterval`

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{ScheduleHandle, Scheduler, Wakeup};
use crate::sim::SpawnTimer;

type Dispatch = Rc<dyn Fn(Wakeup)>;

/// Schedules browser callbacks that forward to `dispatch`
pub struct WebScheduler {
    dispatch: Dispatch,
}

impl WebScheduler {
    pub fn new(dispatch: impl Fn(Wakeup) + 'static) -> Self {
        Self {
            dispatch: Rc::new(dispatch),
        }
    }
}

/// Request the next frame of a loop, unless it was cancelled meanwhile
fn request_frame(dispatch: Dispatch, alive: Rc<Cell<bool>>, request_id: Rc<Cell<Option<i32>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let next_id = Rc::clone(&request_id);
    let closure = Closure::once(move |_time: f64| {
        request_id.set(None);
        if !alive.get() {
            return;
        }
        dispatch(Wakeup::Frame);
        if alive.get() {
            request_frame(dispatch, alive, request_id);
        }
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => next_id.set(Some(id)),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

impl Scheduler for WebScheduler {
    fn start_frames(&mut self) -> ScheduleHandle {
        let alive = Rc::new(Cell::new(true));
        let request_id = Rc::new(Cell::new(None));
        request_frame(self.dispatch.clone(), alive.clone(), request_id.clone());

        ScheduleHandle::new(move || {
            alive.set(false);
            if let (Some(id), Some(window)) = (request_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        })
    }

    fn start_interval(&mut self, timer: SpawnTimer, period_ms: u32) -> ScheduleHandle {
        let dispatch = self.dispatch.clone();
        let closure = Closure::<dyn FnMut()>::new(move || dispatch(Wakeup::Timer(timer)));

        let id = web_sys::window().and_then(|window| {
            window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms.min(i32::MAX as u32) as i32,
                )
                .map_err(|e| log::error!("setInterval failed: {:?}", e))
                .ok()
        });

        ScheduleHandle::new(move || {
            if let (Some(id), Some(window)) = (id, web_sys::window()) {
                window.clear_interval_with_handle(id);
            }
            drop(closure);
        })
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
