//! [`Scheduler`] on the browser's timer queue.

use framehistory_host::{Scheduler, Task};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Delay handed to `setTimeout`, in milliseconds.
pub const DEFER_DELAY_MS: i32 = 1;

/// Runs tasks from `setTimeout` callbacks.
#[derive(Debug, Clone)]
pub struct TimeoutScheduler {
    window: web_sys::Window,
}

impl TimeoutScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) {
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                DEFER_DELAY_MS,
            )
        {
            warn!(error = ?err, "setTimeout failed, task dropped");
        }
    }
}
