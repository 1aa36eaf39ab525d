//! JavaScript-facing `IframeHistory` class.

use std::rc::Rc;

use framehistory_host::{FrameHistory, HostError, HostResult};
use framehistory_protocol::ProtocolError;
use js_sys::{Function, JSON};
use serde_json::Value;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlIFrameElement;

use crate::frame::BrowserFrame;
use crate::scheduler::TimeoutScheduler;
use crate::window::BrowserWindow;

/// Parses the output of `JSON.stringify`. `None` stands for `undefined`,
/// which has no JSON form and is sent as `null`.
pub fn state_from_json(text: Option<&str>) -> HostResult<Value> {
    match text {
        Some(text) => serde_json::from_str(text).map_err(|err| ProtocolError::from(err).into()),
        None => Ok(Value::Null),
    }
}

fn to_js_error(err: HostError) -> JsError {
    JsError::new(&err.to_string())
}

/// History for a single-page app, kept in a hidden iframe.
#[wasm_bindgen]
pub struct IframeHistory {
    inner: FrameHistory,
}

#[wasm_bindgen]
impl IframeHistory {
    /// Binds to the global window, optionally with the iframe to push into.
    #[wasm_bindgen(constructor)]
    pub fn new(frame: Option<HtmlIFrameElement>) -> Result<IframeHistory, JsError> {
        let window = BrowserWindow::current().map_err(to_js_error)?;
        let scheduler = Rc::new(TimeoutScheduler::new(window.inner().clone()));
        let inner = FrameHistory::builder(Rc::new(window))
            .with_scheduler(scheduler)
            .build()
            .map_err(to_js_error)?;
        if let Some(frame) = frame {
            inner.set_frame(Rc::new(BrowserFrame::new(frame)));
        }
        Ok(Self { inner })
    }

    /// Replaces the iframe used by `pushState`.
    #[wasm_bindgen(js_name = setFrame)]
    pub fn set_frame(&self, frame: HtmlIFrameElement) {
        self.inner.set_frame(Rc::new(BrowserFrame::new(frame)));
    }

    /// Records `state` as a new history entry of the iframe.
    #[wasm_bindgen(js_name = pushState)]
    pub fn push_state(&self, state: JsValue, title: &str, force: Option<bool>) -> Result<(), JsError> {
        let text = if state.is_undefined() {
            None
        } else {
            let text = JSON::stringify(&state)
                .map_err(|err| JsError::new(&format!("state is not serializable: {err:?}")))?;
            Some(String::from(text))
        };
        let state = state_from_json(text.as_deref()).map_err(to_js_error)?;
        self.inner
            .push_state(state, title, force.unwrap_or(false))
            .map_err(to_js_error)
    }

    /// Registers the callback receiving states; replaces any earlier one.
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        self.inner.on_state_change(move |state| {
            let value = match JSON::parse(&state.to_string()) {
                Ok(value) => value,
                Err(err) => {
                    warn!(error = ?err, "Could not rebuild state in JavaScript");
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                warn!(error = ?err, "State change callback threw");
            }
        });
    }

    /// The origin child documents post to.
    #[wasm_bindgen(getter, js_name = targetOrigin)]
    pub fn target_origin(&self) -> String {
        self.inner.target_origin().to_string()
    }
}
