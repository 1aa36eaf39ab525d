//! [`HostWindow`] backed by the global `window`.

use framehistory_host::{HostError, HostResult, HostWindow, Location, MessageHandler};
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MessageEvent;

/// The browser window the library runs in.
#[derive(Debug, Clone)]
pub struct BrowserWindow {
    window: web_sys::Window,
}

impl BrowserWindow {
    /// Binds to the global `window`.
    pub fn current() -> HostResult<Self> {
        let window = web_sys::window().ok_or_else(|| HostError::listener("no global window"))?;
        Ok(Self { window })
    }

    /// The underlying `web_sys::Window`.
    pub fn inner(&self) -> &web_sys::Window {
        &self.window
    }
}

impl HostWindow for BrowserWindow {
    fn user_agent(&self) -> String {
        self.window.navigator().user_agent().unwrap_or_default()
    }

    fn location(&self) -> Location {
        let location = self.window.location();
        let protocol = location.protocol().unwrap_or_default();
        let host = location.host().unwrap_or_default();
        // Older engines have no location.origin.
        let origin = location.origin().ok().filter(|origin| !origin.is_empty());
        Location {
            origin,
            protocol,
            host,
        }
    }

    fn set_title(&self, title: &str) {
        match self.window.document() {
            Some(document) => document.set_title(title),
            None => warn!("Window has no document, title not applied"),
        }
    }

    fn add_message_listener(&self, handler: MessageHandler) -> HostResult<()> {
        let closure = Closure::<dyn FnMut(MessageEvent)>::wrap(Box::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(data) => handler(&data),
                None => trace!("Ignoring non-string message"),
            }
        }));
        self.window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(|err| HostError::listener(format!("addEventListener failed: {err:?}")))?;
        // Lives as long as the page.
        closure.forget();
        Ok(())
    }
}
