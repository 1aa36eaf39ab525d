//! [`Frame`] backed by an `<iframe>` element.

use framehistory_host::{Frame, HostError, HostResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlIFrameElement};

/// An `<iframe>` in the embedding page.
#[derive(Debug, Clone)]
pub struct BrowserFrame {
    element: HtmlIFrameElement,
}

impl BrowserFrame {
    pub fn new(element: HtmlIFrameElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlIFrameElement {
        &self.element
    }
}

fn js_error(action: &str, err: JsValue) -> HostError {
    HostError::frame(format!("{action} failed: {err:?}"))
}

impl Frame for BrowserFrame {
    fn write_document(&self, source: &str) -> HostResult<()> {
        let document = self
            .element
            .content_document()
            .ok_or_else(|| HostError::frame("frame document is not accessible"))?;
        let document = document.unchecked_into::<HtmlDocument>();
        document.open().map_err(|err| js_error("document.open", err))?;
        document
            .write_1(source)
            .map_err(|err| js_error("document.write", err))?;
        document.close().map_err(|err| js_error("document.close", err))
    }

    fn navigate(&self, url: &str) -> HostResult<()> {
        self.element.set_src(url);
        Ok(())
    }
}
