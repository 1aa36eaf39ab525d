//! In-memory host: a window with one child frame and no browser.
//!
//! [`HeadlessFrame`] keeps a navigation history of loaded documents.
//! [`HeadlessWindow::run_child`] plays the part of the browser executing the
//! frame's current document: it extracts the document's self-post and
//! dispatches it on the window's message channel.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use framehistory_protocol::{ChildDocument, TargetOrigin, decode_data_url};
use tracing::debug;

use crate::error::{HostError, HostResult};
use crate::loader::Frame;
use crate::window::{HostWindow, Location, MessageHandler};

/// User agent reported by [`HeadlessWindow`] unless overridden.
pub const HEADLESS_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) framehistory-headless/0.1";

/// One document in the frame's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEntry {
    /// URL the frame navigated to; `None` for written documents.
    pub url: Option<String>,
    /// The document source.
    pub source: String,
}

/// A child frame with its own session history.
#[derive(Debug, Default)]
pub struct HeadlessFrame {
    entries: RefCell<Vec<FrameEntry>>,
    index: Cell<Option<usize>>,
}

impl HeadlessFrame {
    /// Number of entries in the frame's history.
    pub fn history_len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Position of the current entry.
    pub fn history_index(&self) -> Option<usize> {
        self.index.get()
    }

    /// The entry currently shown.
    pub fn current(&self) -> Option<FrameEntry> {
        let index = self.index.get()?;
        self.entries.borrow().get(index).cloned()
    }

    /// Moves one entry back. Returns `false` at the start of history.
    pub fn go_back(&self) -> bool {
        match self.index.get() {
            Some(index) if index > 0 => {
                self.index.set(Some(index - 1));
                true
            }
            _ => false,
        }
    }

    /// Moves one entry forward. Returns `false` at the end of history.
    pub fn go_forward(&self) -> bool {
        match self.index.get() {
            Some(index) if index + 1 < self.history_len() => {
                self.index.set(Some(index + 1));
                true
            }
            _ => false,
        }
    }

    // A new entry drops everything forward of the current one.
    fn push_entry(&self, entry: FrameEntry) {
        let mut entries = self.entries.borrow_mut();
        let keep = self.index.get().map_or(0, |index| index + 1);
        entries.truncate(keep);
        entries.push(entry);
        self.index.set(Some(entries.len() - 1));
    }
}

impl Frame for HeadlessFrame {
    /// Legacy engines add a history entry for every open/write/close cycle,
    /// and so does this frame.
    fn write_document(&self, source: &str) -> HostResult<()> {
        self.push_entry(FrameEntry {
            url: None,
            source: source.to_string(),
        });
        Ok(())
    }

    fn navigate(&self, url: &str) -> HostResult<()> {
        if !url.starts_with("data:") {
            return Err(HostError::frame(format!(
                "headless frame can only load data: URLs, got {url}"
            )));
        }
        let source = decode_data_url(url)?;
        self.push_entry(FrameEntry {
            url: Some(url.to_string()),
            source,
        });
        Ok(())
    }
}

/// A window with a title, a message channel and one child frame.
pub struct HeadlessWindow {
    user_agent: String,
    location: Location,
    title: RefCell<String>,
    listeners: RefCell<Vec<Rc<dyn Fn(&str)>>>,
    frame: Rc<HeadlessFrame>,
}

impl HeadlessWindow {
    /// Creates a window at `location` with an empty frame.
    pub fn new(location: Location) -> Self {
        Self {
            user_agent: HEADLESS_USER_AGENT.to_string(),
            location,
            title: RefCell::new(String::new()),
            listeners: RefCell::new(Vec::new()),
            frame: Rc::new(HeadlessFrame::default()),
        }
    }

    /// Builder: report a different user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The window's current document title.
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// The child frame.
    pub fn frame(&self) -> Rc<HeadlessFrame> {
        Rc::clone(&self.frame)
    }

    /// The window's serialized origin.
    pub fn origin(&self) -> String {
        let location = &self.location;
        TargetOrigin::from_location(location.origin.as_deref(), &location.protocol, &location.host)
            .map(|origin| origin.as_str().to_string())
            .unwrap_or_else(|_| format!("{}//{}", location.protocol, location.host))
    }

    /// Dispatches `data` to every message listener, as any sender could.
    pub fn post_message(&self, data: &str) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(data);
        }
    }

    /// Executes the frame's current document.
    ///
    /// Returns `Ok(false)` when the document's target origin does not admit
    /// this window, in which case the message is dropped as a browser would.
    pub fn run_child(&self) -> HostResult<bool> {
        let entry = self
            .frame
            .current()
            .ok_or_else(|| HostError::frame("no document loaded in frame"))?;
        let child = ChildDocument::parse(&entry.source)?;

        let target = TargetOrigin::parse(&child.target_origin)?;
        let origin = self.origin();
        if !target.admits(&origin) {
            debug!(target = %target, origin = %origin, "Child message not admitted by target origin");
            return Ok(false);
        }

        self.post_message(&child.payload);
        Ok(true)
    }
}

impl HostWindow for HeadlessWindow {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn add_message_listener(&self, handler: MessageHandler) -> HostResult<()> {
        self.listeners.borrow_mut().push(Rc::from(handler));
        Ok(())
    }
}

impl std::fmt::Debug for HeadlessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessWindow")
            .field("user_agent", &self.user_agent)
            .field("location", &self.location)
            .field("title", &self.title)
            .field("listeners", &self.listeners.borrow().len())
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framehistory_protocol::{StateEnvelope, encode, encode_data_url, synthesize};
    use serde_json::json;

    fn document(title: &str, origin: &str) -> String {
        let envelope = StateEnvelope::new(json!({"title": title}), title, true, 1);
        synthesize(&envelope, &TargetOrigin::parse(origin).unwrap()).unwrap()
    }

    fn window() -> HeadlessWindow {
        HeadlessWindow::new(Location::new("https:", "app.example"))
    }

    #[test]
    fn frame_history_navigation() {
        let frame = HeadlessFrame::default();
        assert!(frame.current().is_none());
        assert!(!frame.go_back());

        frame.write_document("one").unwrap();
        frame.navigate(&encode_data_url("two")).unwrap();
        frame.write_document("three").unwrap();
        assert_eq!(frame.history_len(), 3);
        assert_eq!(frame.current().unwrap().source, "three");

        assert!(frame.go_back());
        assert_eq!(frame.current().unwrap().source, "two");
        assert!(frame.current().unwrap().url.is_some());
        assert!(frame.go_back());
        assert!(!frame.go_back());
        assert!(frame.go_forward());
        assert_eq!(frame.history_index(), Some(1));
    }

    #[test]
    fn new_entry_discards_forward_history() {
        let frame = HeadlessFrame::default();
        frame.write_document("a").unwrap();
        frame.write_document("b").unwrap();
        frame.write_document("c").unwrap();
        frame.go_back();
        frame.go_back();

        frame.write_document("d").unwrap();
        assert_eq!(frame.history_len(), 2);
        assert_eq!(frame.current().unwrap().source, "d");
        assert!(!frame.go_forward());
    }

    #[test]
    fn frame_only_loads_data_urls() {
        let frame = HeadlessFrame::default();
        let result = frame.navigate("https://app.example/page");
        assert!(matches!(result, Err(HostError::Frame { .. })));
        assert_eq!(frame.history_len(), 0);
    }

    #[test]
    fn run_child_posts_payload_to_listeners() {
        let window = window();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        window
            .add_message_listener(Box::new(move |data: &str| sink.borrow_mut().push(data.to_string())))
            .unwrap();

        let source = document("Page 1", "https://app.example");
        window.frame().write_document(&source).unwrap();
        assert!(window.run_child().unwrap());

        let expected =
            encode(&StateEnvelope::new(json!({"title": "Page 1"}), "Page 1", true, 1)).unwrap();
        assert_eq!(*seen.borrow(), vec![expected]);
    }

    #[test]
    fn run_child_respects_target_origin() {
        let window = window();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        window
            .add_message_listener(Box::new(move |_: &str| counter.set(counter.get() + 1)))
            .unwrap();

        window
            .frame()
            .write_document(&document("x", "https://other.example"))
            .unwrap();
        assert!(!window.run_child().unwrap());
        assert_eq!(count.get(), 0);

        window.frame().write_document(&document("x", "*")).unwrap();
        assert!(window.run_child().unwrap());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn run_child_without_document_fails() {
        assert!(matches!(window().run_child(), Err(HostError::Frame { .. })));
    }

    #[test]
    fn origin_falls_back_without_accessor() {
        let window =
            HeadlessWindow::new(Location::new("http:", "localhost:8080").without_origin());
        assert_eq!(window.origin(), "http://localhost:8080");
    }
}
