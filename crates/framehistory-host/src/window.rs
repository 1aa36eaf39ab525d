//! The hosting window as seen by the runtime.

use crate::error::HostResult;

/// Handler for raw message data arriving on the window's message channel.
pub type MessageHandler = Box<dyn Fn(&str)>;

/// The hosting page's location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Combined origin accessor, when the environment exposes one.
    pub origin: Option<String>,
    /// Scheme including the trailing colon, e.g. `https:`.
    pub protocol: String,
    /// Host with optional port.
    pub host: String,
}

impl Location {
    /// Creates a location with a combined origin of `protocol//host`.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        let protocol = protocol.into();
        let host = host.into();
        Self {
            origin: Some(format!("{protocol}//{host}")),
            protocol,
            host,
        }
    }

    /// Builder: drop the combined origin accessor, as older engines do.
    pub fn without_origin(mut self) -> Self {
        self.origin = None;
        self
    }
}

/// A window hosting the child frame.
pub trait HostWindow {
    /// The browser's user agent string.
    fn user_agent(&self) -> String;

    /// The window's location.
    fn location(&self) -> Location;

    /// Sets the window's document title.
    fn set_title(&self, title: &str);

    /// Subscribes `handler` to every message posted to this window.
    ///
    /// The channel is shared: the handler sees messages from any sender.
    fn add_message_listener(&self, handler: MessageHandler) -> HostResult<()>;
}
