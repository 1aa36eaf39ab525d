//! Browser bindings.
//!
//! Implements the host traits on top of `web-sys` and exports an
//! `IframeHistory` class to JavaScript:
//!
//! ```js
//! const history = new IframeHistory(document.getElementById("history-frame"));
//! history.onStateChange((state) => render(state));
//! history.pushState({ page: 2 }, "Page 2", false);
//! ```

pub mod bindings;
pub mod frame;
pub mod scheduler;
pub mod window;

pub use bindings::IframeHistory;
pub use frame::BrowserFrame;
pub use scheduler::TimeoutScheduler;
pub use window::BrowserWindow;
