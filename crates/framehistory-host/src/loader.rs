//! Delivering synthesized documents into the child frame.
//!
//! Loading is fire-and-forget: nothing here waits for the navigation to
//! finish or confirms that a history entry was created. Some engines (notably
//! Firefox) fold rapid successive navigations into a single history entry;
//! that is a limitation of the host, not something the loader retries.

use framehistory_protocol::encode_data_url;
use tracing::debug;

use crate::engine::LoadStrategy;
use crate::error::HostResult;

/// The child frame as seen by the loader.
pub trait Frame {
    /// Opens the frame's own document, writes `source`, closes it.
    fn write_document(&self, source: &str) -> HostResult<()>;

    /// Navigates the frame to `url`.
    fn navigate(&self, url: &str) -> HostResult<()>;
}

/// Loads documents into frames with a fixed strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoader {
    strategy: LoadStrategy,
}

impl FrameLoader {
    /// Creates a loader using `strategy` for every load.
    pub fn new(strategy: LoadStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the loader's strategy.
    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Starts loading `source` into `frame`.
    pub fn load(&self, frame: &dyn Frame, source: &str) -> HostResult<()> {
        match self.strategy {
            LoadStrategy::DocumentWrite => {
                debug!(bytes = source.len(), "Writing document into frame");
                frame.write_document(source)
            }
            LoadStrategy::DataUrl => {
                let url = encode_data_url(source);
                debug!(bytes = url.len(), "Navigating frame to data URL");
                frame.navigate(&url)
            }
        }
    }
}
