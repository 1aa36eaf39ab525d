//! Listener on the window's shared message channel.
//!
//! # Trust model
//!
//! The listener does not check the sender's origin. Documents loaded through
//! a `data:` URL post from an opaque origin that cannot be allowlisted, so the
//! reserved tag is the only authenticity check. Any script able to post to
//! the window can forge a state by including the tag. Dropping the `data:`
//! strategy would allow origin validation; that is a product decision, not
//! something this listener does on its own.

use std::rc::{Rc, Weak};

use framehistory_core::Clock;
use framehistory_protocol::decode;
use tracing::{debug, trace};

use crate::config::HistoryConfig;
use crate::queue::DeliveryQueue;
use crate::window::HostWindow;

/// What the listener did with an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Not JSON, or not shaped like an envelope.
    Foreign,
    /// An envelope carrying some other tag.
    ForeignTag,
    /// Ours, but too fresh and not forced. The title was still applied.
    Stale { age_ms: i64 },
    /// Forwarded to the delivery queue.
    Delivered,
}

/// Filters inbound messages and forwards accepted states.
pub struct ChannelListener {
    reserved_tag: String,
    stale_threshold_ms: u64,
    window: Weak<dyn HostWindow>,
    clock: Rc<dyn Clock>,
    queue: DeliveryQueue,
}

impl ChannelListener {
    /// Creates a listener applying titles to `window` and forwarding to `queue`.
    pub fn new(
        config: &HistoryConfig,
        window: &Rc<dyn HostWindow>,
        clock: Rc<dyn Clock>,
        queue: DeliveryQueue,
    ) -> Self {
        Self {
            reserved_tag: config.reserved_tag.clone(),
            stale_threshold_ms: config.stale_threshold_ms,
            window: Rc::downgrade(window),
            clock,
            queue,
        }
    }

    /// Handles one message from the channel.
    ///
    /// Title application and delivery are gated separately: every envelope
    /// carrying our tag sets the title, only forced or old-enough ones reach
    /// the subscriber.
    pub fn receive(&self, data: &str) -> Disposition {
        let Some(envelope) = decode(data) else {
            trace!(len = data.len(), "Ignoring non-envelope message");
            return Disposition::Foreign;
        };
        if !envelope.is_tagged(&self.reserved_tag) {
            trace!(tag = %envelope.reserved, "Ignoring message with foreign tag");
            return Disposition::ForeignTag;
        }

        if let Some(window) = self.window.upgrade() {
            window.set_title(&envelope.title);
        }

        let now = self.clock.now_millis();
        if !envelope.passes_staleness(now, self.stale_threshold_ms) {
            let age_ms = envelope.age_ms(now);
            debug!(
                age_ms,
                threshold_ms = self.stale_threshold_ms,
                "Dropping envelope that is too fresh"
            );
            return Disposition::Stale { age_ms };
        }

        debug!(
            force = envelope.force,
            age_ms = envelope.age_ms(now),
            "Accepted state envelope"
        );
        self.queue.push(envelope.object);
        Disposition::Delivered
    }
}

impl std::fmt::Debug for ChannelListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelListener")
            .field("reserved_tag", &self.reserved_tag)
            .field("stale_threshold_ms", &self.stale_threshold_ms)
            .field("queue", &self.queue)
            .finish()
    }
}
