//! Caller-facing facade.
//!
//! A [`FrameHistory`] is built once per window. Building it registers the
//! window's single message listener, which lives as long as the window; there
//! is no way to unregister it.

use std::cell::RefCell;
use std::rc::Rc;

use framehistory_core::{Clock, SystemClock};
use framehistory_protocol::{StateEnvelope, TargetOrigin, synthesize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::HistoryConfig;
use crate::engine::LoadStrategy;
use crate::error::{HostError, HostResult};
use crate::listener::ChannelListener;
use crate::loader::{Frame, FrameLoader};
use crate::queue::DeliveryQueue;
use crate::scheduler::Scheduler;
use crate::window::HostWindow;

#[cfg(feature = "tokio")]
fn default_scheduler() -> HostResult<Rc<dyn Scheduler>> {
    Ok(Rc::new(crate::scheduler::LocalScheduler))
}

#[cfg(not(feature = "tokio"))]
fn default_scheduler() -> HostResult<Rc<dyn Scheduler>> {
    Err(HostError::config(
        "no scheduler given and the tokio feature is disabled",
    ))
}

/// Builder for [`FrameHistory`].
pub struct FrameHistoryBuilder {
    window: Rc<dyn HostWindow>,
    config: HistoryConfig,
    scheduler: Option<Rc<dyn Scheduler>>,
    clock: Option<Rc<dyn Clock>>,
}

impl FrameHistoryBuilder {
    /// Builder: use `config` instead of the protocol defaults.
    pub fn with_config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder: deliver states through `scheduler`.
    ///
    /// Defaults to `LocalScheduler`, which needs a tokio `LocalSet`.
    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Builder: timestamp and age envelopes with `clock`.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Resolves origin and strategy, and registers the message listener.
    pub fn build(self) -> HostResult<FrameHistory> {
        let Self {
            window,
            config,
            scheduler,
            clock,
        } = self;
        config.validate()?;

        let origin = match &config.target_origin {
            Some(origin) => TargetOrigin::parse(origin)?,
            None => {
                let location = window.location();
                TargetOrigin::from_location(
                    location.origin.as_deref(),
                    &location.protocol,
                    &location.host,
                )?
            }
        };
        let loader = FrameLoader::new(config.strategy.resolve(&window.user_agent()));

        let scheduler = match scheduler {
            Some(scheduler) => scheduler,
            None => default_scheduler()?,
        };
        let clock: Rc<dyn Clock> = match clock {
            Some(clock) => clock,
            None => Rc::new(SystemClock),
        };
        let queue = DeliveryQueue::new(scheduler);
        let listener = Rc::new(ChannelListener::new(
            &config,
            &window,
            Rc::clone(&clock),
            queue.clone(),
        ));

        let handler = Rc::clone(&listener);
        window.add_message_listener(Box::new(move |data: &str| {
            handler.receive(data);
        }))?;

        info!(
            origin = %origin,
            strategy = ?loader.strategy(),
            stale_threshold_ms = config.stale_threshold_ms,
            "Frame history listener installed"
        );

        Ok(FrameHistory {
            window,
            config,
            origin,
            loader,
            clock,
            listener,
            queue,
            frame: RefCell::new(None),
        })
    }
}

/// Pushes application state into the child frame and hands states coming
/// back from it to the subscriber.
pub struct FrameHistory {
    window: Rc<dyn HostWindow>,
    config: HistoryConfig,
    origin: TargetOrigin,
    loader: FrameLoader,
    clock: Rc<dyn Clock>,
    listener: Rc<ChannelListener>,
    queue: DeliveryQueue,
    frame: RefCell<Option<Rc<dyn Frame>>>,
}

impl FrameHistory {
    /// Starts building a history bound to `window`.
    pub fn builder(window: Rc<dyn HostWindow>) -> FrameHistoryBuilder {
        FrameHistoryBuilder {
            window,
            config: HistoryConfig::default(),
            scheduler: None,
            clock: None,
        }
    }

    /// Registers the frame used by [`FrameHistory::push_state`].
    pub fn set_frame(&self, frame: Rc<dyn Frame>) {
        *self.frame.borrow_mut() = Some(frame);
    }

    /// Pushes a state into the registered frame.
    pub fn push_state(&self, object: Value, title: &str, force: bool) -> HostResult<()> {
        let frame = self.frame.borrow().clone().ok_or(HostError::NoFrame)?;
        self.push_state_to(&*frame, object, title, force)
    }

    /// Pushes a state into `frame`.
    ///
    /// Returns once the load has been started. Whether the host creates a
    /// history entry for it is not observable here.
    pub fn push_state_to(
        &self,
        frame: &dyn Frame,
        object: Value,
        title: &str,
        force: bool,
    ) -> HostResult<()> {
        let envelope = StateEnvelope::new(object, title, force, self.clock.now_millis())
            .with_tag(self.config.reserved_tag.as_str());
        let document = synthesize(&envelope, &self.origin)?;
        debug!(force, timestamp = envelope.timestamp, "Pushing state");
        self.loader.load(frame, &document)
    }

    /// Registers the single state-change subscriber, replacing any previous
    /// one. A state that arrived before any subscriber is replayed to it.
    pub fn on_state_change(&self, callback: impl Fn(Value) + 'static) {
        self.queue.subscribe(Rc::new(callback));
    }

    /// The origin child documents post to.
    pub fn target_origin(&self) -> &TargetOrigin {
        &self.origin
    }

    /// The frame loading strategy chosen at build time.
    pub fn strategy(&self) -> LoadStrategy {
        self.loader.strategy()
    }

    /// The active configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The installed channel listener.
    pub fn listener(&self) -> &ChannelListener {
        &self.listener
    }

    /// The window this history is bound to.
    pub fn window(&self) -> &Rc<dyn HostWindow> {
        &self.window
    }
}

impl std::fmt::Debug for FrameHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHistory")
            .field("config", &self.config)
            .field("origin", &self.origin)
            .field("loader", &self.loader)
            .field("listener", &self.listener)
            .field("has_frame", &self.frame.borrow().is_some())
            .finish()
    }
}
