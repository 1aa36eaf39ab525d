//! Host runtime for framehistory.
//!
//! This crate wires the protocol into a window:
//! - [`Engine`] detection picks how documents reach the child frame
//! - [`FrameLoader`] writes or navigates the frame
//! - [`ChannelListener`] filters inbound messages on the shared channel
//! - [`DeliveryQueue`] hands accepted states to the single subscriber,
//!   always on a later turn of the event loop
//! - [`FrameHistory`] is the caller-facing facade
//!
//! The browser itself is reached through the [`HostWindow`], [`Frame`] and
//! [`Scheduler`] traits. [`HeadlessWindow`] implements them in memory.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use framehistory_host::{FrameHistory, HeadlessWindow, Location, TurnQueue};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let window = Rc::new(HeadlessWindow::new(Location::new("https:", "app.example")));
//! let turns = Rc::new(TurnQueue::default());
//! let history = FrameHistory::builder(window.clone())
//!     .with_scheduler(turns.clone())
//!     .build()?;
//!
//! history.on_state_change(|state| println!("state: {state}"));
//! history.push_state_to(&*window.frame(), json!({"count": 1}), "Page 1", true)?;
//!
//! window.run_child()?;
//! turns.run_until_idle();
//! assert_eq!(window.title(), "Page 1");
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod error;
mod headless;
mod history;
mod listener;
mod loader;
mod queue;
mod scheduler;
mod window;

pub use config::{HistoryConfig, StrategyPreference};
pub use engine::{Engine, LoadStrategy};
pub use error::{HostError, HostResult};
pub use headless::{FrameEntry, HEADLESS_USER_AGENT, HeadlessFrame, HeadlessWindow};
pub use history::{FrameHistory, FrameHistoryBuilder};
pub use listener::{ChannelListener, Disposition};
pub use loader::{Frame, FrameLoader};
pub use queue::{DeliveryQueue, StateCallback};
#[cfg(feature = "tokio")]
pub use scheduler::LocalScheduler;
pub use scheduler::{Scheduler, Task, TurnQueue};
pub use window::{HostWindow, Location, MessageHandler};
