//! Cenphi event bus and event log.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventLog`]: background consumer that writes every event to the
//!   structured log and keeps the most recent ones in memory.

pub mod bus;
pub mod log;
pub mod names;

pub use bus::{EventBus, PlatformEvent};
pub use log::EventLog;
