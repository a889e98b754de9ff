//! Request handlers.
//!
//! Each submodule provides the async handler functions for one area of the
//! API. Handlers delegate to `cenphi_core`, publish events on the bus for
//! mutations, and map errors via [`AppError`](crate::error::AppError).

pub mod analysis;
pub mod collection;
pub mod events;
pub mod guards;
pub mod testimonials;
pub mod widget;
