//! Domain logic for the Cenphi testimonial platform.
//!
//! Pure, I/O-free building blocks shared by the API server: the guided
//! collection wizard, route-guard decisions, the moderation board, widget
//! embed configuration, and the analysis seam.

pub mod analysis;
pub mod collection;
pub mod error;
pub mod guards;
pub mod moderation;
pub mod prompts;
pub mod testimonial;
pub mod types;
pub mod widget;
