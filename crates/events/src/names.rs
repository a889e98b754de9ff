//! Event type names published on the bus.

pub const COLLECTION_STARTED: &str = "collection.started";
pub const COLLECTION_TYPE_SELECTED: &str = "collection.type_selected";
pub const COLLECTION_PROMPT_ADVANCED: &str = "collection.prompt_advanced";
pub const COLLECTION_SEGMENT_ADDED: &str = "collection.segment_added";
pub const COLLECTION_SUBMITTED: &str = "collection.submitted";
pub const TESTIMONIAL_CREATED: &str = "testimonial.created";
pub const TESTIMONIAL_STATUS_CHANGED: &str = "testimonial.status_changed";
