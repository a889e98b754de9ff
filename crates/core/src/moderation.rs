//! In-memory testimonial board backing the review dashboard.

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::testimonial::{ContentStatus, NewTestimonial, Testimonial, TestimonialType, UsageMetrics};
use crate::types::Timestamp;

/// Dashboard list filter. Empty lists match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialFilter {
    #[serde(default)]
    pub statuses: Vec<ContentStatus>,
    #[serde(default)]
    pub types: Vec<TestimonialType>,
    #[serde(default)]
    pub workspace_id: Option<Uuid>,
    #[serde(default)]
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub max_rating: Option<f32>,
    /// Inclusive lower bound on `created_at`.
    #[serde(default)]
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    #[serde(default)]
    pub created_to: Option<Timestamp>,
    /// Case-insensitive substring match over content, transcript and
    /// customer name.
    #[serde(default)]
    pub search: Option<String>,
}

impl TestimonialFilter {
    pub fn matches(&self, t: &Testimonial) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&t.status) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&t.kind) {
            return false;
        }
        if self.workspace_id.is_some_and(|w| w != t.workspace_id) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if t.rating.map_or(true, |r| r < min) {
                return false;
            }
        }
        if let Some(max) = self.max_rating {
            if t.rating.map_or(true, |r| r > max) {
                return false;
            }
        }
        if self.created_from.is_some_and(|from| t.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| t.created_at > to) {
            return false;
        }
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let haystacks = [
                t.content.as_deref(),
                t.transcript.as_deref(),
                t.customer.name.as_deref(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&query))
            {
                return false;
            }
        }
        true
    }
}

/// Testimonials held for moderation, keyed by id.
#[derive(Debug, Default)]
pub struct TestimonialBoard {
    items: HashMap<Uuid, Testimonial>,
}

impl TestimonialBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validate and store a new testimonial in `pending_review`.
    pub fn create(&mut self, input: NewTestimonial) -> Result<Testimonial, CoreError> {
        input.validate()?;
        let now = chrono::Utc::now();
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            workspace_id: input.workspace_id,
            kind: input.kind,
            status: ContentStatus::PendingReview,
            content: input.content,
            transcript: input.transcript,
            media_urls: input.media_urls,
            rating: input.rating,
            customer: input.customer,
            collection_method: input.collection_method,
            tags: input.tags,
            metrics: UsageMetrics::default(),
            analyses: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.items.insert(testimonial.id, testimonial.clone());
        Ok(testimonial)
    }

    pub fn get(&self, id: Uuid) -> Result<&Testimonial, CoreError> {
        self.items.get(&id).ok_or_else(|| not_found(id))
    }

    /// Matching testimonials, newest first.
    pub fn list(&self, filter: &TestimonialFilter) -> Vec<Testimonial> {
        let mut out: Vec<_> = self
            .items
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Move a testimonial to `status`. Setting the status it already has is
    /// a conflict.
    pub fn set_status(&mut self, id: Uuid, status: ContentStatus) -> Result<Testimonial, CoreError> {
        let t = self.items.get_mut(&id).ok_or_else(|| not_found(id))?;
        if t.status == status {
            return Err(CoreError::Conflict(format!(
                "Testimonial {id} is already {}",
                status.as_str()
            )));
        }
        t.status = status;
        t.updated_at = chrono::Utc::now();
        Ok(t.clone())
    }

    /// Count per status, for dashboard tabs.
    pub fn status_counts(&self) -> HashMap<ContentStatus, usize> {
        let mut counts = HashMap::new();
        for t in self.items.values() {
            *counts.entry(t.status).or_insert(0) += 1;
        }
        counts
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound {
        entity: "Testimonial",
        id: id.to_string(),
    }
}
