//! Testimonial record model, enumerations, and validation.
//!
//! Mirrors the review records the dashboard displays and moderates. The
//! wire format for every enum is snake_case so the same strings round-trip
//! between the dashboard, the widget and the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum star rating a customer can give.
pub const MIN_RATING: f32 = 1.0;

/// Maximum star rating a customer can give.
pub const MAX_RATING: f32 = 5.0;

// ---------------------------------------------------------------------------
// Testimonial type
// ---------------------------------------------------------------------------

/// The capture format of a testimonial, also the wizard's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestimonialType {
    Text,
    Image,
    Audio,
    Video,
}

impl TestimonialType {
    /// Parse a type from its wire string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            _ => Err(CoreError::Validation(format!(
                "Invalid testimonial type '{s}'. Must be one of: text, image, audio, video"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Whether this type carries media rather than written content.
    pub fn is_media(&self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Whether a recorder exists for this type (audio and video only).
    pub fn is_recordable(&self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }

    /// Upload size ceiling in bytes for media uploads of this type.
    pub fn max_upload_bytes(&self) -> usize {
        match self {
            Self::Video => 500 * 1024 * 1024,
            _ => 100 * 1024 * 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Content status
// ---------------------------------------------------------------------------

/// Moderation status of a testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    PendingReview,
    Approved,
    Rejected,
    Archived,
    Featured,
}

impl ContentStatus {
    /// Parse a status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending_review" => Ok(Self::PendingReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "archived" => Ok(Self::Archived),
            "featured" => Ok(Self::Featured),
            _ => Err(CoreError::Validation(format!(
                "Invalid content status '{s}'. Must be one of: pending_review, approved, \
                 rejected, archived, featured"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
            Self::Featured => "featured",
        }
    }
}

// ---------------------------------------------------------------------------
// Collection method
// ---------------------------------------------------------------------------

/// How a testimonial reached the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    Api,
    Manual,
    Email,
    #[default]
    WebForm,
    Integration,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored analysis attached to a testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialAnalysis {
    pub analysis_type: String,
    pub analysis_data: Option<serde_json::Value>,
}

/// Customer details captured alongside a testimonial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "customer email is not a valid address"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Usage counters shown on dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub view_count: u32,
    pub share_count: u32,
    pub conversion_count: u32,
}

/// A testimonial as displayed and moderated on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub workspace_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TestimonialType,
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub customer: CustomerInfo,
    pub collection_method: CollectionMethod,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metrics: UsageMetrics,
    #[serde(default)]
    pub analyses: Vec<TestimonialAnalysis>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Testimonial {
    /// Text an analysis should read: the transcript for recorded media,
    /// the written content otherwise.
    pub fn analysis_text(&self) -> &str {
        let text = if self.kind.is_recordable() {
            self.transcript.as_deref()
        } else {
            self.content.as_deref()
        };
        text.unwrap_or_default()
    }

    /// Stored analysis of the given kind, if any.
    pub fn stored_analysis(&self, kind: &str) -> Option<&TestimonialAnalysis> {
        self.analyses.iter().find(|a| a.analysis_type == kind)
    }
}

/// Payload for creating a testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTestimonial {
    pub workspace_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TestimonialType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default)]
    pub collection_method: CollectionMethod,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTestimonial {
    /// Check the structural rules a new testimonial must satisfy.
    ///
    /// Text testimonials need non-blank content; media testimonials need at
    /// least one media URL. Ratings, when present, lie in
    /// `MIN_RATING..=MAX_RATING`, and a customer email must be well formed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.workspace_id.is_nil() {
            return Err(CoreError::Validation("workspace_id is required".to_string()));
        }

        if self.kind.is_media() {
            if self.media_urls.is_empty() {
                return Err(CoreError::Validation(format!(
                    "{} testimonials require at least one media URL",
                    self.kind.as_str()
                )));
            }
        } else if self.content.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(CoreError::Validation(
                "text testimonials require content".to_string(),
            ));
        }

        if let Some(rating) = self.rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(CoreError::Validation(format!(
                    "rating {rating} is out of range ({MIN_RATING}..{MAX_RATING})"
                )));
            }
        }

        self.customer
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        Ok(())
    }
}
