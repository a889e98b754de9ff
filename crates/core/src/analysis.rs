//! Testimonial analysis placeholder.
//!
//! [`AnalysisService`] is the seam to a real analysis backend. The only
//! implementation here, [`CannedAnalysis`], waits a fixed delay and then
//! answers with stored analyses when the testimonial has them and fixed
//! canned values otherwise. Failures become a sentinel `{"error": ...}`
//! value rather than an `Err`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::collection::AiFeedback;
use crate::testimonial::Testimonial;

/// Default simulated latency.
pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(1500);

/// Kind of analysis requested for a testimonial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisKind {
    Sentiment,
    KeyInsights,
    Transcript,
    Engagement,
    Other(String),
}

impl AnalysisKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "sentiment" => Self::Sentiment,
            "key_insights" => Self::KeyInsights,
            "transcript" => Self::Transcript,
            "engagement" => Self::Engagement,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Sentiment => "sentiment",
            Self::KeyInsights => "key_insights",
            Self::Transcript => "transcript",
            Self::Engagement => "engagement",
            Self::Other(s) => s,
        }
    }
}

/// Produces analysis results for testimonials.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyze a stored testimonial. Never fails; errors are folded into the
    /// returned value.
    async fn analyze(&self, kind: &AnalysisKind, testimonial: &Testimonial) -> Value;

    /// Quick feedback on freshly collected content.
    async fn feedback(&self, text: Option<&str>, media_bytes: usize) -> AiFeedback;
}

/// Canned-result analysis with simulated latency.
#[derive(Debug, Clone)]
pub struct CannedAnalysis {
    delay: Duration,
}

impl CannedAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for CannedAnalysis {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

/// The sentinel returned when an analysis cannot be produced.
pub fn failed_analysis(details: impl Into<String>) -> Value {
    json!({ "error": "Analysis failed", "details": details.into() })
}

fn canned_result(kind: &AnalysisKind, testimonial: &Testimonial) -> Value {
    match kind {
        AnalysisKind::Sentiment => json!({
            "score": 0.75,
            "label": "positive",
            "breakdown": { "positive": 0.82, "negative": 0.07, "neutral": 0.11 },
        }),
        AnalysisKind::KeyInsights => json!([
            "Customer emphasizes exceptional quality",
            "Service speed was highlighted multiple times",
            "Price-to-value ratio mentioned positively",
            "Likely to generate referrals based on enthusiasm",
        ]),
        AnalysisKind::Transcript => {
            let transcript = testimonial.analysis_text();
            json!({
                "transcript": transcript,
                "confidence": 0.94,
                "speakerSegments": [{
                    "speaker": "Customer",
                    "start": 0,
                    "end": transcript.chars().count(),
                    "text": transcript,
                }],
            })
        }
        AnalysisKind::Engagement => json!({
            "overallScore": 87,
            "metrics": {
                "viewCompletion": 0.89,
                "shareRate": 0.12,
                "conversionImpact": 0.34,
                "audienceRetention": 0.76,
            },
            "trends": { "weekly": "+12%", "monthly": "+8%" },
        }),
        AnalysisKind::Other(_) => json!({
            "message": "Analysis complete",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
    }
}

#[async_trait]
impl AnalysisService for CannedAnalysis {
    async fn analyze(&self, kind: &AnalysisKind, testimonial: &Testimonial) -> Value {
        tokio::time::sleep(self.delay).await;

        if let Some(existing) = testimonial.stored_analysis(kind.as_str()) {
            return match &existing.analysis_data {
                Some(data) => data.clone(),
                None => serde_json::to_value(existing)
                    .unwrap_or_else(|e| failed_analysis(e.to_string())),
            };
        }

        canned_result(kind, testimonial)
    }

    async fn feedback(&self, text: Option<&str>, media_bytes: usize) -> AiFeedback {
        tokio::time::sleep(self.delay).await;

        let mut suggestions = Vec::new();
        match text {
            Some(t) if t.split_whitespace().count() < 20 => {
                suggestions.push("Add a specific example of how the product helped".to_string());
            }
            None if media_bytes == 0 => {
                suggestions.push("No content was captured".to_string());
            }
            _ => {}
        }

        AiFeedback {
            score: 0.75,
            sentiment: "positive".to_string(),
            suggestions,
            highlights: vec!["Customer emphasizes exceptional quality".to_string()],
        }
    }
}
