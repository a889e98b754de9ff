//! HTTP submission of finished collections.
//!
//! [`HttpSubmitter`] posts the captured content of a collection session to
//! the analysis endpoint: recorded media as a raw body under its MIME type,
//! written answers as JSON. Each submission is attempted once.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use cenphi_core::collection::{
    SubmissionBody, SubmissionResponse, SubmitError, TestimonialSubmitter,
};

/// Submits collections to a fixed analysis URL.
pub struct HttpSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmitter {
    /// Create a submitter with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmitError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TestimonialSubmitter for HttpSubmitter {
    async fn submit(&self, body: SubmissionBody) -> Result<SubmissionResponse, SubmitError> {
        let request = match body {
            SubmissionBody::Binary { mime_type, data } => self
                .client
                .post(&self.url)
                .header(CONTENT_TYPE, mime_type)
                .body(data),
            SubmissionBody::Json(value) => self.client.post(&self.url).json(&value),
        };

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(SubmitError::Status { status, body });
        }

        Ok(SubmissionResponse { status, body })
    }
}
