//! Guided testimonial-collection wizard.
//!
//! [`CollectionStore`] owns one in-progress collection session: the wizard
//! state, the media captured so far, and the selection flags the type
//! selection step drives. Every mutation publishes a fresh
//! [`CollectionSnapshot`] on a `tokio::sync::watch` channel so views can
//! re-render; deciding which page comes next stays with the caller.
//!
//! Invariants:
//! - `current_prompt_index` stays within `0..prompts.len()`. Advancing from
//!   the last prompt is a no-op; completion is derived from the index.
//! - The media buffer holds either recorded segments or a text answer,
//!   never both.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::prompts::{GuidedPrompt, GUIDED_PROMPTS, MAX_RECORDING_DURATION};
use crate::testimonial::TestimonialType;
use crate::types::SessionId;

// ---------------------------------------------------------------------------
// Wizard state
// ---------------------------------------------------------------------------

/// How the customer wants to provide a media testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOption {
    Record,
    Upload,
    Mobile,
}

/// Structured feedback returned by the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    pub score: f32,
    pub sentiment: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Current wizard progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionState {
    #[serde(rename = "type")]
    pub kind: Option<TestimonialType>,
    pub current_prompt_index: usize,
    pub is_recording: bool,
    pub is_paused: bool,
    /// Accumulated recording time in seconds.
    pub duration: f64,
    pub feedback: Option<AiFeedback>,
}

/// One captured recording segment or uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaBlob {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Captured content pending submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MediaBuffer {
    #[default]
    Empty,
    Segments(Vec<MediaBlob>),
    Text(String),
}

/// Serializable summary of the media buffer (raw bytes are never echoed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BufferSummary {
    Empty,
    Segments { count: usize, total_bytes: usize },
    Text { length: usize },
}

impl MediaBuffer {
    pub fn summary(&self) -> BufferSummary {
        match self {
            Self::Empty => BufferSummary::Empty,
            Self::Segments(blobs) => BufferSummary::Segments {
                count: blobs.len(),
                total_bytes: blobs.iter().map(|b| b.data.len()).sum(),
            },
            Self::Text(text) => BufferSummary::Text {
                length: text.chars().count(),
            },
        }
    }
}

/// Owned view of a session, published after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub session_id: SessionId,
    pub state: CollectionState,
    pub show_options_modal: bool,
    pub selected_option: Option<InputOption>,
    pub current_prompt: Option<GuidedPrompt>,
    pub total_prompts: usize,
    pub progress: f64,
    pub is_complete: bool,
    pub buffer: BufferSummary,
}

// ---------------------------------------------------------------------------
// Progress and submission seams
// ---------------------------------------------------------------------------

/// Receiver of the wizard's progress fraction (`0.0..=1.0`).
pub trait ProgressSink {
    fn set_progress(&self, fraction: f64);
}

impl ProgressSink for watch::Sender<f64> {
    fn set_progress(&self, fraction: f64) {
        self.send_replace(fraction);
    }
}

/// Result of [`CollectionStore::handle_next`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Advanced { index: usize, progress: f64 },
    AtFinalPrompt,
}

/// Request body for the analysis endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionBody {
    Binary { mime_type: String, data: Vec<u8> },
    Json(serde_json::Value),
}

/// What the analysis endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Submission transport failed: {0}")]
    Transport(String),

    #[error("Submission rejected with status {status}")]
    Status { status: u16, body: String },
}

/// Sends a finished collection to the analysis service.
#[async_trait]
pub trait TestimonialSubmitter: Send + Sync {
    async fn submit(&self, body: SubmissionBody) -> Result<SubmissionResponse, SubmitError>;
}

/// Outcome of [`CollectionStore::handle_complete`]. Errors stop here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitReport {
    Skipped,
    Sent { status: u16, feedback_recorded: bool },
    Failed { error: String },
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Controller for one collection session.
pub struct CollectionStore {
    session_id: SessionId,
    state: CollectionState,
    show_options_modal: bool,
    selected_option: Option<InputOption>,
    data: MediaBuffer,
    prompts: &'static [GuidedPrompt],
    notifier: watch::Sender<CollectionSnapshot>,
}

impl CollectionStore {
    /// Create a session over the standard prompt catalog.
    pub fn new(session_id: SessionId) -> Self {
        Self::with_prompts(session_id, GUIDED_PROMPTS)
    }

    /// Create a session over a custom catalog.
    pub fn with_prompts(session_id: SessionId, prompts: &'static [GuidedPrompt]) -> Self {
        let state = CollectionState::default();
        let initial = CollectionSnapshot {
            session_id: session_id.clone(),
            state: state.clone(),
            show_options_modal: false,
            selected_option: None,
            current_prompt: prompts.first().cloned(),
            total_prompts: prompts.len(),
            progress: initial_progress(prompts.len()),
            is_complete: prompts.len() <= 1,
            buffer: BufferSummary::Empty,
        };
        let (notifier, _) = watch::channel(initial);

        Self {
            session_id,
            state,
            show_options_modal: false,
            selected_option: None,
            data: MediaBuffer::Empty,
            prompts,
            notifier,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn data(&self) -> &MediaBuffer {
        &self.data
    }

    pub fn show_options_modal(&self) -> bool {
        self.show_options_modal
    }

    pub fn selected_option(&self) -> Option<InputOption> {
        self.selected_option
    }

    pub fn total_prompts(&self) -> usize {
        self.prompts.len()
    }

    /// Observe every change to this session.
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.notifier.subscribe()
    }

    /// The prompt for the current step, or `None` for an empty catalog.
    pub fn current_prompt(&self) -> Option<&GuidedPrompt> {
        self.prompts.get(self.state.current_prompt_index)
    }

    /// Whether the wizard sits on its final prompt.
    pub fn is_complete(&self) -> bool {
        self.state.current_prompt_index + 1 >= self.prompts.len()
    }

    /// Fraction of the wizard reached, `(index + 1) / total`.
    pub fn progress(&self) -> f64 {
        if self.prompts.is_empty() {
            return 1.0;
        }
        (self.state.current_prompt_index + 1) as f64 / self.prompts.len() as f64
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            session_id: self.session_id.clone(),
            state: self.state.clone(),
            show_options_modal: self.show_options_modal,
            selected_option: self.selected_option,
            current_prompt: self.current_prompt().cloned(),
            total_prompts: self.prompts.len(),
            progress: self.progress(),
            is_complete: self.is_complete(),
            buffer: self.data.summary(),
        }
    }

    fn notify(&self) {
        self.notifier.send_replace(self.snapshot());
    }

    // -- type selection -----------------------------------------------------

    /// Set the wizard mode. The caller is trusted to pass a supported type.
    pub fn set_type(&mut self, kind: TestimonialType) {
        self.state.kind = Some(kind);
        self.notify();
    }

    /// Select a testimonial type; media types open the input options modal.
    pub fn handle_type_selection(&mut self, kind: TestimonialType) {
        if kind != TestimonialType::Text {
            self.show_options_modal = true;
        }
        self.set_type(kind);
    }

    /// Record how the customer will provide media and close the modal.
    pub fn handle_option_select(&mut self, option: InputOption) {
        self.selected_option = Some(option);
        self.show_options_modal = false;
        self.notify();
    }

    /// Return to type selection.
    pub fn change_type(&mut self) {
        self.state.kind = None;
        self.selected_option = None;
        self.notify();
    }

    // -- prompts ------------------------------------------------------------

    /// Move to the next prompt and report the new progress to `progress`.
    ///
    /// On the final prompt nothing changes; finishing the flow is up to the
    /// caller.
    pub fn handle_next(&mut self, progress: &dyn ProgressSink) -> Advance {
        if self.state.current_prompt_index + 1 < self.prompts.len() {
            self.state.current_prompt_index += 1;
            let fraction = self.progress();
            progress.set_progress(fraction);
            self.notify();
            Advance::Advanced {
                index: self.state.current_prompt_index,
                progress: fraction,
            }
        } else {
            tracing::debug!(session_id = %self.session_id, "Already on the final prompt");
            Advance::AtFinalPrompt
        }
    }

    // -- recording ----------------------------------------------------------

    pub fn start_recording(&mut self) {
        self.state.is_recording = true;
        self.state.is_paused = false;
        self.notify();
    }

    pub fn pause_recording(&mut self) {
        if self.state.is_recording {
            self.state.is_paused = true;
            self.notify();
        }
    }

    pub fn resume_recording(&mut self) {
        if self.state.is_recording {
            self.state.is_paused = false;
            self.notify();
        }
    }

    /// Stop recording and add the segment's elapsed time to the total.
    ///
    /// A single segment counts for at most [`MAX_RECORDING_DURATION`]
    /// seconds.
    pub fn stop_recording(&mut self, elapsed_secs: f64) {
        if !self.state.is_recording {
            return;
        }
        self.state.is_recording = false;
        self.state.is_paused = false;
        if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
            self.state.duration += elapsed_secs.min(f64::from(MAX_RECORDING_DURATION));
        }
        self.notify();
    }

    // -- captured content ---------------------------------------------------

    /// Append a finished recording segment. Ignored when the buffer holds text.
    pub fn handle_complete_recording_section(&mut self, blob: MediaBlob) {
        match &mut self.data {
            MediaBuffer::Text(_) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    "Ignoring media segment for a text collection"
                );
                return;
            }
            MediaBuffer::Segments(blobs) => blobs.push(blob),
            MediaBuffer::Empty => self.data = MediaBuffer::Segments(vec![blob]),
        }
        self.notify();
    }

    /// Store the written answer. Ignored when the buffer holds segments.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if matches!(self.data, MediaBuffer::Segments(_)) {
            tracing::warn!(
                session_id = %self.session_id,
                "Ignoring text for a media collection"
            );
            return;
        }
        self.data = MediaBuffer::Text(text.into());
        self.notify();
    }

    /// Build the analysis request for the captured content.
    ///
    /// Segments are concatenated in capture order under the first segment's
    /// MIME type; text is wrapped as `{"text": ...}`.
    pub fn submission_body(&self) -> Option<SubmissionBody> {
        match &self.data {
            MediaBuffer::Empty => None,
            MediaBuffer::Segments(blobs) => {
                let mime_type = blobs
                    .first()
                    .map(|b| b.mime_type.clone())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = blobs.iter().flat_map(|b| b.data.iter().copied()).collect();
                Some(SubmissionBody::Binary { mime_type, data })
            }
            MediaBuffer::Text(text) => {
                Some(SubmissionBody::Json(serde_json::json!({ "text": text })))
            }
        }
    }

    /// Submit the captured content once.
    ///
    /// Failures are logged and reported, never retried. When the response
    /// body parses as [`AiFeedback`] it becomes the session's feedback.
    pub async fn handle_complete(&mut self, submitter: &dyn TestimonialSubmitter) -> SubmitReport {
        let Some(body) = self.submission_body() else {
            return SubmitReport::Skipped;
        };
        let result = submitter.submit(body).await;
        self.record_submission(result)
    }

    /// Apply the analysis endpoint's answer to a body built by
    /// [`submission_body`](Self::submission_body).
    ///
    /// Lets callers that share the store release it while the request is in
    /// flight.
    pub fn record_submission(
        &mut self,
        result: Result<SubmissionResponse, SubmitError>,
    ) -> SubmitReport {
        match result {
            Ok(response) => {
                tracing::info!(
                    session_id = %self.session_id,
                    status = response.status,
                    body = %response.body,
                    "Testimonial submitted for analysis"
                );
                let feedback = serde_json::from_str::<AiFeedback>(&response.body).ok();
                let feedback_recorded = feedback.is_some();
                if feedback.is_some() {
                    self.state.feedback = feedback;
                    self.notify();
                }
                SubmitReport::Sent {
                    status: response.status,
                    feedback_recorded,
                }
            }
            Err(e) => {
                tracing::error!(
                    session_id = %self.session_id,
                    error = %e,
                    "Error analyzing testimonial"
                );
                SubmitReport::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

fn initial_progress(total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        1.0 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
