//! Registry of live collection wizard sessions.
//!
//! Each session owns its [`CollectionStore`] behind a `tokio::sync::Mutex`
//! so a single request mutates it at a time, plus the progress channel the
//! recorder pages watch. A session is dropped once its content has been
//! delivered for analysis, or when the client discards it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cenphi_core::collection::CollectionStore;
use cenphi_core::error::CoreError;
use cenphi_core::types::SessionId;
use tokio::sync::{watch, Mutex, RwLock};

/// One live session.
pub struct SessionEntry {
    pub store: Mutex<CollectionStore>,
    pub progress: watch::Sender<f64>,
    submitting: AtomicBool,
}

impl SessionEntry {
    /// Claim the session's single submission slot.
    ///
    /// Returns `None` while another submission is in flight. The slot is
    /// released when the returned guard drops.
    pub fn begin_submission(&self) -> Option<SubmissionGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard(&self.submitting))
    }
}

/// Held for the duration of one submission.
pub struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with a fresh id.
    pub async fn create(&self) -> Arc<SessionEntry> {
        let mut sessions = self.sessions.write().await;
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }

        let store = CollectionStore::new(id.clone());
        let (progress, _) = watch::channel(store.progress());
        let entry = Arc::new(SessionEntry {
            store: Mutex::new(store),
            progress,
            submitting: AtomicBool::new(false),
        });
        sessions.insert(id, Arc::clone(&entry));
        entry
    }

    pub async fn get(&self, id: &str) -> Result<Arc<SessionEntry>, CoreError> {
        self.sessions
            .read()
            .await
            .get(&SessionId::from(id.to_string()))
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "CollectionSession",
                id: id.to_string(),
            })
    }

    /// Drop a session. Returns `false` if it was already gone.
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
