//! In-process session store.
//!
//! Lifecycle: a session is created by a successful generate, edited item by
//! item, removed by a successful finalize, or discarded explicitly. Sessions
//! older than the store's max age are treated as gone and are purged on the
//! next insert. Nothing is persisted; restarting the process drops every
//! session.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::report::models::{ReportState, TaskSection};

/// Default max age of an unfinished session.
pub const DEFAULT_SESSION_TTL_MINUTES: u32 = 120;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, ReportState>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::minutes(i64::from(DEFAULT_SESSION_TTL_MINUTES)))
    }
}

impl SessionStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, state: &ReportState, now: DateTime<Utc>) -> bool {
        now - state.created_at > self.ttl
    }

    /// Stores a freshly generated state under its own session id, dropping
    /// any sessions that have outlived the max age.
    pub async fn insert(&self, state: ReportState) -> Uuid {
        let id = state.session_id;
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, existing| !self.is_expired(existing, now));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {purged} expired session(s)");
        }

        sessions.insert(id, state);
        debug!("Session {id} created");
        id
    }

    /// Returns a snapshot of the session.
    pub async fn get(&self, id: Uuid) -> Result<ReportState, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .filter(|state| !self.is_expired(state, Utc::now()))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Replaces one item (1-based) in one list and returns the updated snapshot.
    pub async fn edit_task(
        &self,
        id: Uuid,
        section: TaskSection,
        position: usize,
        text: &str,
    ) -> Result<ReportState, AppError> {
        let mut sessions = self.inner.write().await;
        let state = sessions
            .get_mut(&id)
            .filter(|state| !self.is_expired(state, Utc::now()))
            .ok_or_else(|| not_found(id))?;

        let list = state.tasks_mut(section);
        let len = list.len();
        if !list.replace(position, text) {
            return Err(AppError::Validation(format!(
                "{} item {position} does not exist (list has {len} item(s))",
                section.label()
            )));
        }

        Ok(state.clone())
    }

    /// Removes the session, returning its final state.
    pub async fn remove(&self, id: Uuid) -> Result<ReportState, AppError> {
        let removed = self.inner.write().await.remove(&id);
        debug!("Session {id} removed");
        removed
            .filter(|state| !self.is_expired(state, Utc::now()))
            .ok_or_else(|| not_found(id))
    }

    /// Removes the session only if it still equals `snapshot`. A session
    /// edited since the snapshot was taken is kept and reported as a conflict.
    pub async fn remove_if_unchanged(&self, snapshot: &ReportState) -> Result<ReportState, AppError> {
        let id = snapshot.session_id;
        let mut sessions = self.inner.write().await;

        let current = sessions.get(&id).ok_or_else(|| not_found(id))?;
        if current != snapshot {
            return Err(AppError::Conflict(format!(
                "Report session {id} was edited while its PDF was being created; finalize again"
            )));
        }

        let removed = sessions.remove(&id).ok_or_else(|| not_found(id))?;
        debug!("Session {id} removed");
        Ok(removed)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Report session {id} not found"))
}
