//! In-memory upload session tracking, one slot per project path.
//!
//! The store is an owned, injectable object: construct one, share it
//! behind `Arc`, and hand it to whatever drives uploads. There is no
//! module-level singleton.

use std::collections::HashMap;
use std::sync::RwLock;

use fieldsync_diff::{DiffResult, IgnorePolicy, diff_file_sets};
use fieldsync_protocol::{FileSet, PushProgress, SessionStatus};

use crate::error::PushError;

/// Read-only copy of one session's state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The staged (proposed) file set.
    pub files: FileSet,
    pub diff: DiffResult,
    /// Chunks acknowledged so far.
    pub loaded: u32,
    /// Chunks planned for the session.
    pub total: u32,
    pub status: SessionStatus,
}

struct Session {
    files: FileSet,
    diff: DiffResult,
    loaded: u32,
    total: u32,
    status: SessionStatus,
}

impl Session {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            files: self.files.clone(),
            diff: self.diff.clone(),
            loaded: self.loaded,
            total: self.total,
            status: self.status,
        }
    }

    fn progress(&self, project_path: &str, error: &str) -> PushProgress {
        PushProgress {
            project_path: project_path.to_string(),
            status: self.status,
            loaded: self.loaded,
            total: self.total,
            error: error.to_string(),
        }
    }
}

/// Tracks upload sessions keyed by project path (thread-safe).
///
/// At most one session exists per path. A path with no entry is idle;
/// terminal sessions are discarded rather than retained.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a proposed file set against the last known server state,
    /// recomputing the diff.
    ///
    /// Idle and Staged paths both land in Staged; re-staging simply
    /// replaces the queued set. Staging over a Running upload is
    /// rejected.
    pub fn stage(
        &self,
        project_path: &str,
        known: &FileSet,
        proposed: FileSet,
        policy: &IgnorePolicy,
    ) -> Result<DiffResult, PushError> {
        let mut sessions = self.inner.write().unwrap();
        if let Some(existing) = sessions.get(project_path)
            && existing.status.is_running()
        {
            return Err(PushError::SessionActive(project_path.to_string()));
        }

        let diff = diff_file_sets(known, &proposed, policy);
        sessions.insert(
            project_path.to_string(),
            Session {
                files: proposed,
                diff: diff.clone(),
                loaded: 0,
                total: 0,
                status: SessionStatus::Staged,
            },
        );
        Ok(diff)
    }

    /// Moves a Staged session to Running with `total` planned chunks
    /// and a fresh `loaded` count.
    pub fn start(&self, project_path: &str, total: u32) -> Result<(), PushError> {
        let mut sessions = self.inner.write().unwrap();
        let session = sessions
            .get_mut(project_path)
            .ok_or_else(|| PushError::SessionNotFound(project_path.to_string()))?;

        match session.status {
            SessionStatus::Staged => {
                session.status = SessionStatus::Running;
                session.loaded = 0;
                session.total = total;
                Ok(())
            }
            SessionStatus::Running => Err(PushError::SessionActive(project_path.to_string())),
            _ => Err(PushError::NotStaged(project_path.to_string())),
        }
    }

    /// Records one acknowledged chunk. When the last planned chunk is
    /// acknowledged the session auto-transitions to Finished.
    pub fn ack_chunk(&self, project_path: &str) -> Result<PushProgress, PushError> {
        let mut sessions = self.inner.write().unwrap();
        let session = sessions
            .get_mut(project_path)
            .ok_or_else(|| PushError::SessionNotFound(project_path.to_string()))?;

        if !session.status.is_running() {
            return Err(PushError::NotStaged(project_path.to_string()));
        }

        session.loaded += 1;
        if session.loaded >= session.total {
            session.status = SessionStatus::Finished;
        }
        Ok(session.progress(project_path, ""))
    }

    /// Cancels a session, discarding its record entirely.
    pub fn cancel(&self, project_path: &str) -> Result<(), PushError> {
        let mut sessions = self.inner.write().unwrap();
        sessions
            .remove(project_path)
            .map(|_| ())
            .ok_or_else(|| PushError::SessionNotFound(project_path.to_string()))
    }

    /// Marks a session Failed and discards it, returning a final
    /// progress snapshot (with the acknowledged-chunk count preserved)
    /// for diagnostics.
    pub fn fail(&self, project_path: &str, error: &str) -> Option<PushProgress> {
        let mut sessions = self.inner.write().unwrap();
        let mut session = sessions.remove(project_path)?;
        session.status = SessionStatus::Failed;
        Some(session.progress(project_path, error))
    }

    /// Removes a session, returning its final state.
    pub fn remove(&self, project_path: &str) -> Option<SessionSnapshot> {
        let mut sessions = self.inner.write().unwrap();
        sessions.remove(project_path).map(|s| s.snapshot())
    }

    /// Returns a snapshot of the session for `project_path`, if any.
    pub fn get(&self, project_path: &str) -> Option<SessionSnapshot> {
        let sessions = self.inner.read().unwrap();
        sessions.get(project_path).map(|s| s.snapshot())
    }

    /// Returns current progress for `project_path`, if a session exists.
    pub fn progress(&self, project_path: &str) -> Option<PushProgress> {
        let sessions = self.inner.read().unwrap();
        sessions.get(project_path).map(|s| s.progress(project_path, ""))
    }

    /// Returns `true` while chunks are being transmitted for
    /// `project_path`.
    pub fn is_running(&self, project_path: &str) -> bool {
        let sessions = self.inner.read().unwrap();
        sessions
            .get(project_path)
            .is_some_and(|s| s.status.is_running())
    }
}
