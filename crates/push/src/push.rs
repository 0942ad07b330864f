//! Push orchestrator: drives one staged session end to end.
//!
//! The flow mirrors what a user sees in the client: stage changes,
//! start the upload, watch chunk progress, end in finished, cancelled
//! or failed. Chunks are transmitted one at a time per session; the
//! cancellation token is checked between requests, never mid-request.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fieldsync_protocol::{
    CancelSessionRequest, ChunkUploadRequest, FileSet, FinishSessionRequest, InitSessionRequest,
    SessionStatus,
};
use fieldsync_transfer::{CHUNK_SIZE, FileChunker, plan_chunks_with};

use crate::error::PushError;
use crate::remote::RemoteStore;
use crate::store::SessionStore;
use crate::types::PushEvent;

/// Drives staged sessions from a shared [`SessionStore`] against a
/// [`RemoteStore`], emitting [`PushEvent`]s along the way.
pub struct Pusher {
    store: Arc<SessionStore>,
    chunk_size: usize,
    events_tx: mpsc::Sender<PushEvent>,
    events_rx: Option<mpsc::Receiver<PushEvent>>,
    cancel: CancellationToken,
}

impl Pusher {
    /// Creates a pusher over the given session store.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self::with_chunk_size(store, CHUNK_SIZE)
    }

    /// Like [`new`](Self::new) with an explicit chunk size. Production
    /// callers keep the default; tests shrink it to exercise
    /// multi-chunk files without large fixtures.
    pub fn with_chunk_size(store: Arc<SessionStore>, chunk_size: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            store,
            chunk_size,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<PushEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this pusher's uploads.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Pushes the staged session for `project_path`, reading file bytes
    /// from `local_root`.
    ///
    /// Returns the server's resulting file state. A second push while
    /// one is Running is rejected with [`PushError::SessionActive`] and
    /// leaves the running session untouched.
    pub async fn push(
        &self,
        project_path: &str,
        local_root: &Path,
        remote: &dyn RemoteStore,
    ) -> Result<FileSet, PushError> {
        let mut session_id = None;
        match self
            .run_push(project_path, local_root, remote, &mut session_id)
            .await
        {
            Ok(files) => {
                info!(project = %project_path, files = files.len(), "push completed");
                let _ = self
                    .events_tx
                    .send(PushEvent::Finished {
                        project_path: project_path.to_string(),
                        files: files.clone(),
                    })
                    .await;
                Ok(files)
            }
            // Precondition failures: nothing was started, nothing to
            // tear down, no event to emit.
            Err(
                e @ (PushError::SessionNotFound(_)
                | PushError::SessionActive(_)
                | PushError::NotStaged(_)),
            ) => Err(e),
            Err(PushError::Cancelled) => {
                let _ = self.store.cancel(project_path);
                if let Some(id) = session_id {
                    let req = CancelSessionRequest { session_id: id };
                    let _ = remote.cancel_session(&req).await;
                }
                debug!(project = %project_path, "push cancelled");
                let _ = self
                    .events_tx
                    .send(PushEvent::Cancelled {
                        project_path: project_path.to_string(),
                    })
                    .await;
                Err(PushError::Cancelled)
            }
            Err(e) => {
                let detail = e.user_detail();
                if let Some(p) = self.store.fail(project_path, &detail) {
                    warn!(
                        project = %project_path,
                        loaded = p.loaded,
                        total = p.total,
                        error = %detail,
                        "push failed"
                    );
                } else {
                    warn!(project = %project_path, error = %detail, "push failed");
                }
                let _ = self
                    .events_tx
                    .send(PushEvent::Failed {
                        project_path: project_path.to_string(),
                        error: detail,
                    })
                    .await;
                Err(e)
            }
        }
    }

    async fn run_push(
        &self,
        project_path: &str,
        local_root: &Path,
        remote: &dyn RemoteStore,
        session_id_out: &mut Option<String>,
    ) -> Result<FileSet, PushError> {
        let snapshot = self
            .store
            .get(project_path)
            .ok_or_else(|| PushError::SessionNotFound(project_path.to_string()))?;
        match snapshot.status {
            SessionStatus::Staged => {}
            SessionStatus::Running => {
                return Err(PushError::SessionActive(project_path.to_string()));
            }
            _ => return Err(PushError::NotStaged(project_path.to_string())),
        }

        if snapshot.diff.is_empty() {
            // Nothing to transmit; the staged state already matches.
            self.store.remove(project_path);
            debug!(project = %project_path, "no-op push");
            return Ok(snapshot.files);
        }

        self.check_cancelled()?;

        // Plan chunks for every file that must be transmitted.
        let added: Vec<_> = snapshot
            .diff
            .added
            .iter()
            .filter_map(|p| snapshot.files.get(p).cloned())
            .collect();
        let updated: Vec<_> = snapshot
            .diff
            .updated
            .iter()
            .filter_map(|p| snapshot.files.get(p).cloned())
            .collect();
        let removed: Vec<String> = snapshot.diff.removed.iter().cloned().collect();

        let mut uploads = Vec::new();
        let mut total_chunks: u32 = 0;
        for info in added.iter().chain(updated.iter()) {
            let plan = plan_chunks_with(info.size, self.chunk_size);
            total_chunks += plan.len() as u32;
            uploads.push((info.clone(), plan));
        }

        let init_req = InitSessionRequest {
            project_path: project_path.to_string(),
            total_size: uploads.iter().map(|(i, _)| i.size).sum(),
            added,
            updated,
            removed,
        };
        let init_resp = remote.init_session(&init_req).await?;
        let session_id = init_resp.session_id;
        *session_id_out = Some(session_id.clone());

        self.store.start(project_path, total_chunks)?;
        debug!(
            project = %project_path,
            session = %session_id,
            chunks = total_chunks,
            "upload session started"
        );

        for (info, plan) in uploads {
            // Zero-length files carry no chunks; the server
            // materializes them from the init metadata.
            if plan.is_empty() {
                continue;
            }
            self.check_cancelled()?;

            let abs_path = local_root.join(&info.path);
            let chunk_size = self.chunk_size;
            let mut chunker =
                tokio::task::spawn_blocking(move || FileChunker::open(&abs_path, chunk_size))
                    .await
                    .map_err(join_error)??;

            if chunker.file_size() != info.size {
                return Err(PushError::Io(std::io::Error::other(format!(
                    "file changed since staging: {}",
                    info.path
                ))));
            }

            for slot in plan {
                self.check_cancelled()?;

                let (returned, chunk_result) = tokio::task::spawn_blocking(move || {
                    let mut c = chunker;
                    let r = c.next_chunk();
                    (c, r)
                })
                .await
                .map_err(join_error)?;
                chunker = returned;

                let Some(chunk) = chunk_result? else {
                    return Err(PushError::Io(std::io::Error::other(format!(
                        "file truncated during upload: {}",
                        info.path
                    ))));
                };

                let header = ChunkUploadRequest {
                    session_id: session_id.clone(),
                    chunk_id: slot.id,
                    file_path: info.path.clone(),
                    offset: chunk.offset,
                    checksum: chunk.checksum.clone(),
                };
                remote.upload_chunk(&header, &chunk.data).await?;

                let progress = self.store.ack_chunk(project_path)?;
                debug!(
                    project = %project_path,
                    file = %info.path,
                    offset = chunk.offset,
                    loaded = progress.loaded,
                    total = progress.total,
                    "chunk acknowledged"
                );
                let _ = self
                    .events_tx
                    .send(PushEvent::Progress {
                        project_path: project_path.to_string(),
                        loaded: progress.loaded,
                        total: progress.total,
                    })
                    .await;
            }
        }

        self.check_cancelled()?;
        let finish_req = FinishSessionRequest { session_id };
        let finish_resp = remote.finish_session(&finish_req).await?;
        self.store.remove(project_path);
        Ok(finish_resp.files)
    }

    fn check_cancelled(&self) -> Result<(), PushError> {
        if self.cancel.is_cancelled() {
            Err(PushError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> PushError {
    PushError::Io(std::io::Error::other(format!("blocking task failed: {e}")))
}
