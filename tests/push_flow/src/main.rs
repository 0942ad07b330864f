fn main() {
    println!("Run `cargo test -p push-flow` to execute end-to-end push flow tests.");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;

    use fieldsync_diff::IgnorePolicy;
    use fieldsync_protocol::{
        CancelSessionRequest, ChunkAck, ChunkUploadRequest, FileSet, FinishSessionRequest,
        FinishSessionResponse, InitSessionRequest, InitSessionResponse, SessionStatus,
    };
    use fieldsync_push::{
        PushError, Pusher, RemoteFuture, RemoteStore, SessionStore, scan_project,
    };
    use fieldsync_transfer::checksum_bytes;
    use tokio_util::sync::CancellationToken;

    /// In-memory server: reassembles chunk bytes per file and verifies
    /// them against the metadata announced at init.
    struct InMemoryServer {
        store: Arc<SessionStore>,
        init: Mutex<Option<InitSessionRequest>>,
        bodies: Mutex<HashMap<String, Vec<u8>>>,
        statuses_seen: Mutex<Vec<SessionStatus>>,
        cancels: Mutex<usize>,
        finishes: Mutex<usize>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl InMemoryServer {
        fn new(store: Arc<SessionStore>) -> Self {
            Self {
                store,
                init: Mutex::new(None),
                bodies: Mutex::new(HashMap::new()),
                statuses_seen: Mutex::new(Vec::new()),
                cancels: Mutex::new(0),
                finishes: Mutex::new(0),
                cancel_after: None,
            }
        }

        fn body(&self, path: &str) -> Option<Vec<u8>> {
            self.bodies.lock().unwrap().get(path).cloned()
        }

        fn chunk_total(&self) -> usize {
            self.statuses_seen.lock().unwrap().len()
        }
    }

    impl RemoteStore for InMemoryServer {
        fn init_session<'a>(
            &'a self,
            req: &'a InitSessionRequest,
        ) -> RemoteFuture<'a, InitSessionResponse> {
            Box::pin(async move {
                *self.init.lock().unwrap() = Some(req.clone());
                Ok(InitSessionResponse {
                    session_id: "e2e-session".into(),
                })
            })
        }

        fn upload_chunk<'a>(
            &'a self,
            header: &'a ChunkUploadRequest,
            data: &'a [u8],
        ) -> RemoteFuture<'a, ChunkAck> {
            Box::pin(async move {
                // Transport-level integrity check, as the real server
                // performs it.
                assert_eq!(checksum_bytes(data), header.checksum);

                let mut bodies = self.bodies.lock().unwrap();
                let body = bodies.entry(header.file_path.clone()).or_default();
                let end = header.offset as usize + data.len();
                if body.len() < end {
                    body.resize(end, 0);
                }
                body[header.offset as usize..end].copy_from_slice(data);
                drop(bodies);

                // All tests push the "survey" project; record its
                // session status as observed from the server side.
                if let Some(snapshot) = self.store.get("survey") {
                    self.statuses_seen.lock().unwrap().push(snapshot.status);
                }

                let sent = self.statuses_seen.lock().unwrap().len();
                if let Some((after, token)) = &self.cancel_after
                    && sent >= *after
                {
                    token.cancel();
                }

                Ok(ChunkAck {
                    session_id: header.session_id.clone(),
                    chunk_id: header.chunk_id.clone(),
                    bytes_written: data.len() as i64,
                })
            })
        }

        fn finish_session<'a>(
            &'a self,
            _req: &'a FinishSessionRequest,
        ) -> RemoteFuture<'a, FinishSessionResponse> {
            Box::pin(async move {
                *self.finishes.lock().unwrap() += 1;

                let init = self.init.lock().unwrap();
                let init = init.as_ref().ok_or_else(|| {
                    PushError::Remote(r#"{"detail":"finish before init"}"#.into())
                })?;

                let bodies = self.bodies.lock().unwrap();
                let mut files = FileSet::new();
                for info in init.added.iter().chain(init.updated.iter()) {
                    // Every non-empty announced file must have arrived
                    // intact.
                    if info.size > 0 {
                        let body = bodies.get(&info.path).ok_or_else(|| {
                            PushError::Remote(r#"{"detail":"missing file body"}"#.into())
                        })?;
                        if checksum_bytes(body) != info.checksum {
                            return Err(PushError::Remote(
                                r#"{"detail":"checksum mismatch"}"#.into(),
                            ));
                        }
                    }
                    files.insert(info.path.clone(), info.clone());
                }
                Ok(FinishSessionResponse { files })
            })
        }

        fn cancel_session<'a>(&'a self, _req: &'a CancelSessionRequest) -> RemoteFuture<'a, ()> {
            Box::pin(async move {
                *self.cancels.lock().unwrap() += 1;
                Ok(())
            })
        }
    }

    fn stage(store: &SessionStore, root: &Path, known: &FileSet) -> FileSet {
        let proposed = scan_project(root).unwrap();
        store
            .stage("survey", known, proposed.clone(), &IgnorePolicy::default())
            .unwrap();
        proposed
    }

    #[tokio::test]
    async fn push_reassembles_files_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let big: Vec<u8> = (0..23u8).collect();
        std::fs::write(dir.path().join("survey.gpkg"), &big).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"plot 7 flooded").unwrap();

        let store = Arc::new(SessionStore::new());
        let proposed = stage(&store, dir.path(), &FileSet::new());

        let server = InMemoryServer::new(Arc::clone(&store));
        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        let files = pusher.push("survey", dir.path(), &server).await.unwrap();

        assert_eq!(server.body("survey.gpkg").as_deref(), Some(&big[..]));
        assert_eq!(
            server.body("notes.txt").as_deref(),
            Some(b"plot 7 flooded".as_slice())
        );
        assert_eq!(files.len(), proposed.len());
        assert_eq!(files["survey.gpkg"].checksum, proposed["survey.gpkg"].checksum);
        assert_eq!(*server.finishes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn session_runs_during_chunks_and_is_gone_after() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.bin"), vec![7u8; 40]).unwrap();

        let store = Arc::new(SessionStore::new());
        stage(&store, dir.path(), &FileSet::new());

        let server = InMemoryServer::new(Arc::clone(&store));
        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        pusher.push("survey", dir.path(), &server).await.unwrap();

        let statuses = server.statuses_seen.lock().unwrap();
        assert_eq!(statuses.len(), 5);
        // Acks land after each request returns, so the session is
        // Running for the entire transmission.
        assert!(statuses.iter().all(|s| *s == SessionStatus::Running));
        drop(statuses);

        assert!(store.get("survey").is_none());
        assert!(!store.is_running("survey"));
    }

    #[tokio::test]
    async fn sidecar_files_never_reach_the_server() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.gpkg"), b"BASE").unwrap();
        std::fs::write(dir.path().join("data.gpkg-wal"), b"WAL").unwrap();

        let store = Arc::new(SessionStore::new());
        stage(&store, dir.path(), &FileSet::new());

        let server = InMemoryServer::new(Arc::clone(&store));
        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        pusher.push("survey", dir.path(), &server).await.unwrap();

        let init = server.init.lock().unwrap().clone().unwrap();
        let added: Vec<_> = init.added.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(added, ["data.gpkg"]);
        assert!(server.body("data.gpkg-wal").is_none());
    }

    #[tokio::test]
    async fn deleted_sidecar_is_not_reported_removed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("keep.txt"), b"KEEP").unwrap();

        // Known server state: keep.txt plus two files that vanished
        // locally, one of them a sidecar.
        let scanned = scan_project(dir.path()).unwrap();
        let mut known = scanned.clone();
        let mut gone = scanned["keep.txt"].clone();
        gone.path = "data.gpkg".into();
        known.insert("data.gpkg".into(), gone.clone());
        let mut sidecar = gone.clone();
        sidecar.path = "data.gpkg-wal".into();
        known.insert("data.gpkg-wal".into(), sidecar);

        let store = Arc::new(SessionStore::new());
        stage(&store, dir.path(), &known);

        let server = InMemoryServer::new(Arc::clone(&store));
        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        pusher.push("survey", dir.path(), &server).await.unwrap();

        let init = server.init.lock().unwrap().clone().unwrap();
        assert_eq!(init.removed, vec!["data.gpkg".to_string()]);
    }

    #[tokio::test]
    async fn cancel_mid_push_discards_session_and_abandons_server_side() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.bin"), vec![3u8; 64]).unwrap();

        let store = Arc::new(SessionStore::new());
        stage(&store, dir.path(), &FileSet::new());

        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        let mut server = InMemoryServer::new(Arc::clone(&store));
        server.cancel_after = Some((1, pusher.cancel_token()));

        let result = pusher.push("survey", dir.path(), &server).await;
        assert!(matches!(result, Err(PushError::Cancelled)));

        // Subsequent lookup of that project path returns no session.
        assert!(store.get("survey").is_none());
        assert!(store.progress("survey").is_none());
        assert_eq!(*server.cancels.lock().unwrap(), 1);
        assert_eq!(*server.finishes.lock().unwrap(), 0);
        // Far fewer than the 8 planned chunks went out.
        assert!(server.chunk_total() < 8);
    }

    #[tokio::test]
    async fn restage_and_push_after_cancel_succeeds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.bin"), vec![9u8; 24]).unwrap();

        let store = Arc::new(SessionStore::new());
        stage(&store, dir.path(), &FileSet::new());

        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        let mut server = InMemoryServer::new(Arc::clone(&store));
        server.cancel_after = Some((1, pusher.cancel_token()));
        let _ = pusher.push("survey", dir.path(), &server).await;
        assert!(store.get("survey").is_none());

        // A fresh pusher (fresh token) over the same store completes.
        stage(&store, dir.path(), &FileSet::new());
        let pusher = Pusher::with_chunk_size(Arc::clone(&store), 8);
        let server = InMemoryServer::new(Arc::clone(&store));
        let files = pusher.push("survey", dir.path(), &server).await.unwrap();
        assert!(files.contains_key("data.bin"));
    }
}
