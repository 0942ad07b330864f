//! Project push flow: scan, stage, diff, chunked upload.
//!
//! This crate implements the **client-side business logic** for pushing
//! local project changes to the server. It is a library crate with no
//! UI or transport dependencies — the app provides a [`RemoteStore`]
//! implementation that bridges to its actual HTTP client.
//!
//! # Pipeline
//!
//! 1. **Scan** — walk the project directory into a [`FileSet`]
//! 2. **Stage** — diff against the last known server state
//! 3. **Init** — open an upload session on the server
//! 4. **Upload** — send planned chunks, one at a time, with progress
//! 5. **Finish** — finalize and adopt the server's resulting state
//!
//! [`FileSet`]: fieldsync_protocol::FileSet

pub mod error;
pub mod push;
pub mod remote;
pub mod scanner;
pub mod store;
pub mod types;

// Re-export primary types for convenience.
pub use error::PushError;
pub use push::Pusher;
pub use remote::{RemoteFuture, RemoteStore};
pub use scanner::scan_project;
pub use store::{SessionSnapshot, SessionStore};
pub use types::PushEvent;
