//! Abstract boundary to the project server.
//!
//! The app implements [`RemoteStore`] on top of its actual HTTP client;
//! push logic stays decoupled from transport and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use fieldsync_protocol::{
    CancelSessionRequest, ChunkAck, ChunkUploadRequest, FinishSessionRequest,
    FinishSessionResponse, InitSessionRequest, InitSessionResponse,
};

use crate::error::PushError;

/// A boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PushError>> + Send + 'a>>;

/// Opaque remote calls the upload flow depends on. Latency and failure
/// are the caller's problem to tolerate; implementations should not
/// retry beyond whatever their transport already does.
pub trait RemoteStore: Send + Sync {
    /// Opens an upload session for one project's staged changes.
    fn init_session<'a>(&'a self, req: &'a InitSessionRequest)
    -> RemoteFuture<'a, InitSessionResponse>;

    /// Transmits one chunk; resolves once the server acknowledges it.
    fn upload_chunk<'a>(
        &'a self,
        header: &'a ChunkUploadRequest,
        data: &'a [u8],
    ) -> RemoteFuture<'a, ChunkAck>;

    /// Finalizes the session, returning the server's resulting file
    /// state.
    fn finish_session<'a>(
        &'a self,
        req: &'a FinishSessionRequest,
    ) -> RemoteFuture<'a, FinishSessionResponse>;

    /// Abandons the session server-side. Best effort; callers may
    /// ignore the result.
    fn cancel_session<'a>(&'a self, req: &'a CancelSessionRequest) -> RemoteFuture<'a, ()>;
}
