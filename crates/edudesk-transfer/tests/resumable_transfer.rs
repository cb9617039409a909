//! End-to-end transfers against an in-memory tus server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use edudesk_transfer::core::parse_u64_header;
use edudesk_transfer::{
    ChunkedTransfer, FileSource, Progress, TransferError, TransferOptions, TransferOutcome,
    TransferState, TusResponse, TusTransport,
};

#[derive(Debug)]
struct Dropped;

impl std::fmt::Display for Dropped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "connection dropped")
    }
}

impl std::error::Error for Dropped {}

#[derive(Default)]
struct ServerState {
    received: Vec<u8>,
    length: u64,
    patches: usize,
    /// PATCH numbers (1-based) whose connection drops before the server stores anything.
    drop_patches: Vec<usize>,
    /// Status returned for every request once set.
    forced_status: Option<u16>,
}

/// Stores acknowledged bytes the way a tus server would.
#[derive(Clone, Default)]
struct TusServer(Arc<Mutex<ServerState>>);

impl TusServer {
    fn new(length: u64) -> Self {
        let server = Self::default();
        server.0.lock().unwrap().length = length;
        server
    }

    fn drop_patches(self, patches: &[usize]) -> Self {
        self.0.lock().unwrap().drop_patches = patches.to_vec();
        self
    }

    fn force_status(&self, status: u16) {
        self.0.lock().unwrap().forced_status = Some(status);
    }

    fn received(&self) -> Vec<u8> {
        self.0.lock().unwrap().received.clone()
    }

    fn patches(&self) -> usize {
        self.0.lock().unwrap().patches
    }
}

impl TusTransport for TusServer {
    type Error = Dropped;

    async fn head(&self, _url: &str, headers: &[(String, String)]) -> Result<TusResponse, Dropped> {
        assert!(headers.contains(&("Tus-Resumable".to_string(), "1.0.0".to_string())));
        let state = self.0.lock().unwrap();
        if let Some(status) = state.forced_status {
            return Ok(TusResponse::new(status));
        }
        Ok(TusResponse::new(200)
            .with_header("Upload-Offset", state.received.len().to_string())
            .with_header("Upload-Length", state.length.to_string()))
    }

    async fn patch(
        &self,
        _url: &str,
        headers: &[(String, String)],
        body: Bytes,
    ) -> Result<TusResponse, Dropped> {
        let mut state = self.0.lock().unwrap();
        state.patches += 1;
        if let Some(status) = state.forced_status {
            return Ok(TusResponse::new(status));
        }
        if state.drop_patches.contains(&state.patches) {
            return Err(Dropped);
        }
        let offset = parse_u64_header(headers, "upload-offset").unwrap().unwrap();
        if offset != state.received.len() as u64 {
            return Ok(TusResponse::new(409));
        }
        state.received.extend_from_slice(&body);
        Ok(TusResponse::new(204).with_header("Upload-Offset", state.received.len().to_string()))
    }
}

fn payload(len: usize) -> Bytes {
    (0..len).map(|i| (i % 251) as u8).collect::<Vec<_>>().into()
}

fn quick_options() -> TransferOptions {
    TransferOptions::default()
        .chunk_size(1000)
        .retry_delays(vec![Duration::ZERO, Duration::from_millis(1), Duration::from_millis(1)])
}

#[tokio::test]
async fn file_arrives_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lecture.mp4");
    let data = payload(4500);
    std::fs::write(&path, &data).unwrap();

    let server = TusServer::new(4500);
    let source = FileSource::open(&path).await.unwrap();
    let transfer = ChunkedTransfer::new(server.clone(), source, "tus://1", quick_options()).unwrap();

    let outcome = transfer.run().await.unwrap();
    assert_eq!(outcome, TransferOutcome::Completed { bytes_total: 4500 });
    assert_eq!(server.received(), data.to_vec());
    assert_eq!(server.patches(), 5);
}

#[tokio::test]
async fn dropped_connections_are_retried_without_resending() {
    let data = payload(3000);
    let server = TusServer::new(3000).drop_patches(&[2, 3]);
    let transfer = ChunkedTransfer::new(server.clone(), data.clone(), "tus://1", quick_options()).unwrap();

    transfer.run().await.unwrap();
    assert_eq!(server.received(), data.to_vec());
    assert_eq!(server.patches(), 5);
}

#[tokio::test]
async fn second_transfer_resumes_where_first_stopped() {
    let data = payload(5000);
    // Every retry of the third chunk drops.
    let server = TusServer::new(5000).drop_patches(&[3, 4, 5, 6]);
    let options = quick_options();

    let first = ChunkedTransfer::new(server.clone(), data.clone(), "tus://1", options.clone()).unwrap();
    let err = first.run().await.unwrap_err();
    assert!(matches!(err, TransferError::RetriesExhausted { attempts: 3, .. }));
    assert_eq!(server.received().len(), 2000);

    let progress = Arc::new(Mutex::new(Vec::<Progress>::new()));
    let seen = progress.clone();
    let options = options.on_progress(Arc::new(move |p| seen.lock().unwrap().push(p.clone())));
    let second = ChunkedTransfer::new(server.clone(), data.clone(), "tus://1", options).unwrap();
    second.run().await.unwrap();

    assert_eq!(server.received(), data.to_vec());
    let progress = progress.lock().unwrap();
    assert_eq!(progress[0].bytes_sent, 2000);
    assert!(progress.windows(2).all(|w| w[0].bytes_sent <= w[1].bytes_sent));
}

#[tokio::test]
async fn expired_endpoint_is_reported() {
    let server = TusServer::new(10);
    server.force_status(410);
    let transfer = ChunkedTransfer::new(server, payload(10), "tus://1", quick_options()).unwrap();

    let err = transfer.run().await.unwrap_err();
    assert!(matches!(err, TransferError::EndpointGone { status: 410 }));
    assert!(err.needs_new_endpoint());
}

#[tokio::test]
async fn abort_from_progress_callback_stops_the_transfer() {
    let server = TusServer::new(5000);
    let calls = Arc::new(Mutex::new(0));
    let handle_slot: Arc<Mutex<Option<edudesk_transfer::TransferHandle>>> = Arc::default();

    let (c, slot) = (calls.clone(), handle_slot.clone());
    let options = quick_options().on_progress(Arc::new(move |p| {
        *c.lock().unwrap() += 1;
        if p.bytes_sent >= 2000
            && let Some(handle) = slot.lock().unwrap().as_ref()
        {
            handle.abort();
        }
    }));
    let transfer = ChunkedTransfer::new(server.clone(), payload(5000), "tus://1", options).unwrap();
    *handle_slot.lock().unwrap() = Some(transfer.handle());

    let outcome = transfer.run().await.unwrap();
    assert_eq!(outcome, TransferOutcome::Cancelled { bytes_sent: 2000 });
    assert_eq!(server.received().len(), 2000);
    // Negotiation plus two chunks; nothing after the abort.
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn abort_on_final_chunk_suppresses_success() {
    let server = TusServer::new(3000);
    let successes = Arc::new(Mutex::new(0));
    let handle_slot: Arc<Mutex<Option<edudesk_transfer::TransferHandle>>> = Arc::default();

    let slot = handle_slot.clone();
    let s = successes.clone();
    let options = quick_options()
        .on_progress(Arc::new(move |p| {
            if p.bytes_sent == p.bytes_total
                && let Some(handle) = slot.lock().unwrap().as_ref()
            {
                handle.abort();
            }
        }))
        .on_success(Arc::new(move |_| *s.lock().unwrap() += 1));
    let transfer = ChunkedTransfer::new(server.clone(), payload(3000), "tus://1", options).unwrap();
    let mut handle = transfer.handle();
    *handle_slot.lock().unwrap() = Some(transfer.handle());

    let outcome = transfer.run().await.unwrap();
    assert_eq!(outcome, TransferOutcome::Cancelled { bytes_sent: 3000 });
    assert_eq!(*successes.lock().unwrap(), 0);
    assert_eq!(handle.finished().await, TransferState::Cancelled);
}
