//! Remote save: form-post the field-set to a spreadsheet web-app endpoint

use std::future::Future;
use std::time::{Duration, Instant};

use log::{info, warn};

use super::fields::FieldSet;
use crate::derivation::Results;
use crate::error::SaveError;
use crate::inputs::{CallMetadata, Inputs};

/// How long a success or failure status stays visible
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_millis(2000);

/// Outbound delivery of a field-set
pub trait Transport: Send + Sync + 'static {
    /// POST `fields` form-encoded to `url`. Any non-success status or network
    /// fault is reported as [`SaveError::Transport`].
    fn post_form(
        &self,
        url: &str,
        fields: &FieldSet,
    ) -> impl Future<Output = Result<(), SaveError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxy settings)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post_form(
        &self,
        url: &str,
        fields: &FieldSet,
    ) -> impl Future<Output = Result<(), SaveError>> + Send {
        let request = self.client.post(url).form(fields.as_pairs());
        async move {
            let resp = request
                .send()
                .await
                .map_err(|e| SaveError::Transport(e.to_string()))?;
            resp.error_for_status()
                .map(|_| ())
                .map_err(|e| SaveError::Transport(e.to_string()))
        }
    }
}

/// Validates save preconditions and hands the snapshot to a [`Transport`]
#[derive(Debug, Clone)]
pub struct RemoteSaver<T: Transport> {
    transport: T,
}

impl<T: Transport> RemoteSaver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Check preconditions without touching the network
    pub fn validate(meta: &CallMetadata) -> Result<(), SaveError> {
        if meta.google_sheet_url.is_empty() {
            return Err(SaveError::MissingEndpoint);
        }
        if meta.client_name.is_empty() {
            return Err(SaveError::MissingClientName);
        }
        Ok(())
    }

    /// Build the field-set, stamped now, and send it. One attempt, no retry.
    pub async fn save(
        &self,
        meta: &CallMetadata,
        inputs: &Inputs,
        results: &Results,
    ) -> Result<(), SaveError> {
        Self::validate(meta)?;
        let fields = FieldSet::build(meta, inputs, results);

        info!("Saving snapshot for '{}' to {}", meta.client_name, meta.google_sheet_url);
        match self.transport.post_form(&meta.google_sheet_url, &fields).await {
            Ok(()) => {
                info!("Snapshot saved for '{}'", meta.client_name);
                Ok(())
            }
            Err(e) => {
                warn!("Snapshot save failed: {}", e);
                Err(e)
            }
        }
    }
}

impl RemoteSaver<HttpTransport> {
    pub fn http() -> Self {
        Self::new(HttpTransport::new())
    }
}

/// User-facing outcome of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Success,
    /// Transport-level failure of any kind
    Failed,
    /// Endpoint or client name missing; nothing was sent
    Invalid,
}

impl SaveStatus {
    pub fn from_outcome(outcome: &Result<(), SaveError>) -> Self {
        match outcome {
            Ok(()) => SaveStatus::Success,
            Err(e) if e.is_validation() => SaveStatus::Invalid,
            Err(_) => SaveStatus::Failed,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SaveStatus::Success => "✓ Data saved successfully!",
            SaveStatus::Failed => "✗ Error saving data. Please check your URL and try again.",
            SaveStatus::Invalid => "✗ Enter a spreadsheet URL and client name before saving.",
        }
    }
}

/// A status that disappears once its delay has elapsed
#[derive(Debug, Clone)]
pub struct TransientStatus {
    current: Option<(SaveStatus, Instant)>,
    ttl: Duration,
}

impl TransientStatus {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn set(&mut self, status: SaveStatus, now: Instant) {
        self.current = Some((status, now));
    }

    /// Status still visible at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<SaveStatus> {
        self.current
            .filter(|(_, set_at)| now.saturating_duration_since(*set_at) < self.ttl)
            .map(|(status, _)| status)
    }
}

impl Default for TransientStatus {
    fn default() -> Self {
        Self::new(STATUS_CLEAR_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::derive;
    use crate::snapshot::FIELD_KEYS;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records every call; fails when `fail` is set
    #[derive(Default)]
    struct RecordingTransport {
        calls: Arc<AtomicUsize>,
        last_url: Arc<Mutex<Option<String>>>,
        fail: bool,
    }

    impl Transport for RecordingTransport {
        fn post_form(
            &self,
            url: &str,
            fields: &FieldSet,
        ) -> impl Future<Output = Result<(), SaveError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(url.to_string());
            let fail = self.fail;
            let field_count = fields.len();
            async move {
                assert_eq!(field_count, 25);
                if fail {
                    Err(SaveError::Transport("HTTP 500".to_string()))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn meta(url: &str, client: &str) -> CallMetadata {
        CallMetadata {
            client_name: client.to_string(),
            sales_rep_name: "Jordan".to_string(),
            call_date: "2026-10-18".to_string(),
            google_sheet_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_url_never_sends() {
        let transport = RecordingTransport::default();
        let calls = transport.calls.clone();
        let saver = RemoteSaver::new(transport);
        let inputs = Inputs::default();

        let outcome = saver.save(&meta("", "Acme"), &inputs, &derive(&inputs)).await;

        assert_eq!(outcome, Err(SaveError::MissingEndpoint));
        assert_eq!(SaveStatus::from_outcome(&outcome), SaveStatus::Invalid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_client_never_sends() {
        let transport = RecordingTransport::default();
        let calls = transport.calls.clone();
        let saver = RemoteSaver::new(transport);
        let inputs = Inputs::default();

        let outcome = saver
            .save(&meta("https://script.example.com/exec", ""), &inputs, &derive(&inputs))
            .await;

        assert_eq!(outcome, Err(SaveError::MissingClientName));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_save_posts_once() {
        let transport = RecordingTransport::default();
        let calls = transport.calls.clone();
        let last_url = transport.last_url.clone();
        let saver = RemoteSaver::new(transport);
        let inputs = Inputs::default();

        let outcome = saver
            .save(&meta("https://script.example.com/exec", "Acme"), &inputs, &derive(&inputs))
            .await;

        assert_eq!(SaveStatus::from_outcome(&outcome), SaveStatus::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            last_url.lock().unwrap().as_deref(),
            Some("https://script.example.com/exec")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let transport = RecordingTransport { fail: true, ..Default::default() };
        let saver = RemoteSaver::new(transport);
        let inputs = Inputs::default();

        let outcome = saver
            .save(&meta("https://script.example.com/exec", "Acme"), &inputs, &derive(&inputs))
            .await;

        assert!(matches!(outcome, Err(SaveError::Transport(_))));
        assert_eq!(SaveStatus::from_outcome(&outcome), SaveStatus::Failed);
    }

    /// Captured request head and body from a one-shot local HTTP server
    struct CapturedRequest {
        head: String,
        body: String,
    }

    /// Serve exactly one request on 127.0.0.1, answering with `status_line`
    async fn serve_once(
        status_line: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<CapturedRequest>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exec", listener.local_addr().unwrap());
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body");
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8_lossy(&buf[head_end..head_end + content_length]).to_string();

            let response = format!("{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status_line);
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(CapturedRequest { head, body });
        });

        (url, rx)
    }

    fn local_http() -> RemoteSaver<HttpTransport> {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        RemoteSaver::new(HttpTransport::with_client(client))
    }

    #[tokio::test]
    async fn test_http_server_error_is_failed_and_body_is_ordered_form() {
        let (url, captured) = serve_once("HTTP/1.1 500 Internal Server Error").await;
        let inputs = Inputs::default();

        let outcome = local_http()
            .save(&meta(&url, "Acme & Co"), &inputs, &derive(&inputs))
            .await;

        assert!(matches!(outcome, Err(SaveError::Transport(_))));
        assert_eq!(SaveStatus::from_outcome(&outcome), SaveStatus::Failed);

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("POST /exec "));
        assert!(request
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.body.starts_with("timestamp="));
        assert!(request.body.contains("&clientName=Acme+%26+Co&"));
        assert!(request.body.contains("&customerBase=1000&"));

        let keys: Vec<&str> = request
            .body
            .split('&')
            .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key))
            .collect();
        assert_eq!(keys, FIELD_KEYS.to_vec());
    }

    #[tokio::test]
    async fn test_http_ok_is_success() {
        let (url, captured) = serve_once("HTTP/1.1 200 OK").await;
        let inputs = Inputs::default();

        let outcome = local_http().save(&meta(&url, "Acme"), &inputs, &derive(&inputs)).await;

        assert_eq!(SaveStatus::from_outcome(&outcome), SaveStatus::Success);
        assert!(captured.await.unwrap().body.contains("&clientName=Acme&"));
    }

    #[test]
    fn test_status_clears_after_delay() {
        let start = Instant::now();
        let mut status = TransientStatus::default();
        assert_eq!(status.visible(start), None);

        status.set(SaveStatus::Success, start);
        assert_eq!(status.visible(start + Duration::from_millis(1999)), Some(SaveStatus::Success));
        assert_eq!(status.visible(start + Duration::from_millis(2000)), None);
    }
}
