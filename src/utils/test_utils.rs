//! Shared fakes for unit tests: a scripted [`ChatTransport`] and a tiny
//! one-request-per-connection HTTP server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::core::error::{CompletionError, ConnectivityError};
use crate::core::message::Message;
use crate::core::transport::ChatTransport;

pub enum FakeReply {
    Content(String),
    Failure(CompletionError),
    /// Block until the caller cancels.
    Hang,
}

#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<FakeReply>>,
    calls: Mutex<Vec<Vec<Message>>>,
    probe_fails: AtomicBool,
    hanging_probes: AtomicUsize,
    probes: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = FakeReply>) -> Self {
        let fake = Self::new();
        fake.replies.lock().unwrap().extend(replies);
        fake
    }

    pub fn set_probe_fails(&self, fails: bool) {
        self.probe_fails.store(fails, Ordering::SeqCst);
    }

    /// The next `count` probes never return.
    pub fn hang_next_probes(&self, count: usize) {
        self.hanging_probes.store(count, Ordering::SeqCst);
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn probe(&self) -> Result<(), ConnectivityError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let hang = self
            .hanging_probes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if hang {
            std::future::pending::<()>().await;
        }
        if self.probe_fails.load(Ordering::SeqCst) {
            Err(ConnectivityError::Status { status: 503 })
        } else {
            Ok(())
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        cancel_token: &CancellationToken,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(FakeReply::Content(text)) => Ok(text),
            Some(FakeReply::Failure(err)) => Err(err),
            Some(FakeReply::Hang) => {
                cancel_token.cancelled().await;
                Err(CompletionError::cancelled())
            }
            None => Ok("ok".to_string()),
        }
    }
}

#[derive(Clone)]
pub struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

pub struct TestServer {
    pub base_url: String,
    captured: Arc<tokio::sync::Mutex<Vec<CapturedRequest>>>,
}

impl TestServer {
    pub async fn captured(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

/// Serve each canned response on its own connection, in order.
pub async fn spawn_http_server(responses: Vec<CannedResponse>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let captured = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let captured_for_server = Arc::clone(&captured);

    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(request) = read_http_request(&mut stream).await else {
                return;
            };
            captured_for_server.lock().await.push(request);

            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }

            let reason = if (200..300).contains(&canned.status) {
                "OK"
            } else {
                "Error"
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.status,
                reason,
                canned.content_type,
                canned.body.len(),
                canned.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    TestServer {
        base_url: format!("http://{addr}"),
        captured,
    }
}

async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let mut parts = line.splitn(2, ':');
        let Some(name) = parts.next() else {
            continue;
        };
        let value = parts.next().unwrap_or_default().trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length.saturating_sub(body.len())];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
