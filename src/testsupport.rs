//! Shared test fixtures for HTTP-facing and orchestration test modules.
//!
//! The stubs here speak just enough HTTP/1.1 over a local `TcpListener` for
//! reqwest to talk to them; each response closes its connection.

use crate::api::ModelClient;
use crate::app::Frontend;
use crate::confirm::ConfirmationPrompt;
use crate::error::ApiError;
use crate::kubectl::ClusterInfo;
use crate::timeline::{Timeline, TimelineChange};
use crate::types::{ChatRequest, ChatResponse, Choice, FunctionCall, Message, ToolCall};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Build a complete HTTP/1.1 response with `Connection: close`.
pub fn http_response(status: u16, content_type: &str, body: &str, extra_headers: &[&str]) -> String {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let mut out = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for header in extra_headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

/// Serve `responses` in order, one per accepted connection. Returns the base URL.
pub async fn serve_sequence(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{addr}")
}

/// Server that reads each request and then closes the socket without replying.
pub async fn serve_hangup() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf).await;
            drop(stream);
        }
    });
    format!("http://{addr}")
}

/// Path-routed stub server that records every requested path (query included).
pub struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Requested request-targets in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// Full URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Serve `(path, response)` routes forever; unmatched paths get a 404.
///
/// Routes match on the path component only, ignoring the query string.
pub async fn serve_routes(routes: Vec<(&str, String)>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let routes: Vec<(String, String)> = routes
        .into_iter()
        .map(|(path, response)| (path.to_string(), response))
        .collect();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&hits);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let target = head
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            if let Ok(mut guard) = recorded.lock() {
                guard.push(target.clone());
            }
            let path = target.split('?').next().unwrap_or("/");
            let response = routes
                .iter()
                .find(|(route, _)| route == path)
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| http_response(404, "text/plain", "not found", &[]));
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    StubServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Model client that replays queued responses and records requests.
pub struct ScriptedModelClient {
    responses: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedModelClient {
    pub fn new(responses: Vec<Result<ChatResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Like [`ScriptedModelClient::new`] but sleeps before every answer.
    pub fn delayed(responses: Vec<Result<ChatResponse, ApiError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.requests.lock().expect("lock").push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::InvalidResponse("no scripted response queued".into())))
    }
}

fn response_with(message: Message, finish_reason: &str) -> ChatResponse {
    ChatResponse {
        id: "scripted".into(),
        choices: vec![Choice {
            index: 0,
            message,
            finish_reason: Some(finish_reason.into()),
        }],
        usage: None,
    }
}

/// A final assistant answer.
pub fn text_response(text: &str) -> ChatResponse {
    response_with(Message::assistant(text), "stop")
}

/// An assistant turn requesting one tool call.
pub fn tool_call_response(id: &str, name: &str, arguments: &str) -> ChatResponse {
    let mut message = Message::assistant("");
    message.content = None;
    message.tool_calls = Some(vec![ToolCall {
        id: id.into(),
        call_type: "function".into(),
        function: FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        },
    }]);
    response_with(message, "tool_calls")
}

/// Frontend that replays queued input lines and confirmation answers.
#[derive(Default)]
pub struct ScriptedFrontend {
    inputs: VecDeque<String>,
    answers: VecDeque<bool>,
    headers: usize,
    busy: Vec<bool>,
    prompts: Vec<ConfirmationPrompt>,
    changes: Vec<TimelineChange>,
    expired: usize,
}

impl ScriptedFrontend {
    pub fn new(inputs: Vec<String>, answers: Vec<bool>) -> Self {
        Self {
            inputs: inputs.into(),
            answers: answers.into(),
            ..Self::default()
        }
    }

    pub fn headers(&self) -> usize {
        self.headers
    }

    pub fn busy_transitions(&self) -> Vec<bool> {
        self.busy.clone()
    }

    pub fn prompts(&self) -> &[ConfirmationPrompt] {
        &self.prompts
    }

    pub fn changes(&self) -> &[TimelineChange] {
        &self.changes
    }

    pub fn expired(&self) -> usize {
        self.expired
    }
}

#[async_trait]
impl Frontend for ScriptedFrontend {
    fn header(&mut self, _info: &ClusterInfo) {
        self.headers += 1;
    }

    fn render(&mut self, _timeline: &Timeline, change: TimelineChange) {
        self.changes.push(change);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy.push(busy);
    }

    async fn confirm(&mut self, prompt: &ConfirmationPrompt) -> bool {
        self.prompts.push(prompt.clone());
        // Out of answers: never respond, leaving the gate to time out.
        match self.answers.pop_front() {
            Some(answer) => answer,
            None => std::future::pending().await,
        }
    }

    fn confirmation_expired(&mut self) {
        self.expired += 1;
    }

    async fn read_input(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_response_sets_length_and_headers() {
        let raw = http_response(429, "text/plain", "slow", &["Retry-After: 2"]);
        assert!(raw.starts_with("HTTP/1.1 429 Too Many Requests\r\n"));
        assert!(raw.contains("Content-Length: 4\r\n"));
        assert!(raw.contains("Retry-After: 2\r\n"));
        assert!(raw.ends_with("\r\n\r\nslow"));
    }

    #[tokio::test]
    async fn routed_stub_records_hits_and_404s_unknown_paths() {
        let server = serve_routes(vec![(
            "/ok",
            http_response(200, "text/plain", "fine", &[]),
        )])
        .await;
        let ok = reqwest::get(server.url("/ok?x=1")).await.unwrap();
        assert_eq!(ok.status().as_u16(), 200);
        let missing = reqwest::get(server.url("/nope")).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
        assert_eq!(server.hits(), vec!["/ok?x=1".to_string(), "/nope".to_string()]);
    }
}
