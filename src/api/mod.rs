//! HTTP client for OpenAI-compatible model APIs.
//!
//! - `client`: request dispatch with bounded retries
//! - `retry`: retry/backoff policy

use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

mod client;
mod retry;

pub use client::ApiClient;

/// Minimal model API interface used by the chat session loop.
///
/// Tests provide deterministic scripted responses through this trait while
/// the production path uses [`ApiClient`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// Parse a `Retry-After` header expressed in whole seconds.
pub(crate) fn parse_retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}
