//! Kubernetes documentation lookup.
//!
//! Search runs a tiered chain: a keyed Custom Search query when a credential
//! is configured, then a keyword match against the site's sitemap, then an
//! empty result. Page fetches convert HTML to Markdown.
//!
//! - `markdown`: HTML → Markdown flattening
//! - `sitemap`: `<loc>` extraction and keyword matching

use crate::config::DocsConfig;
use crate::error::FetchError;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod markdown;
mod sitemap;

pub use markdown::html_to_markdown;

/// Upper bound on keyed-search results.
const MAX_SEARCH_RESULTS: usize = 5;

/// One documentation search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A fetched documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPage {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl DocPage {
    /// Render the page the way the agent receives it.
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\nSource: {}\n\n{}", self.title, self.url, self.content)
    }
}

#[derive(Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Option<Vec<CustomSearchItem>>,
}

#[derive(Deserialize)]
struct CustomSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

/// Client for documentation search and page retrieval.
pub struct DocsClient {
    http: reqwest::Client,
    search_api_key: String,
    search_engine_id: String,
    search_endpoint: String,
    site: String,
    sitemap_url: String,
}

impl DocsClient {
    pub fn new(config: &DocsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs.max(1)))
            .user_agent(concat!("kubemate/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            search_api_key: config.search_api_key.trim().to_string(),
            search_engine_id: config.search_engine_id.clone(),
            search_endpoint: config.search_endpoint.clone(),
            site: config.site.clone(),
            sitemap_url: config.sitemap_url.clone(),
        }
    }

    /// Whether the keyed search tier is enabled.
    pub fn has_search_credential(&self) -> bool {
        !self.search_api_key.is_empty()
    }

    /// Fetch a documentation page and convert its main content to Markdown.
    pub async fn fetch_page(&self, url: &str) -> Result<DocPage, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }
        let html = response.text().await?;
        let document = Html::parse_document(&html);
        let title = markdown::extract_title(&document).unwrap_or_else(|| url.to_string());
        let content = markdown::main_content_markdown(&document);
        tracing::debug!(url, bytes = html.len(), "fetched documentation page");
        Ok(DocPage {
            title,
            url: url.to_string(),
            content,
        })
    }

    /// Search the documentation site. Never fails; an exhausted chain yields
    /// an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        if self.has_search_credential() {
            match self.search_keyed(query).await {
                Ok(results) => return results,
                Err(err) => {
                    tracing::warn!(error = %err, "keyed docs search failed; using sitemap");
                }
            }
        }
        match self.search_sitemap(query).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(error = %err, "sitemap docs search failed");
                Vec::new()
            }
        }
    }

    async fn search_keyed(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let q = format!("{query} site:{}", self.site);
        let num = MAX_SEARCH_RESULTS.to_string();
        let response = self
            .http
            .get(&self.search_endpoint)
            .query(&[
                ("key", self.search_api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", q.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.search_endpoint.clone(),
                code: status.as_u16(),
            });
        }
        let body: CustomSearchResponse = response.json().await?;
        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter(|item| !item.link.is_empty())
            .take(MAX_SEARCH_RESULTS)
            .map(|item| SearchResult {
                title: item.title,
                url: item.link,
                snippet: item.snippet,
            })
            .collect())
    }

    async fn search_sitemap(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let response = self.http.get(&self.sitemap_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.sitemap_url.clone(),
                code: status.as_u16(),
            });
        }
        let xml = response.text().await?;
        let locations = sitemap::extract_locations(&xml);
        let results = sitemap::match_locations(&locations, query);
        tracing::debug!(
            query,
            candidates = locations.len(),
            matched = results.len(),
            "sitemap docs search"
        );
        Ok(results)
    }
}
