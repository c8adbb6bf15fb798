//! Default configuration constants.
//!
//! Keeping defaults in one module lets the typed config and the tests share
//! the same literals.

/// Default OpenAI-compatible API base URL.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model id sent with each chat request.
pub(super) const DEFAULT_MODEL_ID: &str = "gpt-4o";
/// Default timeout for a single model API request.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 60;
/// Default upper bound for one conversation turn.
pub(super) const DEFAULT_TURN_TIMEOUT_SECS: u64 = 120;
/// Safety cap on tool-loop iterations within one turn.
pub(super) const DEFAULT_MAX_ITERATIONS: usize = 20;
/// Default cluster CLI binary.
pub(super) const DEFAULT_KUBECTL_PROGRAM: &str = "kubectl";
/// Timeout for agent-initiated kubectl commands.
pub(super) const DEFAULT_KUBECTL_TIMEOUT_SECS: u64 = 30;
/// Timeout for each read-only context lookup.
pub(super) const DEFAULT_CONTEXT_TIMEOUT_SECS: u64 = 5;
/// Documentation site the search tiers are scoped to.
pub(super) const DEFAULT_DOCS_SITE: &str = "kubernetes.io";
/// Sitemap used by the unkeyed search tier.
pub(super) const DEFAULT_SITEMAP_URL: &str = "https://kubernetes.io/sitemap.xml";
/// Custom Search engine id scoped to kubernetes.io.
pub(super) const DEFAULT_SEARCH_ENGINE_ID: &str = "011673866795133980826:kubernetes";
/// Timeout for documentation HTTP requests.
pub(super) const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
/// Auto-deny window for an unanswered confirmation.
pub(super) const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 300;
/// Log file written next to the working directory.
pub(super) const DEFAULT_LOG_FILE: &str = "kubemate.log";
/// Default tracing filter when `KUBEMATE_LOG` is unset.
pub(super) const DEFAULT_LOG_LEVEL: &str = "info";
/// Environment variable consulted for the API key when `api_key_env` is unset.
pub(super) const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
