//! Environment overrides and API key resolution.

use crate::error::ConfigError;

use super::defaults::DEFAULT_API_KEY_ENV;
use super::Config;

/// Apply `KUBEMATE_*` and docs-search overrides on top of file values.
pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup, "KUBEMATE_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(model) = non_empty(env_lookup, "KUBEMATE_MODEL") {
        config.api.model = model;
    }
    if let Some(timeout) = non_empty(env_lookup, "KUBEMATE_API_TIMEOUT_SECS") {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid KUBEMATE_API_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed.max(1);
    }
    if let Some(key) = non_empty(env_lookup, "K8S_DOCS_SEARCH_API_KEY") {
        config.docs.search_api_key = key;
    }
    Ok(())
}

/// Resolve the model API key: `KUBEMATE_API_KEY` > inline > `api_key_env`.
pub(super) fn resolve_api_key<FEnv>(config: &mut Config, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(env_lookup, "KUBEMATE_API_KEY") {
        config.api.api_key = key;
        return;
    }
    if !config.api.api_key.trim().is_empty() {
        return;
    }
    let var = config
        .api
        .api_key_env
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_API_KEY_ENV);
    if let Some(key) = non_empty(env_lookup, var) {
        config.api.api_key = key;
    }
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
