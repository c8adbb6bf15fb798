//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`KUBEMATE_API_KEY`, `KUBEMATE_BASE_URL`,
//!    `KUBEMATE_MODEL`, `KUBEMATE_API_TIMEOUT_SECS`, `K8S_DOCS_SEARCH_API_KEY`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./kubemate.toml in the current directory
//! 4. $XDG_CONFIG_HOME/kubemate/kubemate.toml (or ~/.config/kubemate/kubemate.toml)
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

use env::{apply_runtime_env_overrides, resolve_api_key};
pub use sources::config_root_dir;
use sources::read_config_text_with_sources;
pub use types::{
    AgentConfig, ApiConfig, Config, ConfirmConfig, DisplayConfig, DocsConfig, KubectlConfig,
    LogConfig,
};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    tracing::debug!(?source, "config source resolved");
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    resolve_api_key(&mut config, &env_lookup);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "api.base_url is empty; set it in kubemate.toml or KUBEMATE_BASE_URL".into(),
        ));
    }
    if config.kubectl.program.trim().is_empty() {
        return Err(ConfigError::Invalid("kubectl.program is empty".into()));
    }
    if config.agent.max_iterations == 0 {
        return Err(ConfigError::Invalid(
            "agent.max_iterations must be at least 1".into(),
        ));
    }
    Ok(())
}
