//! CLI entry point for kubemate.

mod cli;

use clap::Parser;
use kubemate::agent::{ChatBackend, ChatSettings, SessionConfig, SessionManager};
use kubemate::api::ApiClient;
use kubemate::app::Orchestrator;
use kubemate::config::{load_config, Config};
use kubemate::confirm::ConfirmationGate;
use kubemate::kubectl::fetch_cluster_info;
use kubemate::prompt::{render_system_prompt, SystemPromptParams};
use kubemate::tools::kubemate_tools;
use kubemate::ui::TerminalFrontend;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KUBEMATE_LOG";

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // Load config.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Apply CLI overrides.
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(program) = &args.kubectl {
        config.kubectl.program = program.clone();
    }
    if args.no_color {
        config.display.color = false;
    }

    if let Err(e) = init_logging(&config) {
        eprintln!("warning: logging disabled: {e}");
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.api.model,
        base_url = %config.api.base_url,
        kubectl = %config.kubectl.program,
        "kubemate starting"
    );

    let cluster = fetch_cluster_info(
        &config.kubectl.program,
        Duration::from_secs(config.kubectl.context_timeout_secs.max(1)),
    )
    .await;
    tracing::info!(
        context = %cluster.context,
        cluster = %cluster.cluster,
        namespace = %cluster.namespace,
        "cluster detected"
    );

    let gate = ConfirmationGate::new(config.confirm.timeout());
    let tools = Arc::new(kubemate_tools(&config, gate.clone()));
    let system_prompt = render_system_prompt(SystemPromptParams {
        cluster: Some(&cluster),
        enabled_tools: tools.names(),
        custom_instructions: Some(&config.agent.system_prompt),
    });

    let client = Arc::new(ApiClient::new(&config.api));
    let backend = Arc::new(ChatBackend::new(client, ChatSettings::from_config(&config)));
    let manager = SessionManager::new(
        backend,
        SessionConfig {
            system_prompt,
            tools,
        },
    );

    let frontend = TerminalFrontend::stdio(config.display.color);
    let mut app = Orchestrator::new(manager, gate, frontend, config.agent.turn_timeout());
    app.start(&cluster).await;

    tokio::select! {
        _ = app.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }

    app.shutdown().await;
    tracing::info!("kubemate stopped");
}

/// Send diagnostics to the configured log file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<(), String> {
    let file = std::fs::File::create(&config.log.file)
        .map_err(|e| format!("failed to create {}: {e}", config.log.file.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())
}
