//! Current cluster context introspection.

use super::run_captured;
use serde::Serialize;
use std::time::Duration;

const UNKNOWN: &str = "unknown";
const DEFAULT_NAMESPACE: &str = "default";

/// Active context, cluster and namespace of the local kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub context: String,
    pub cluster: String,
    pub namespace: String,
}

impl Default for ClusterInfo {
    fn default() -> Self {
        Self {
            context: UNKNOWN.into(),
            cluster: UNKNOWN.into(),
            namespace: DEFAULT_NAMESPACE.into(),
        }
    }
}

/// Look up the active context, cluster and namespace concurrently.
///
/// Each lookup has its own `per_call` timeout; any failure or empty output
/// falls back to the default for that field.
pub async fn fetch_cluster_info(program: &str, per_call: Duration) -> ClusterInfo {
    let (context, cluster, namespace) = tokio::join!(
        lookup(program, &["config", "current-context"], per_call),
        lookup(
            program,
            &["config", "view", "--minify", "-o", "jsonpath={.clusters[0].name}"],
            per_call,
        ),
        lookup(
            program,
            &[
                "config",
                "view",
                "--minify",
                "-o",
                "jsonpath={.contexts[0].context.namespace}",
            ],
            per_call,
        ),
    );

    ClusterInfo {
        context: context.unwrap_or_else(|| UNKNOWN.into()),
        cluster: cluster.unwrap_or_else(|| UNKNOWN.into()),
        namespace: namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.into()),
    }
}

async fn lookup(program: &str, args: &[&str], per_call: Duration) -> Option<String> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    match run_captured(program, &args, per_call).await {
        Ok(output) if output.success => {
            let value = output.stdout.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        Ok(output) => {
            tracing::debug!(?args, stderr = %output.stderr.trim(), "context lookup failed");
            None
        }
        Err(message) => {
            tracing::debug!(?args, %message, "context lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_yields_defaults() {
        let info = fetch_cluster_info("kubemate-no-such-binary", Duration::from_secs(1)).await;
        assert_eq!(info, ClusterInfo::default());
        assert_eq!(info.context, "unknown");
        assert_eq!(info.cluster, "unknown");
        assert_eq!(info.namespace, "default");
    }

    #[tokio::test]
    async fn successful_lookups_use_trimmed_stdout() {
        // `echo` prints its arguments back, so each field is non-empty.
        let info = fetch_cluster_info("echo", Duration::from_secs(2)).await;
        assert_eq!(info.context, "config current-context");
        assert!(info.cluster.ends_with("jsonpath={.clusters[0].name}"));
        assert!(info.namespace.ends_with("jsonpath={.contexts[0].context.namespace}"));
    }

    #[tokio::test]
    async fn failing_lookups_fall_back() {
        let info = fetch_cluster_info("false", Duration::from_secs(2)).await;
        assert_eq!(info, ClusterInfo::default());
    }

    #[test]
    fn serializes_as_flat_object() {
        let value = serde_json::to_value(ClusterInfo::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"context": "unknown", "cluster": "unknown", "namespace": "default"})
        );
    }
}
