//! System prompt templating helpers.
//!
//! The built-in persona and operating rules live in one template file that is
//! rendered with the detected cluster, the registered tools, and optional
//! operator instructions.

use crate::kubectl::ClusterInfo;
use std::collections::BTreeMap;

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("templates/system_prompt.template");

/// Parameters used to compile the system prompt template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SystemPromptParams<'a> {
    /// Cluster detected at startup, if lookup succeeded.
    pub cluster: Option<&'a ClusterInfo>,
    pub enabled_tools: Vec<&'a str>,
    pub custom_instructions: Option<&'a str>,
}

/// Render the single system prompt template using runtime parameters.
pub fn render_system_prompt(params: SystemPromptParams<'_>) -> String {
    let mut vars = BTreeMap::<&str, String>::new();
    vars.insert("CLUSTER_NOTE", render_cluster_note(params.cluster));
    vars.insert(
        "ENABLED_TOOLS_LIST",
        render_enabled_tools(&params.enabled_tools),
    );
    vars.insert(
        "CUSTOM_INSTRUCTIONS_BLOCK",
        render_custom_instructions(params.custom_instructions),
    );

    normalize_blank_lines(&render_template(SYSTEM_PROMPT_TEMPLATE, &vars))
}

fn render_template(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{key}}}}}");
        rendered = rendered.replace(&placeholder, value);
    }
    rendered
}

fn render_cluster_note(cluster: Option<&ClusterInfo>) -> String {
    let Some(info) = cluster else {
        return String::new();
    };
    format!(
        "At startup kubectl reported context `{}`, cluster `{}`, namespace `{}`. \
         The operator may switch contexts during the session; check again before \
         acting on a specific cluster.",
        info.context, info.cluster, info.namespace
    )
}

fn render_enabled_tools(enabled_tools: &[&str]) -> String {
    if enabled_tools.is_empty() {
        return "- none".to_string();
    }

    enabled_tools
        .iter()
        .map(|name| format!("- `{name}`"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_custom_instructions(custom: Option<&str>) -> String {
    let Some(custom) = custom.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };
    format!("Additional operator instructions:\n{custom}")
}

fn normalize_blank_lines(text: &str) -> String {
    let mut out = String::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let is_blank = line.trim().is_empty();
        if is_blank && previous_blank {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line.trim_end());
        previous_blank = is_blank;
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<'a>() -> SystemPromptParams<'a> {
        SystemPromptParams {
            cluster: None,
            enabled_tools: vec!["run_kubectl", "search_k8s_docs"],
            custom_instructions: None,
        }
    }

    #[test]
    fn prompt_contains_operating_rules() {
        let prompt = render_system_prompt(params());
        assert!(prompt.contains("Kubernetes expert"));
        assert!(prompt.contains("Always warn before destructive operations"));
        assert!(prompt.contains("cite the page URLs"));
        assert!(prompt.contains("show the kubectl command"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn prompt_renders_cluster_note() {
        let info = ClusterInfo {
            context: "kind-dev".into(),
            cluster: "kind-dev".into(),
            namespace: "apps".into(),
        };
        let prompt = render_system_prompt(SystemPromptParams {
            cluster: Some(&info),
            ..params()
        });
        assert!(prompt.contains("context `kind-dev`"));
        assert!(prompt.contains("namespace `apps`"));
    }

    #[test]
    fn prompt_renders_enabled_tools_list() {
        let prompt = render_system_prompt(params());
        assert!(prompt.contains("- `run_kubectl`"));
        assert!(prompt.contains("- `search_k8s_docs`"));
    }

    #[test]
    fn prompt_renders_custom_instructions() {
        let prompt = render_system_prompt(SystemPromptParams {
            custom_instructions: Some("Never touch the prod namespace."),
            ..params()
        });
        assert!(prompt.contains("Additional operator instructions:"));
        assert!(prompt.contains("Never touch the prod namespace."));

        let blank = render_system_prompt(SystemPromptParams {
            custom_instructions: Some("   "),
            ..params()
        });
        assert!(!blank.contains("Additional operator instructions:"));
    }

    #[test]
    fn blank_runs_are_collapsed() {
        assert_eq!(normalize_blank_lines("a\n\n\n\nb  \n"), "a\n\nb");
    }
}
