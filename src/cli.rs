//! CLI argument parsing via clap.

use clap::Parser;

/// Natural-language kubectl assistant for the terminal.
#[derive(Debug, Parser)]
#[command(name = "kubemate", version)]
pub struct Args {
    /// Path to config file (default: ./kubemate.toml or ~/.config/kubemate/kubemate.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override model name.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Override API base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// kubectl binary to run (name on PATH or full path).
    #[arg(long = "kubectl", value_name = "PROGRAM")]
    pub kubectl: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn defaults_leave_overrides_unset() {
        let args = Args::parse_from(["kubemate"]);
        assert!(args.config.is_none());
        assert!(args.model.is_none());
        assert!(args.kubectl.is_none());
        assert!(!args.no_color);
    }

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "kubemate",
            "-c",
            "/tmp/k.toml",
            "--model",
            "gpt-4o",
            "--base-url",
            "http://localhost:8080/v1",
            "--kubectl",
            "/usr/local/bin/kubectl",
            "--no-color",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/k.toml"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(args.kubectl.as_deref(), Some("/usr/local/bin/kubectl"));
        assert!(args.no_color);
    }

    #[test]
    fn positional_prompt_is_rejected() {
        assert!(Args::try_parse_from(["kubemate", "list pods"]).is_err());
    }
}
