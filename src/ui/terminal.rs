//! Terminal implementation of the orchestrator frontend.
//!
//! Output is plain line-oriented text with optional crossterm styling; input
//! is read line by line from an async reader (stdin in production).

use super::markdown::render_markdown_for_terminal;
use super::settings;
use crate::app::Frontend;
use crate::confirm::ConfirmationPrompt;
use crate::kubectl::{command_args, ClusterInfo};
use crate::textutil::{preview, single_line, PREVIEW_CHARS};
use crate::timeline::{ChatRole, Timeline, TimelineChange, TimelineEntry, ToolStatus};
use async_trait::async_trait;
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct TerminalFrontend<R, W> {
    input: Lines<R>,
    out: W,
    color: bool,
}

impl TerminalFrontend<BufReader<Stdin>, io::Stdout> {
    /// Frontend bound to the process stdin and stdout.
    pub fn stdio(color: bool) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout(), color)
    }
}

impl<R, W> TerminalFrontend<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, out: W, color: bool) -> Self {
        Self {
            input: input.lines(),
            out,
            color,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_bold(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn prompt(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    async fn next_line(&mut self) -> Option<String> {
        match self.input.next_line().await {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read terminal input");
                None
            }
        }
    }

    fn render_tool(&mut self, tool_name: &str, status: ToolStatus, output: Option<&str>) {
        let (glyph, color) = match (status, self.color) {
            (ToolStatus::Running, true) => (settings::GLYPH_TOOL_RUNNING, settings::COLOR_TOOL_RUNNING),
            (ToolStatus::Running, false) => (settings::GLYPH_TOOL_RUNNING_PLAIN, settings::COLOR_TOOL_RUNNING),
            (ToolStatus::Complete, true) => (settings::GLYPH_TOOL_DONE, settings::COLOR_TOOL_DONE),
            (ToolStatus::Complete, false) => (settings::GLYPH_TOOL_DONE_PLAIN, settings::COLOR_TOOL_DONE),
        };
        let head = format!(
            "{}{} {}",
            settings::INDENT_1,
            self.paint(glyph, color),
            self.paint_bold(tool_name, settings::COLOR_TOOL_NAME)
        );
        self.line(&head);

        let Some(output) = output.filter(|text| !text.trim().is_empty()) else {
            return;
        };
        let clipped = preview(output, PREVIEW_CHARS);
        for row in clipped.lines() {
            let row = format!(
                "{}{}",
                settings::INDENT_2,
                self.paint(row, settings::COLOR_TOOL_OUTPUT)
            );
            self.line(&row);
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl<R, W> Frontend for TerminalFrontend<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn header(&mut self, info: &ClusterInfo) {
        let field = |this: &Self, key: &str, value: &str| {
            format!(
                "{} {}",
                this.paint(key, settings::COLOR_HEADER_FIELD),
                this.paint_bold(value, settings::COLOR_HEADER_VALUE)
            )
        };
        let header = format!(
            "{}  {}  {}  {}",
            self.paint_bold(settings::LABEL_APP, settings::COLOR_APP_LABEL),
            field(self, "context:", &info.context),
            field(self, "cluster:", &info.cluster),
            field(self, "namespace:", &info.namespace),
        );
        self.line(&header);
        let hint = self.paint(settings::HINT_STARTUP, settings::COLOR_HEADER_FIELD);
        self.line(&hint);
        self.line("");
    }

    fn render(&mut self, timeline: &Timeline, change: TimelineChange) {
        let index = match change {
            TimelineChange::Appended(index) | TimelineChange::Updated(index) => index,
            TimelineChange::Ignored => return,
        };
        let Some(entry) = timeline.get(index) else {
            return;
        };
        match entry {
            // Typed input is already on screen.
            TimelineEntry::Chat {
                role: ChatRole::User,
                ..
            } => {}
            TimelineEntry::Chat {
                role: ChatRole::Assistant,
                content,
            } => {
                let rendered = render_markdown_for_terminal(content, self.color);
                self.line(&rendered);
                self.line("");
            }
            TimelineEntry::Tool {
                tool_name,
                status,
                output,
            } => self.render_tool(tool_name, *status, output.as_deref()),
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let label = self.paint(settings::LABEL_THINKING, settings::COLOR_THINKING);
            self.line(&label);
        }
    }

    async fn confirm(&mut self, prompt: &ConfirmationPrompt) -> bool {
        let label = if prompt.destructive {
            self.paint_bold(settings::LABEL_DESTRUCTIVE, settings::COLOR_DESTRUCTIVE)
        } else {
            self.paint(settings::LABEL_COMMAND, settings::COLOR_WARNING)
        };
        let command = single_line(&command_args(&prompt.command).join(" "), 200);
        self.line(&format!("{}{label} kubectl {command}", settings::INDENT_1));
        self.prompt(&format!("{}{}", settings::INDENT_1, settings::PROMPT_CONFIRM));
        match self.next_line().await {
            Some(answer) => is_affirmative(&answer),
            None => false,
        }
    }

    fn confirmation_expired(&mut self) {
        self.line("");
        let notice = self.paint(settings::NOTICE_CONFIRM_WITHDRAWN, settings::COLOR_WARNING);
        self.line(&notice);
    }

    async fn read_input(&mut self) -> Option<String> {
        let glyph = self.paint_bold(settings::GLYPH_USER, settings::COLOR_USER);
        self.prompt(&format!("{glyph} "));
        self.next_line().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(input: &'static str) -> TerminalFrontend<&'static [u8], Vec<u8>> {
        TerminalFrontend::new(input.as_bytes(), Vec::new(), false)
    }

    fn output(frontend: TerminalFrontend<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(frontend.into_output()).unwrap()
    }

    #[test]
    fn header_shows_context_cluster_namespace() {
        let mut frontend = plain("");
        frontend.header(&ClusterInfo {
            context: "kind-dev".into(),
            cluster: "kind-cluster".into(),
            namespace: "apps".into(),
        });
        let out = output(frontend);
        assert!(out.contains("context: kind-dev"), "{out}");
        assert!(out.contains("cluster: kind-cluster"), "{out}");
        assert!(out.contains("namespace: apps"), "{out}");
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn tool_output_preview_is_capped() {
        let mut frontend = plain("");
        let mut timeline = Timeline::new();
        let start = timeline.apply(&crate::agent::SessionEvent::ToolExecutionStart {
            tool_call_id: "c1".into(),
            tool_name: "run_kubectl".into(),
            arguments: json!({}),
        });
        frontend.render(&timeline, start);
        let long = "p".repeat(PREVIEW_CHARS + 7);
        let done = timeline.apply(&crate::agent::SessionEvent::ToolExecutionComplete {
            tool_call_id: "c1".into(),
            tool_name: "run_kubectl".into(),
            result: json!(long),
        });
        frontend.render(&timeline, done);

        let out = output(frontend);
        assert!(out.contains("> run_kubectl"), "{out}");
        assert!(out.contains("+ run_kubectl"), "{out}");
        assert!(out.contains("… +7 chars truncated"), "{out}");
    }

    #[test]
    fn user_entries_are_not_echoed_and_busy_shows_thinking() {
        let mut frontend = plain("");
        let mut timeline = Timeline::new();
        let change = timeline.push_chat(ChatRole::User, "list pods");
        frontend.render(&timeline, change);
        frontend.set_busy(true);
        frontend.set_busy(false);
        let change = timeline.push_chat(ChatRole::Assistant, "**two** pods");
        frontend.render(&timeline, change);

        let out = output(frontend);
        assert!(!out.contains("list pods"));
        assert_eq!(out.matches(settings::LABEL_THINKING).count(), 1);
        assert!(out.contains("two"));
    }

    #[tokio::test]
    async fn confirm_accepts_only_explicit_yes() {
        let prompt = ConfirmationPrompt {
            command: "delete deployment foo".into(),
            destructive: true,
        };
        for (input, expected) in [
            ("Y\n", true),
            ("yes\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
        ] {
            let mut frontend = plain(input);
            assert_eq!(frontend.confirm(&prompt).await, expected, "input {input:?}");
            let out = output(frontend);
            assert!(out.contains("kubectl delete deployment foo"), "{out}");
            assert!(out.contains("[y/N]"), "{out}");
        }
    }

    #[tokio::test]
    async fn confirm_shows_a_single_kubectl_prefix() {
        let prompt = ConfirmationPrompt {
            command: "kubectl delete pod web-0".into(),
            destructive: true,
        };
        let mut frontend = plain("n\n");
        assert!(!frontend.confirm(&prompt).await);
        let out = output(frontend);
        assert!(out.contains("kubectl delete pod web-0"), "{out}");
        assert!(!out.contains("kubectl kubectl"), "{out}");
    }

    #[tokio::test]
    async fn read_input_returns_lines_then_none() {
        let mut frontend = plain("get pods\nexit\n");
        assert_eq!(frontend.read_input().await.as_deref(), Some("get pods"));
        assert_eq!(frontend.read_input().await.as_deref(), Some("exit"));
        assert_eq!(frontend.read_input().await, None);
    }

    #[test]
    fn colored_output_carries_ansi_styling() {
        let mut frontend = TerminalFrontend::new(&b""[..], Vec::new(), true);
        frontend.set_busy(true);
        let out = String::from_utf8(frontend.into_output()).unwrap();
        assert!(out.contains('\u{1b}'));
    }
}
