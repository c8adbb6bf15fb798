//! Markdown-to-terminal rendering helpers.
//!
//! We use `termimad` because it produces terminal-friendly markdown layout
//! (lists, headings, code fences, tables) without requiring a full TUI view.

use termimad::MadSkin;

/// Render markdown into terminal text with structure preserved.
///
/// With `color` off the output carries no ANSI styling.
pub fn render_markdown_for_terminal(input: &str, color: bool) -> String {
    let skin = if color {
        MadSkin::default()
    } else {
        MadSkin::no_style()
    };
    let formatted = skin.text(input, None).to_string();
    formatted.trim_end_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_list_layout() {
        let md = "# Pods\n\n- web-1\n- web-2";
        let out = render_markdown_for_terminal(md, false);
        assert!(out.contains("Pods"));
        assert!(out.contains("web-1"));
        assert!(out.contains("web-2"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn keeps_code_content() {
        let md = "```bash\nkubectl get pods -n kube-system\n```";
        let out = render_markdown_for_terminal(md, false);
        assert!(out.contains("kubectl get pods -n kube-system"));
    }
}
