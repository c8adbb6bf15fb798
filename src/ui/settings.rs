//! Terminal glyphs, labels and colors in one place.

use crossterm::style::Color;

pub const INDENT_1: &str = "  ";
pub const INDENT_2: &str = "    ";

pub const LABEL_APP: &str = "kubemate";
pub const LABEL_THINKING: &str = "Thinking...";
pub const LABEL_DESTRUCTIVE: &str = "destructive command:";
pub const LABEL_COMMAND: &str = "command:";

pub const PROMPT_INPUT: &str = "> ";
pub const PROMPT_CONFIRM: &str = "Run it? [y/N] ";

pub const GLYPH_USER: &str = ">";
pub const GLYPH_TOOL_RUNNING: &str = "▶";
pub const GLYPH_TOOL_DONE: &str = "✓";
pub const GLYPH_TOOL_RUNNING_PLAIN: &str = ">";
pub const GLYPH_TOOL_DONE_PLAIN: &str = "+";

pub const HINT_STARTUP: &str = "Describe what you want to do with the cluster. Type `exit` to quit.";
pub const NOTICE_CONFIRM_WITHDRAWN: &str = "Confirmation expired; the command was not run.";

pub const COLOR_APP_LABEL: Color = Color::Cyan;
pub const COLOR_HEADER_FIELD: Color = Color::Grey;
pub const COLOR_HEADER_VALUE: Color = Color::White;
pub const COLOR_USER: Color = Color::DarkGrey;
pub const COLOR_TOOL_NAME: Color = Color::Blue;
pub const COLOR_TOOL_RUNNING: Color = Color::Yellow;
pub const COLOR_TOOL_DONE: Color = Color::Green;
pub const COLOR_TOOL_OUTPUT: Color = Color::Grey;
pub const COLOR_THINKING: Color = Color::DarkGrey;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_DESTRUCTIVE: Color = Color::Red;
