//! Destructive-command detection for cluster CLI invocations.

/// Verbs that remove or evict workloads and therefore need operator approval.
pub const DESTRUCTIVE_KEYWORDS: &[&str] = &["delete", "drain", "cordon", "taint", "replace"];

/// Return true when any whitespace-separated token of `command` is a
/// destructive verb.
///
/// Matching is whole-token and case-sensitive, so `pods-deleted` is safe.
pub fn classify(command: &str) -> bool {
    command
        .split_whitespace()
        .any(|token| DESTRUCTIVE_KEYWORDS.contains(&token))
}
