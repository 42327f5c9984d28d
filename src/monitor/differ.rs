use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// Unified line diff labelled `before`/`after`. Lines are joined with `\n`
/// and carry no terminators of their own.
pub fn unified_diff(previous: &str, current: &str) -> String {
    let diff = TextDiff::from_lines(previous, current);
    let mut lines = Vec::new();

    for hunk in diff.unified_diff().context_radius(CONTEXT_LINES).iter_hunks() {
        if lines.is_empty() {
            lines.push("--- before".to_string());
            lines.push("+++ after".to_string());
        }
        lines.push(hunk.header().to_string());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => ' ',
            };
            let value = change.value().trim_end_matches(['\r', '\n']);
            lines.push(format!("{sign}{value}"));
        }
    }

    lines.join("\n")
}
