use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Canonical form used for hashing and comparison: non-breaking spaces become
/// spaces, whitespace runs (newlines included) collapse to one space, ends trimmed.
pub fn normalize(raw: &str) -> String {
    let spaced = raw.replace('\u{00a0}', " ");
    WHITESPACE_REGEX
        .replace_all(&spaced, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(normalize("Hello   world"), "Hello world");
        assert_eq!(normalize("\n\n  Score:\t3-2 \r\n\n"), "Score: 3-2");
    }

    #[test]
    fn non_breaking_spaces_count_as_whitespace() {
        assert_eq!(normalize("Game\u{00a0}\u{00a0}on"), "Game on");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\u{00a0}\t"), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "plain",
            "  a  b\n\nc ",
            "\u{00a0}x\u{00a0}\u{00a0}y\u{2003}z",
            "line one\r\nline two\n\n\nline three",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input {sample:?}");
        }
    }

    #[test]
    fn content_differences_survive() {
        assert_ne!(normalize("Score: 3-2"), normalize("Score: 4-2"));
        assert_eq!(normalize("Score:  3-2\n"), normalize("Score: 3-2"));
    }
}
