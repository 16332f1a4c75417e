//! Cleaning text copied out of the numbered code view.
//!
//! The view paints a line-number label before each line, so a drag selection
//! can pick up `"12    "` prefixes or bare `"12"` lines. Labels are recognised
//! by a digit run followed by whitespace at the start of a line. The gutter
//! width is taken as the narrowest label separator in the selection, so
//! indentation beyond it is kept as code.
//!
//! Code whose first token really is an integer followed by whitespace looks
//! exactly like a label and is stripped the same way.

use std::sync::OnceLock;

use regex::Regex;

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| Regex::new(r"^(\s*)(\d+)(\s+)(.*)$").expect("Invalid label regex"))
}

fn digits_regex() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^\d+$").expect("Invalid digits regex"))
}

fn blank_run_regex() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("Invalid newline regex"))
}

/// A line that starts with a line-number label
struct Labelled<'a> {
    leading: &'a str,
    separator: &'a str,
    rest: &'a str,
}

impl<'a> Labelled<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = label_regex().captures(line)?;
        Some(Self {
            leading: caps.get(1).map_or("", |m| m.as_str()),
            separator: caps.get(3).map_or("", |m| m.as_str()),
            rest: caps.get(4).map_or("", |m| m.as_str()),
        })
    }

    fn separator_width(&self) -> usize {
        self.separator.chars().count()
    }

    fn has_code(&self) -> bool {
        !self.rest.trim().is_empty()
    }

    /// Leading whitespace plus the code, dropping `gutter` separator characters
    fn strip(&self, gutter: usize) -> String {
        let kept_indent = self
            .separator
            .char_indices()
            .nth(gutter)
            .map_or("", |(index, _)| &self.separator[index..]);
        format!("{}{}{}", self.leading, kept_indent, self.rest)
    }
}

/// Turn a raw selection from the code view into clean code text.
///
/// Indentation inside lines is preserved; only the result as a whole is
/// trimmed, and runs of three or more newlines shrink to one blank line.
pub fn sanitize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let lines: Vec<&str> = text.split('\n').collect();
    let labelled: Vec<Option<Labelled>> = lines.iter().map(|line| Labelled::parse(line)).collect();

    let gutter = labelled
        .iter()
        .flatten()
        .filter(|label| label.has_code())
        .map(Labelled::separator_width)
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    for (line, label) in lines.iter().zip(&labelled) {
        match label {
            Some(label) if label.has_code() => cleaned.push(label.strip(gutter)),
            // A label with nothing after it
            Some(_) => {}
            None if digits_regex().is_match(line.trim()) => {}
            None => cleaned.push((*line).to_string()),
        }
    }

    let joined = cleaned.join("\n");
    blank_run_regex()
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_strips_labels_and_keeps_relative_indentation() {
        let raw = "1    function f() {\n2        return 1;\n3    }";
        assert_eq!(sanitize(raw), "function f() {\n    return 1;\n}");
    }

    #[test]
    fn test_drops_trailing_stray_label() {
        let raw = "4    if (x) {\n5        y();\n    }\n6";
        assert_eq!(sanitize(raw), "if (x) {\n    y();\n    }");
    }

    #[test]
    fn test_drops_label_with_only_whitespace_after_it() {
        let raw = "10    let a = 1;\n11    \n12    let b = 2;";
        assert_eq!(sanitize(raw), "let a = 1;\nlet b = 2;");
    }

    #[test]
    fn test_unlabelled_lines_are_verbatim() {
        let raw = "fn main() {\n    println!(\"hi\");\n}";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_mixed_labelled_and_plain_lines() {
        let raw = "7    match x {\n        Some(v) => v,\n        None => 0,\n8    }";
        assert_eq!(
            sanitize(raw),
            "match x {\n        Some(v) => v,\n        None => 0,\n}"
        );
    }

    #[test]
    fn test_collapses_long_blank_runs_to_one_blank_line() {
        let raw = "a();\n\n\n\n\nb();\n\nc();";
        assert_eq!(sanitize(raw), "a();\n\nb();\n\nc();");
    }

    #[test]
    fn test_trims_only_the_whole_result() {
        let raw = "\n\n    first();\n        second();\n\n";
        assert_eq!(sanitize(raw), "first();\n        second();");
    }

    #[test]
    fn test_windows_line_endings() {
        let raw = "1    a();\r\n2    b();\r\n";
        assert_eq!(sanitize(raw), "a();\nb();");
    }

    #[test]
    fn test_right_aligned_labels_keep_leading_whitespace() {
        let raw = " 9    x = 1\n10    y = 2";
        assert_eq!(sanitize(raw), "x = 1\ny = 2");
    }

    /// Known limitation: a statement that begins with a bare integer and a
    /// space is indistinguishable from a label and loses the integer.
    #[test]
    fn test_leading_integer_code_is_stripped_as_label() {
        assert_eq!(sanitize("42 if true"), "if true");
    }

    #[rstest]
    #[case("")]
    #[case("x")]
    #[case("  indented();\n\tmore();")]
    #[case("a\n\n\n\nb")]
    #[case("fn f() {\n    return 0;\n}\n")]
    #[case("\n\nlet y = x + 1;\n\n")]
    fn test_idempotent_on_label_free_input(#[case] raw: &str) {
        let once = sanitize(raw);
        assert_eq!(sanitize(&once), once);
    }

    #[rstest]
    #[case("6")]
    #[case("  42  ")]
    #[case("1\n2\n3")]
    fn test_labels_alone_sanitize_to_empty(#[case] raw: &str) {
        assert_eq!(sanitize(raw), "");
    }
}
