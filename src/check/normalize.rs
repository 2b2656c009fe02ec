//! Issue text normalization ahead of similarity scoring.

use std::sync::LazyLock;

use regex::Regex;

// Blocks opened at the start of a line take their whole first and last lines with them.
static FENCED_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*`{3}.*?`{3}[^\n]*").expect("valid fenced lines regex"));
static COMMENT_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*<!--.*?-->[^\n]*").expect("valid comment lines regex"));

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)`{3}.*?`{3}").expect("valid fenced block regex"));
static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid html comment regex"));
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").expect("valid url regex"));
static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\W_]+").expect("valid separator regex"));

/// Normalize an issue body for comparison.
///
/// Fenced code blocks, HTML comments, headings and blank lines are dropped, the rest is joined,
/// lowercased, stripped of URLs, and reduced to alphanumeric words separated by single spaces.
/// A line that opens a fence or a comment is dropped as a whole, as is the line that closes it.
/// The result is stable under repeated application.
pub fn normalize(text: &str) -> String {
    let text = FENCED_LINES.replace_all(text, "");
    let text = COMMENT_LINES.replace_all(&text, "");

    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !(line.is_empty() || line.starts_with("<!--") || line.starts_with("###") || line.starts_with("```")))
        .collect::<Vec<_>>()
        .join(" ");

    let joined = FENCED_BLOCK.replace_all(&joined, "");
    let joined = HTML_COMMENT.replace_all(&joined, "").to_lowercase();

    let joined = URL.replace_all(&joined, "");
    let joined = NON_ALPHANUMERIC.replace_all(&joined, " ");

    joined.trim().to_string()
}
