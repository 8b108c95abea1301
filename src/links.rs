//! Markdown link extraction.

use crate::types::Link;
use regex::Regex;
use std::sync::LazyLock;

// Groups: optional `!` (images are dropped), title, target. Titles may hold
// one level of brackets and targets one level of parentheses; a quoted link
// title after the target is matched but not captured. Links never span lines.
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(!?)\[((?:[^\[\]\n]|\[[^\[\]\n]*\])*)\]\([ \t]*((?:[^()\s]|\([^()\s]*\))*)(?:[ \t]+(?:"[^"\n]*"|'[^'\n]*'))?[ \t]*\)"#,
    )
    .expect("valid link regex")
});

/// Extract every `[title](target)` link in order of appearance.
///
/// Images (`![alt](src)`) are not links to tasks and are skipped.
pub fn extract_links(contents: &str) -> Vec<Link> {
    MARKDOWN_LINK_RE
        .captures_iter(contents)
        .filter(|caps| caps[1].is_empty())
        .map(|caps| Link {
            title: caps[2].to_string(),
            target: caps[3].trim().to_string(),
        })
        .collect()
}

/// True for targets carrying a URL scheme, e.g. `https://...`.
pub fn is_external(target: &str) -> bool {
    target.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
    })
}
