//! Inline passes applied to each paragraph.

use std::sync::LazyLock;

use regex::Regex;

/// Run every inline pass over one paragraph.
pub(crate) fn run_pipeline(text: &str) -> String {
    render_links(text)
}

/// `[text](url)` → `<a href="url">text</a>`.
fn render_links(text: &str) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

    LINK_RE
        .replace_all(text, r#"<a href="$2">$1</a>"#)
        .into_owned()
}
