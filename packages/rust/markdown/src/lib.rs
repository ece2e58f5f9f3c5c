//! Restricted Markdown → HTML rendering for the biography page.
//!
//! The dialect is small: blank lines separate paragraphs and
//! `[text](url)` makes a link. Everything else, raw HTML included, passes
//! through untouched so authors can hand-write markup where they need it.

mod inline;

use tracing::debug;

/// Render biography Markdown to a sequence of `<p>` elements joined by newlines.
pub fn render_bio(text: &str) -> String {
    let paragraphs = split_paragraphs(text);

    let html = paragraphs
        .iter()
        .map(|para| format!("<p>{}</p>", inline::run_pipeline(para)))
        .collect::<Vec<_>>()
        .join("\n");

    debug!(paragraphs = paragraphs.len(), html_len = html.len(), "rendered biography");
    html
}

/// Split on blank (whitespace-only) lines.
///
/// Line breaks inside a paragraph become spaces; only the paragraph as a whole
/// is trimmed, so indentation on continuation lines is kept.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
            continue;
        }
        current.push(line);
    }
    flush_paragraph(&mut current, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" ").trim().to_string());
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render_bio(""), "");
        assert_eq!(render_bio("\n  \n\t\n"), "");
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let md = "First paragraph\ncontinues here.\n\nSecond paragraph.\n";
        assert_eq!(
            render_bio(md),
            "<p>First paragraph continues here.</p>\n<p>Second paragraph.</p>"
        );
    }

    #[test]
    fn whitespace_only_lines_and_crlf_separate_paragraphs() {
        let md = "One.\r\n   \r\nTwo.\r\n\r\n\r\nThree.";
        assert_eq!(render_bio(md), "<p>One.</p>\n<p>Two.</p>\n<p>Three.</p>");
    }

    #[test]
    fn links_are_rendered_inside_paragraphs() {
        let md = "I teach at [the University](https://example.edu)\nand blog [here](/blog).";
        assert_eq!(
            render_bio(md),
            r#"<p>I teach at <a href="https://example.edu">the University</a> and blog <a href="/blog">here</a>.</p>"#
        );
    }

    #[test]
    fn continuation_indent_is_kept_but_paragraph_is_trimmed() {
        let md = "  Lead line\n    indented continuation  \n\nNext.";
        assert_eq!(
            render_bio(md),
            "<p>Lead line     indented continuation</p>\n<p>Next.</p>"
        );
    }

    #[test]
    fn raw_html_passes_through() {
        let md = "Contact: <em>by email</em>.";
        assert_eq!(render_bio(md), "<p>Contact: <em>by email</em>.</p>");
    }
}
