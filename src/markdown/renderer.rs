//! The regex substitution pipeline
//!
//! Every transformation runs over the output of the previous one, in a
//! fixed order: line breaks, fenced code blocks, inline code, lists,
//! headings, bold, italic. The order is load-bearing:
//!
//! - inline code must run after fenced blocks so a fence's backticks are
//!   already consumed;
//! - the 3-hash heading pattern must be tried before the 2- and 1-hash
//!   patterns;
//! - italic must run after bold so `**text**` is not parsed as two
//!   adjacent single-asterisk spans.
//!
//! The pipeline is permissive: unbalanced delimiters simply fail to
//! match and pass through as literal text. It is NOT idempotent;
//! rendering already-rendered HTML double-wraps list markup, so each
//! message must be rendered exactly once per content version (the
//! `page` module tracks this).

use regex::{Captures, Regex};
use std::sync::LazyLock;

// ─────────────────────────────────────────────────────────────────────────────
// Compiled Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Fenced code block: ```lang ... ``` (lazy, multiple blocks per input).
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\w*)((?s:.*?))```").expect("fenced block pattern"));

/// Inline code span: `...` (content excludes further backticks).
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+?)`").expect("inline code pattern"));

/// List item line: optional indent, `-` or `*`, required whitespace, content.
/// The trailing `<br>` inserted by newline normalization is dropped.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*][ \t]+(.+?)(?:<br>)?$").expect("list item pattern"));

/// A maximal run of adjacent list items, allowing whitespace between them.
static LIST_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<li>.*?</li>(?:\s*<li>.*?</li>)*").expect("list run pattern")
});

/// Heading lines. Three hashes are tried first, then two, then one, so a
/// deeper line is never claimed by a shallower pattern. Four or more
/// hashes match nothing and pass through as literal text.
static HEADING_H5: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^###[ \t]+(.+?)(?:<br>)?$").expect("h5 pattern"));
static HEADING_H4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+(.+?)(?:<br>)?$").expect("h4 pattern"));
static HEADING_H3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)(?:<br>)?$").expect("h3 pattern"));

/// Strong emphasis: **text** (content excludes asterisks).
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern"));

/// Italic emphasis: *text* (content excludes asterisks).
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern"));

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Render a message's raw content to display HTML.
///
/// Pure function: the caller owns placement of the result (typically
/// replacing a message container's inner HTML).
///
/// One-shot contract: the result must not be fed back through
/// `render_markdown`, see the module docs.
pub fn render_markdown(content: &str) -> String {
    let mut html = content.to_string();

    // 1. Newline normalization. Skipped when the content already carries
    //    block-level HTML from the server or from a previous rendering
    //    pass. A `<br>` is inserted before each newline; the newline
    //    itself is kept so the later line-oriented passes still see
    //    line boundaries.
    let already_html =
        html.contains("<p>") || html.contains("<br>") || html.contains("<div>");
    if !already_html {
        html = html.replace('\n', "<br>\n");
    }

    // 2. Fenced code blocks, gated on the literal delimiter being present.
    if html.contains("```") {
        html = FENCED_BLOCK
            .replace_all(&html, |caps: &Captures| {
                let language = &caps[1];
                // Undo the line breaks step 1 inserted inside the fence;
                // the emitted body is the trimmed original text.
                let body = if already_html {
                    caps[2].to_string()
                } else {
                    caps[2].replace("<br>", "")
                };
                format!(
                    "<pre class=\"code-block\"><code class=\"{}\">{}</code></pre>",
                    language,
                    body.trim()
                )
            })
            .into_owned();
    }

    // 3. Inline code. Runs strictly after the fence pass so a fence's
    //    backticks can no longer pair up with stray inline backticks.
    html = INLINE_CODE
        .replace_all(&html, "<code class=\"inline-code\">$1</code>")
        .into_owned();

    // 4. Lists: convert item lines, then wrap each maximal run of
    //    adjacent items in a single <ul>. Runs separated by other
    //    content get separate containers.
    html = LIST_ITEM.replace_all(&html, "<li>$1</li>").into_owned();
    html = LIST_RUN.replace_all(&html, "<ul>${0}</ul>").into_owned();

    // 5. Headings: # ## ### map to h3 h4 h5; deeper runs fall through.
    html = HEADING_H5.replace_all(&html, "<h5>$1</h5>").into_owned();
    html = HEADING_H4.replace_all(&html, "<h4>$1</h4>").into_owned();
    html = HEADING_H3.replace_all(&html, "<h3>$1</h3>").into_owned();

    // 6. Bold before 7. italic, so double asterisks are consumed first.
    html = BOLD.replace_all(&html, "<strong>$1</strong>").into_owned();
    html = ITALIC.replace_all(&html, "<em>$1</em>").into_owned();

    html
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Newline normalization
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_newlines_become_line_breaks() {
        let html = render_markdown("first\nsecond");
        assert_eq!(html, "first<br>\nsecond");
    }

    #[test]
    fn test_newlines_skipped_when_paragraph_markup_present() {
        let input = "<p>first</p>\nsecond";
        assert_eq!(render_markdown(input), input);
    }

    #[test]
    fn test_newlines_skipped_when_br_present() {
        let input = "first<br>\nsecond";
        assert_eq!(render_markdown(input), input);
    }

    #[test]
    fn test_newlines_skipped_when_div_present() {
        let input = "<div>first</div>\nsecond";
        assert_eq!(render_markdown(input), input);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Code
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_inline_code() {
        let html = render_markdown("`code`");
        assert_eq!(html, "<code class=\"inline-code\">code</code>");
    }

    #[test]
    fn test_inline_code_single_span_only() {
        let html = render_markdown("use `x` here");
        assert_eq!(html.matches("<code class=\"inline-code\">").count(), 1);
        assert!(html.contains("<code class=\"inline-code\">x</code>"));
    }

    #[test]
    fn test_fenced_block_with_language() {
        let html = render_markdown("```js\nconst x=1;\n```");
        assert_eq!(
            html,
            "<pre class=\"code-block\"><code class=\"js\">const x=1;</code></pre>"
        );
    }

    #[test]
    fn test_fenced_block_without_language() {
        let html = render_markdown("```\ncode\n```");
        assert_eq!(
            html,
            "<pre class=\"code-block\"><code class=\"\">code</code></pre>"
        );
    }

    #[test]
    fn test_fenced_block_keeps_inner_newlines() {
        let html = render_markdown("```py\na = 1\nb = 2\n```");
        assert!(html.contains("a = 1\nb = 2"));
    }

    #[test]
    fn test_multiple_fenced_blocks() {
        let html = render_markdown("```js\none\n```\nmiddle\n```py\ntwo\n```");
        assert_eq!(html.matches("<pre class=\"code-block\">").count(), 2);
        assert!(html.contains("<code class=\"js\">one</code>"));
        assert!(html.contains("<code class=\"py\">two</code>"));
    }

    #[test]
    fn test_inline_code_not_reprocessed_inside_fence_markup() {
        // The fence consumes its backticks before the inline pass runs
        let html = render_markdown("```js\nx\n``` and `y`");
        assert_eq!(html.matches("<code class=\"inline-code\">").count(), 1);
        assert!(html.contains("<code class=\"inline-code\">y</code>"));
    }

    #[test]
    fn test_unbalanced_backtick_passes_through() {
        let html = render_markdown("an `unterminated span");
        assert!(html.contains("`unterminated"));
        assert!(!html.contains("<code"));
    }

    #[test]
    fn test_unterminated_fence_passes_through() {
        let html = render_markdown("```js\nno closing fence");
        assert!(!html.contains("<pre"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_adjacent_items_share_one_container() {
        let html = render_markdown("- a\n- b");
        assert_eq!(html, "<ul><li>a</li>\n<li>b</li></ul>");
    }

    #[test]
    fn test_asterisk_list_marker() {
        let html = render_markdown("* a\n* b");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert!(html.contains("<li>a</li>"));
        assert!(html.contains("<li>b</li>"));
    }

    #[test]
    fn test_indented_list_items() {
        let html = render_markdown("  - a");
        assert!(html.contains("<li>a</li>"));
    }

    #[test]
    fn test_separated_runs_get_separate_containers() {
        let html = render_markdown("- a\nplain text\n- b");
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("plain text"));
    }

    #[test]
    fn test_marker_without_trailing_whitespace_is_not_an_item() {
        let html = render_markdown("-not a list");
        assert!(!html.contains("<li>"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Headings
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_levels_shift_down_two() {
        assert_eq!(render_markdown("# Title"), "<h3>Title</h3>");
        assert_eq!(render_markdown("## Title"), "<h4>Title</h4>");
        assert_eq!(render_markdown("### Title"), "<h5>Title</h5>");
    }

    #[test]
    fn test_four_hashes_fall_through_unmatched() {
        let input = "#### Title";
        assert_eq!(render_markdown(input), input);
    }

    #[test]
    fn test_heading_requires_space_after_hashes() {
        let input = "#Title";
        assert_eq!(render_markdown(input), input);
    }

    #[test]
    fn test_heading_on_own_line() {
        let html = render_markdown("intro\n## Section\noutro");
        assert!(html.contains("<h4>Section</h4>"));
        assert!(html.contains("intro<br>"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Emphasis
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_and_italic_without_cross_contamination() {
        let html = render_markdown("**bold** and *italic*");
        assert_eq!(html, "<strong>bold</strong> and <em>italic</em>");
    }

    #[test]
    fn test_bold_alone_does_not_trigger_italic() {
        let html = render_markdown("**bold**");
        assert_eq!(html, "<strong>bold</strong>");
    }

    #[test]
    fn test_unclosed_emphasis_passes_through() {
        let input = "a ** b";
        assert_eq!(render_markdown(input), input);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline contract
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_rendering_twice_double_wraps_lists() {
        let once = render_markdown("- a");
        assert_eq!(once, "<ul><li>a</li></ul>");

        // The pipeline is not idempotent: each content version must be
        // rendered exactly once.
        let twice = render_markdown(&once);
        assert_eq!(twice, "<ul><ul><li>a</li></ul></ul>");
    }

    #[test]
    fn test_mixed_document() {
        let html = render_markdown("# Intro\nUse `x` for **speed**:\n- fast\n- safe");
        assert!(html.contains("<h3>Intro</h3>"));
        assert!(html.contains("<code class=\"inline-code\">x</code>"));
        assert!(html.contains("<strong>speed</strong>"));
        assert_eq!(html.matches("<ul>").count(), 1);
        assert!(html.contains("<li>fast</li>"));
        assert!(html.contains("<li>safe</li>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }
}
