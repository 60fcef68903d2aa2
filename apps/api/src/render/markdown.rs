//! Markdown-to-HTML for model output. Not a full Markdown parser: only the
//! constructs the counseling prompts ask for are recognized.
//!
//! Single pass over lines, tracking whether a `<ul>` is open:
//! - a trimmed line starting with `* ` is a list item, opening `<ul>` if needed
//! - any other line closes an open list, then is rendered as a heading or text
//! - `**text**` becomes `<strong>` (first `**` to last `**` on the line)
//! - non-list lines are newline-separated; `render` turns newlines into `<br>`
//!
//! Model text is HTML-escaped before any markup is added.

/// Renders `markdown` to an HTML fragment.
pub fn render(markdown: &str) -> String {
    render_structure(markdown).replace('\n', "<br>")
}

/// Block structure with newlines still in place.
pub fn render_structure(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + 64);
    let mut in_list = false;
    let mut lines = markdown.split('\n').peekable();

    while let Some(raw) = lines.next() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(item) = line.trim().strip_prefix("* ") {
            if !in_list {
                out.push_str("<ul>");
                in_list = true;
            }
            out.push_str("<li>");
            out.push_str(&inline(item));
            out.push_str("</li>");
            continue;
        }

        if in_list {
            out.push_str("</ul>");
            in_list = false;
        }
        out.push_str(&block(line));
        if lines.peek().is_some() {
            out.push('\n');
        }
    }

    if in_list {
        out.push_str("</ul>");
    }
    out
}

fn block(line: &str) -> String {
    const HEADINGS: [(&str, &str); 3] = [("### ", "h3"), ("## ", "h2"), ("# ", "h1")];

    for (prefix, tag) in HEADINGS {
        if let Some(text) = line.strip_prefix(prefix) {
            return format!("<{tag}>{}</{tag}>", inline(text));
        }
    }
    inline(line)
}

fn inline(text: &str) -> String {
    let escaped = escape_html(text);
    match (escaped.find("**"), escaped.rfind("**")) {
        (Some(open), Some(close)) if close >= open + 2 => format!(
            "{}<strong>{}</strong>{}",
            &escaped[..open],
            &escaped[open + 2..close],
            &escaped[close + 2..]
        ),
        _ => escaped,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_list_blocks_do_not_merge() {
        assert_eq!(
            render_structure("* a\n* b\ntext\n* c"),
            "<ul><li>a</li><li>b</li></ul>text\n<ul><li>c</li></ul>"
        );
    }

    #[test]
    fn test_list_at_end_of_text_is_closed() {
        assert_eq!(render("intro\n* last"), "intro<br><ul><li>last</li></ul>");
    }

    #[test]
    fn test_indented_list_items() {
        assert_eq!(render_structure("   * x"), "<ul><li>x</li></ul>");
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            render("# One\n## Two\n### Three"),
            "<h1>One</h1><br><h2>Two</h2><br><h3>Three</h3>"
        );
    }

    #[test]
    fn test_heading_after_list_is_still_a_heading() {
        assert_eq!(
            render_structure("* item\n## Next"),
            "<ul><li>item</li></ul><h2>Next</h2>"
        );
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(render("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_bold_is_greedy_within_a_line() {
        assert_eq!(
            render("**a** and **b**"),
            "<strong>a** and **b</strong>"
        );
        assert_eq!(render("no ** pair"), "no ** pair");
    }

    #[test]
    fn test_bold_inside_headings_and_items() {
        assert_eq!(
            render_structure("## **Reach** Schools\n* **TUM** - Informatics"),
            "<h2><strong>Reach</strong> Schools</h2>\n<ul><li><strong>TUM</strong> - Informatics</li></ul>"
        );
    }

    #[test]
    fn test_blank_lines_become_breaks() {
        assert_eq!(render("para one\n\npara two"), "para one<br><br>para two");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(render_structure("a\r\n* b\r\n"), "a\n<ul><li>b</li></ul>");
    }

    #[test]
    fn test_model_html_is_escaped() {
        assert_eq!(
            render("<script>alert(1)</script> & co"),
            "&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let input = "## 📊 Profile Assessment\nHi **Test**,\n* IELTS 7.0\n* SAT 1450\n\nDone";
        let first = render(input);
        for _ in 0..10 {
            assert_eq!(render(input), first);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
