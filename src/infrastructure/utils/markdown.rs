use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};

/// Converts Markdown content to sanitized HTML.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::all());

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

/// Removes scripts, event handlers and relative links from rendered HTML.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

/// Escapes user text for an HTML body, keeping line breaks as `<br>`.
pub fn text_to_html(text: &str) -> String {
    text.lines()
        .map(ammonia::clean_text)
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_and_drops_scripts() {
        let html = safe_markdown_to_html("**Hi** <script>alert(1)</script>");
        assert!(html.contains("<strong>Hi</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn links_get_safe_rel() {
        let html = safe_markdown_to_html("[site](https://example.com)");
        assert!(html.contains(r#"rel="nofollow noopener noreferrer""#));
    }

    #[test]
    fn plain_text_is_escaped_line_by_line() {
        assert_eq!(text_to_html("a < b\nok"), "a&#32;&lt;&#32;b<br>ok");
    }
}
