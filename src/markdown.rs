use pulldown_cmark::{Options, Parser, html};

use crate::content::{ClipboardItem, CopyContent};

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

/// Rich content for a Markdown document: the rendered HTML, with the source
/// kept as the plain-text representation.
pub fn markdown_content(markdown: &str) -> CopyContent {
    ClipboardItem::with_html(markdown, render_html(markdown)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_emphasis() {
        assert_eq!(render_html("**A**"), "<p><strong>A</strong></p>\n");
    }

    #[test]
    fn test_render_task_list() {
        let html = render_html("- [x] done\n- [ ] open\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn test_markdown_content_keeps_source_as_text() {
        let content = markdown_content("# Title");
        assert_eq!(content.text(), "# Title");
        assert_eq!(content.html(), Some("<h1>Title</h1>\n"));
    }

    #[test]
    fn test_empty_markdown_is_plain() {
        let content = markdown_content("");
        assert_eq!(content.text(), "");
        assert!(!content.is_rich());
    }
}
