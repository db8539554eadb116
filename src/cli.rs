use anyhow::{Context, Result};
use clap::Parser;

use clip_feedback::markdown::markdown_content;
use clip_feedback::{ClipboardItem, CopyContent};

#[derive(Parser, Debug)]
#[command(name = "clipfb")]
#[command(version, about = "Copy text or rich content to the clipboard", long_about = None)]
pub struct Cli {
    /// Text to copy. Read from stdin when omitted.
    pub text: Option<String>,

    /// HTML representation to copy alongside the text
    #[arg(long, conflicts_with_all = ["markdown", "json"])]
    pub html: Option<String>,

    /// Treat the input as Markdown and copy the rendered HTML with it
    #[arg(short, long, conflicts_with = "json")]
    pub markdown: bool,

    /// Parse the input as JSON: a string or {"text": ..., "html": ...}
    #[arg(long)]
    pub json: bool,

    /// Copy plain text only, dropping any HTML
    #[arg(long)]
    pub plain: bool,

    /// Milliseconds the copied status lasts (0 = until reset)
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Stay running until the copied status resets
    #[arg(short, long)]
    pub wait: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn build_content(&self, input: String, rich_text: bool) -> Result<CopyContent> {
        let content: CopyContent = if self.json {
            serde_json::from_str(&input).context("Input is not valid JSON copy content")?
        } else if self.markdown {
            markdown_content(&input)
        } else if let Some(html) = &self.html {
            ClipboardItem::with_html(input, html.clone()).into()
        } else {
            CopyContent::Text(input)
        };

        if self.plain || !rich_text {
            return Ok(CopyContent::Text(content.text().to_string()));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clipfb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_plain_text() {
        let cli = parse(&["hello"]);
        let content = cli.build_content("hello".to_string(), true).unwrap();
        assert_eq!(content, CopyContent::Text("hello".to_string()));
    }

    #[test]
    fn test_html_flag() {
        let cli = parse(&["A", "--html", "<b>A</b>"]);
        let content = cli.build_content("A".to_string(), true).unwrap();
        assert_eq!(content, ClipboardItem::with_html("A", "<b>A</b>").into());
    }

    #[test]
    fn test_markdown_flag() {
        let cli = parse(&["--markdown"]);
        let content = cli.build_content("**A**".to_string(), true).unwrap();
        assert_eq!(content.text(), "**A**");
        assert_eq!(content.html(), Some("<p><strong>A</strong></p>\n"));
    }

    #[test]
    fn test_json_flag() {
        let cli = parse(&["--json"]);
        let content = cli
            .build_content(r#"{"text": "A", "html": "<i>A</i>"}"#.to_string(), true)
            .unwrap();
        assert_eq!(content, ClipboardItem::with_html("A", "<i>A</i>").into());

        assert!(cli.build_content("not json".to_string(), true).is_err());
    }

    #[test]
    fn test_rich_text_disabled_drops_html() {
        let cli = parse(&["A", "--html", "<b>A</b>"]);
        let content = cli.build_content("A".to_string(), false).unwrap();
        assert_eq!(content, CopyContent::Text("A".to_string()));

        let plain = parse(&["A", "--html", "<b>A</b>", "--plain"]);
        let content = plain.build_content("A".to_string(), true).unwrap();
        assert!(!content.is_rich());
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        let result = Cli::try_parse_from(["clipfb", "--markdown", "--json"]);
        assert!(result.is_err());
    }
}
