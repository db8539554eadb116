use serde::{Deserialize, Serialize};

/// Structured clipboard content: plain text plus an optional HTML alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardItem {
    /// Plain text, always written and used as the fallback.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ClipboardItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
        }
    }

    pub fn with_html(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: Some(html.into()),
        }
    }
}

/// What a caller asks to copy.
///
/// Deserializes from either a bare JSON string or an object with a `text`
/// field, which is the single shape check used to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CopyContent {
    Text(String),
    Item(ClipboardItem),
}

impl CopyContent {
    pub fn text(&self) -> &str {
        match self {
            CopyContent::Text(text) => text,
            CopyContent::Item(item) => &item.text,
        }
    }

    /// HTML alternative, if any. Empty HTML counts as absent.
    pub fn html(&self) -> Option<&str> {
        match self {
            CopyContent::Text(_) => None,
            CopyContent::Item(item) => item.html.as_deref().filter(|html| !html.is_empty()),
        }
    }

    pub fn is_rich(&self) -> bool {
        self.html().is_some()
    }
}

impl From<&str> for CopyContent {
    fn from(text: &str) -> Self {
        CopyContent::Text(text.to_string())
    }
}

impl From<String> for CopyContent {
    fn from(text: String) -> Self {
        CopyContent::Text(text)
    }
}

impl From<ClipboardItem> for CopyContent {
    fn from(item: ClipboardItem) -> Self {
        CopyContent::Item(item)
    }
}
