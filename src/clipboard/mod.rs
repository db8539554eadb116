//! Host clipboard capabilities and the tiered writer built on top of them.
//!
//! A host exposes up to three ways of getting text onto the clipboard: a rich
//! write carrying several MIME representations, a plain-text write, and a
//! legacy selection-based copy command. Any of the first two may be missing.

pub mod system;
pub mod writer;

#[cfg(test)]
pub(crate) mod mock;

use anyhow::Result;
use async_trait::async_trait;

pub use system::SystemClipboard;
pub use writer::{ClipboardWriter, WriteTier};

pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_TEXT_HTML: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub mime: String,
    pub data: Vec<u8>,
}

/// One clipboard item holding several representations of the same content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    entries: Vec<ClipboardEntry>,
}

impl ClipboardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text and HTML side by side, in that order.
    pub fn rich(text: &str, html: &str) -> Self {
        Self::new()
            .with_entry(MIME_TEXT_PLAIN, text.as_bytes().to_vec())
            .with_entry(MIME_TEXT_HTML, html.as_bytes().to_vec())
    }

    pub fn with_entry(mut self, mime: impl Into<String>, data: Vec<u8>) -> Self {
        let mime = mime.into();
        self.entries.retain(|entry| entry.mime != mime);
        self.entries.push(ClipboardEntry { mime, data });
        self
    }

    pub fn get(&self, mime: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.mime == mime)
            .map(|entry| entry.data.as_slice())
    }

    pub fn get_str(&self, mime: &str) -> Option<&str> {
        self.get(mime).and_then(|data| std::str::from_utf8(data).ok())
    }
}

#[async_trait]
pub trait RichWrite: Send + Sync {
    async fn write(&self, payload: &ClipboardPayload) -> Result<()>;
}

#[async_trait]
pub trait PlainWrite: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub u64);

/// How a temporary editable region is presented while it holds the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStyle {
    pub fixed_position: bool,
    pub visible: bool,
    pub scrollable: bool,
}

impl RegionStyle {
    /// Pinned in place, invisible, and never scrolls the page.
    pub const OFFSCREEN: RegionStyle = RegionStyle {
        fixed_position: true,
        visible: false,
        scrollable: false,
    };
}

/// Selection-based primitives used by the legacy copy path.
#[async_trait]
pub trait LegacyDocument: Send + Sync {
    fn create_region(&self, text: &str, style: RegionStyle) -> Result<RegionId>;

    /// Focus the region and select its whole content.
    fn select_all(&self, region: RegionId) -> Result<()>;

    /// Copy the selection made in `region`. `Ok(false)` means the command
    /// ran and reported failure.
    async fn exec_copy(&self, region: RegionId) -> Result<bool>;

    fn remove_region(&self, region: RegionId);
}

/// Resolves which clipboard capabilities the host offers.
pub trait ClipboardEnv: Send + Sync {
    fn rich_write(&self) -> Option<&dyn RichWrite>;
    fn plain_write(&self) -> Option<&dyn PlainWrite>;
    fn document(&self) -> &dyn LegacyDocument;
}
