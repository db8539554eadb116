use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{ClipboardEnv, ClipboardPayload, LegacyDocument, RegionId, RegionStyle, SystemClipboard};
use crate::content::CopyContent;
use crate::error::CopyError;

/// Mechanism that ended up placing the content on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTier {
    Rich,
    Plain,
    Legacy,
}

impl fmt::Display for WriteTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteTier::Rich => "rich",
            WriteTier::Plain => "plain-text",
            WriteTier::Legacy => "legacy",
        };
        write!(f, "{name}")
    }
}

/// Writes content through the best capability the host offers.
///
/// Order of preference: rich write (only for content with HTML), plain-text
/// write, then the legacy copy command when no plain-text write exists.
/// A rich-write failure falls through silently; a plain-text failure is final.
#[derive(Clone)]
pub struct ClipboardWriter {
    env: Arc<dyn ClipboardEnv>,
}

impl ClipboardWriter {
    pub fn new(env: Arc<dyn ClipboardEnv>) -> Self {
        Self { env }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClipboard::new()))
    }

    pub async fn write(&self, content: &CopyContent) -> Result<WriteTier, CopyError> {
        let text = content.text();

        if let (Some(html), Some(rich)) = (content.html(), self.env.rich_write()) {
            let payload = ClipboardPayload::rich(text, html);
            match rich.write(&payload).await {
                Ok(()) => {
                    debug!(tier = %WriteTier::Rich, "Content copied to clipboard");
                    return Ok(WriteTier::Rich);
                }
                Err(e) => {
                    debug!(error = %e, "Rich clipboard write failed, falling back to plain text");
                }
            }
        }

        if let Some(plain) = self.env.plain_write() {
            plain.write_text(text).await.map_err(CopyError::normalize)?;
            debug!(tier = %WriteTier::Plain, "Content copied to clipboard");
            return Ok(WriteTier::Plain);
        }

        debug!("No plain-text clipboard write available, using legacy copy command");
        legacy_copy(self.env.document(), text).await?;
        debug!(tier = %WriteTier::Legacy, "Content copied to clipboard");
        Ok(WriteTier::Legacy)
    }
}

impl fmt::Debug for ClipboardWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardWriter").finish_non_exhaustive()
    }
}

/// A temporary region that is removed from the document when dropped.
struct StagedRegion<'a> {
    document: &'a dyn LegacyDocument,
    id: RegionId,
}

impl<'a> StagedRegion<'a> {
    fn create(document: &'a dyn LegacyDocument, text: &str) -> Result<Self, CopyError> {
        let id = document
            .create_region(text, RegionStyle::OFFSCREEN)
            .map_err(CopyError::normalize)?;
        Ok(Self { document, id })
    }
}

impl Drop for StagedRegion<'_> {
    fn drop(&mut self) {
        self.document.remove_region(self.id);
    }
}

async fn legacy_copy(document: &dyn LegacyDocument, text: &str) -> Result<(), CopyError> {
    let region = StagedRegion::create(document, text)?;
    document.select_all(region.id).map_err(CopyError::normalize)?;

    match document.exec_copy(region.id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(CopyError::CommandFailed),
        Err(e) => Err(CopyError::normalize(e)),
    }
}
