//! Clipboard host backed by the operating system.
//!
//! Rich and plain-text writes go through arboard. When arboard cannot reach a
//! clipboard (no display server, headless session) the plain-text capability
//! is reported as absent and the legacy path takes over: text is staged in a
//! temporary file which is then fed to the first copy command that runs
//! (pbcopy, wl-copy, xclip, xsel, clip).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use arboard::Clipboard;
use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{
    ClipboardEnv, ClipboardPayload, LegacyDocument, MIME_TEXT_HTML, MIME_TEXT_PLAIN, PlainWrite,
    RegionId, RegionStyle, RichWrite,
};

/// How long a write keeps clipboard ownership so a clipboard manager can
/// take over before the handle is dropped. Only used on Linux.
pub const DEFAULT_HANDOFF: Duration = Duration::from_millis(250);

/// arboard-backed rich and plain-text writes.
#[derive(Debug, Clone, Copy)]
pub struct NativeClipboard {
    handoff: Duration,
}

impl NativeClipboard {
    /// Returns `None` when no system clipboard can be opened.
    pub fn probe(handoff: Duration) -> Option<Self> {
        match Clipboard::new() {
            Ok(_) => Some(Self { handoff }),
            Err(e) => {
                debug!(error = %e, "System clipboard unavailable");
                None
            }
        }
    }

    pub fn handoff(&self) -> Duration {
        self.handoff
    }
}

fn open_clipboard() -> Result<Clipboard> {
    Clipboard::new().context("Failed to access system clipboard")
}

// On Linux the selection is served by this process, so the handle is held
// until a clipboard manager claims the content or the handoff expires.
#[cfg(target_os = "linux")]
fn set_html(handoff: Duration, html: String, text: Option<String>) -> Result<()> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    open_clipboard()?
        .set()
        .wait_until(Instant::now() + handoff)
        .html(html, text)
        .context("Failed to copy HTML to clipboard")
}

#[cfg(not(target_os = "linux"))]
fn set_html(_handoff: Duration, html: String, text: Option<String>) -> Result<()> {
    open_clipboard()?
        .set_html(html, text)
        .context("Failed to copy HTML to clipboard")
}

#[cfg(target_os = "linux")]
fn set_text(handoff: Duration, text: String) -> Result<()> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    open_clipboard()?
        .set()
        .wait_until(Instant::now() + handoff)
        .text(text)
        .context("Failed to copy text to clipboard")
}

#[cfg(not(target_os = "linux"))]
fn set_text(_handoff: Duration, text: String) -> Result<()> {
    open_clipboard()?
        .set_text(text)
        .context("Failed to copy text to clipboard")
}

#[async_trait]
impl RichWrite for NativeClipboard {
    async fn write(&self, payload: &ClipboardPayload) -> Result<()> {
        let html = payload
            .get_str(MIME_TEXT_HTML)
            .ok_or_else(|| anyhow!("Clipboard payload has no {MIME_TEXT_HTML} entry"))?
            .to_string();
        let text = payload.get_str(MIME_TEXT_PLAIN).map(str::to_string);
        let handoff = self.handoff;

        tokio::task::spawn_blocking(move || set_html(handoff, html, text))
            .await
            .context("Clipboard task panicked")?
    }
}

#[async_trait]
impl PlainWrite for NativeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        let handoff = self.handoff;

        tokio::task::spawn_blocking(move || set_text(handoff, text))
            .await
            .context("Clipboard task panicked")?
    }
}

/// An external program that copies whatever it reads on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LegacyCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Parse a whitespace-separated command line such as `xclip -selection clipboard`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }

    /// Platform search order.
    pub fn defaults() -> Vec<Self> {
        if cfg!(target_os = "macos") {
            vec![Self::new("pbcopy", &[])]
        } else if cfg!(windows) {
            vec![Self::new("clip", &[])]
        } else {
            vec![
                Self::new("wl-copy", &["--type", "text/plain"]),
                Self::new("xclip", &["-selection", "clipboard", "-in"]),
                Self::new("xsel", &["--clipboard", "--input"]),
            ]
        }
    }
}

impl fmt::Display for LegacyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Legacy copy path: regions are temporary files, selecting a region marks
/// it ready, and the copy command pipes that region's file into a tool.
pub struct CommandDocument {
    commands: Vec<LegacyCommand>,
    regions: Mutex<HashMap<RegionId, NamedTempFile>>,
    selected: Mutex<HashSet<RegionId>>,
    next_id: AtomicU64,
}

impl CommandDocument {
    pub fn new(commands: Vec<LegacyCommand>) -> Self {
        Self {
            commands,
            regions: Mutex::new(HashMap::new()),
            selected: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn selected_path(&self, region: RegionId) -> Result<PathBuf> {
        if !lock(&self.selected).contains(&region) {
            bail!("Nothing is selected");
        }
        let regions = lock(&self.regions);
        let file = regions
            .get(&region)
            .ok_or_else(|| anyhow!("Selected region no longer exists"))?;
        Ok(file.path().to_path_buf())
    }
}

fn run_first_available(commands: &[LegacyCommand], staged: &Path) -> Result<bool> {
    for command in commands {
        let stdin = File::open(staged).context("Failed to read staged clipboard text")?;
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => {
                debug!(command = %command, success = status.success(), "Legacy copy command finished");
                return Ok(status.success());
            }
            Err(e) => {
                debug!(command = %command, error = %e, "Legacy copy command not runnable");
            }
        }
    }

    bail!("No clipboard command available")
}

#[async_trait]
impl LegacyDocument for CommandDocument {
    fn create_region(&self, text: &str, _style: RegionStyle) -> Result<RegionId> {
        let mut file = NamedTempFile::new().context("Failed to create staging file")?;
        file.write_all(text.as_bytes())
            .context("Failed to stage clipboard text")?;
        file.flush()?;

        let id = RegionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.regions).insert(id, file);
        Ok(id)
    }

    fn select_all(&self, region: RegionId) -> Result<()> {
        if !lock(&self.regions).contains_key(&region) {
            bail!("Region {} does not exist", region.0);
        }
        lock(&self.selected).insert(region);
        Ok(())
    }

    async fn exec_copy(&self, region: RegionId) -> Result<bool> {
        let staged = self.selected_path(region)?;
        let commands = self.commands.clone();

        tokio::task::spawn_blocking(move || run_first_available(&commands, &staged))
            .await
            .context("Legacy copy task panicked")?
    }

    fn remove_region(&self, region: RegionId) {
        lock(&self.selected).remove(&region);
        lock(&self.regions).remove(&region);
    }
}

/// The host's real clipboard.
pub struct SystemClipboard {
    native: Option<NativeClipboard>,
    document: CommandDocument,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_HANDOFF, LegacyCommand::defaults())
    }

    pub fn with_settings(handoff: Duration, commands: Vec<LegacyCommand>) -> Self {
        Self {
            native: NativeClipboard::probe(handoff),
            document: CommandDocument::new(commands),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardEnv for SystemClipboard {
    fn rich_write(&self) -> Option<&dyn RichWrite> {
        self.native.as_ref().map(|n| n as &dyn RichWrite)
    }

    fn plain_write(&self) -> Option<&dyn PlainWrite> {
        self.native.as_ref().map(|n| n as &dyn PlainWrite)
    }

    fn document(&self) -> &dyn LegacyDocument {
        &self.document
    }
}
