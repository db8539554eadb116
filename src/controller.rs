//! Copy state: whether something was just copied, the last error, and the
//! timer that clears the copied flag again.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::clipboard::{ClipboardEnv, ClipboardWriter};
use crate::content::CopyContent;
use crate::error::CopyError;

pub const DEFAULT_SUCCESS_DURATION: Duration = Duration::from_millis(2000);

pub type SuccessCallback = Arc<dyn Fn(&CopyContent) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&CopyError) + Send + Sync>;

#[derive(Clone)]
pub struct CopyOptions {
    /// How long `copied` stays true after a success. Zero keeps it set until
    /// the next `reset` or `copy`.
    pub success_duration: Duration,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success_duration(mut self, duration: Duration) -> Self {
        self.success_duration = duration;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&CopyContent) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&CopyError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            success_duration: DEFAULT_SUCCESS_DURATION,
            on_success: None,
            on_error: None,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("success_duration", &self.success_duration)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Observable outcome of the latest copy. `copied` and `error` are never
/// set at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyState {
    pub copied: bool,
    pub error: Option<CopyError>,
}

impl CopyState {
    fn succeeded() -> Self {
        Self {
            copied: true,
            error: None,
        }
    }

    fn failed(error: CopyError) -> Self {
        Self {
            copied: false,
            error: Some(error),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.copied && self.error.is_none()
    }
}

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerSlot {
    pending: Option<PendingTimer>,
    generation: u64,
}

impl TimerSlot {
    fn cancel(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.handle.abort();
        }
    }
}

struct Shared {
    state: watch::Sender<CopyState>,
    timer: Mutex<TimerSlot>,
}

impl Shared {
    fn timer(&self) -> MutexGuard<'_, TimerSlot> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, generation: u64) {
        let mut slot = self.timer();
        if slot.pending.as_ref().map(|t| t.generation) != Some(generation) {
            return;
        }
        slot.pending = None;
        self.state.send_modify(|state| state.copied = false);
        debug!("Copied flag auto-reset");
    }
}

/// Drives clipboard writes and tracks their outcome.
///
/// Overlapping `copy` calls are not serialized: each runs its own write and
/// whichever settles last decides the final state. At most one auto-reset
/// timer is alive at a time; it is cancelled by `reset`, by a newer
/// successful copy, and when the controller is dropped.
pub struct CopyController {
    writer: ClipboardWriter,
    options: Mutex<CopyOptions>,
    shared: Arc<Shared>,
}

impl CopyController {
    pub fn new(writer: ClipboardWriter, options: CopyOptions) -> Self {
        let (state, _) = watch::channel(CopyState::default());
        Self {
            writer,
            options: Mutex::new(options),
            shared: Arc::new(Shared {
                state,
                timer: Mutex::new(TimerSlot::default()),
            }),
        }
    }

    pub fn with_env(env: Arc<dyn ClipboardEnv>, options: CopyOptions) -> Self {
        Self::new(ClipboardWriter::new(env), options)
    }

    pub fn system(options: CopyOptions) -> Self {
        Self::new(ClipboardWriter::system(), options)
    }

    pub fn options(&self) -> CopyOptions {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the options used by subsequent `copy` calls.
    pub fn set_options(&self, options: CopyOptions) {
        *self.options.lock().unwrap_or_else(PoisonError::into_inner) = options;
    }

    pub fn copied(&self) -> bool {
        self.shared.state.borrow().copied
    }

    pub fn error(&self) -> Option<CopyError> {
        self.shared.state.borrow().error.clone()
    }

    pub fn state(&self) -> CopyState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        self.shared.state.subscribe()
    }

    pub fn has_pending_reset(&self) -> bool {
        self.shared.timer().pending.is_some()
    }

    /// Copy `content` and record the outcome. Never fails: the result is
    /// `true` on success and `false` with the error stored in state.
    pub async fn copy(&self, content: impl Into<CopyContent>) -> bool {
        let content = content.into();
        let options = self.options();

        self.shared.timer().cancel();

        match self.writer.write(&content).await {
            Ok(tier) => {
                {
                    let mut slot = self.shared.timer();
                    self.shared.state.send_replace(CopyState::succeeded());
                    if !options.success_duration.is_zero() {
                        arm_reset(&self.shared, &mut slot, options.success_duration);
                    }
                }
                debug!(tier = %tier, "Copy succeeded");

                if let Some(on_success) = &options.on_success {
                    on_success(&content);
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "Copy to clipboard failed");
                self.shared.state.send_replace(CopyState::failed(err.clone()));

                if let Some(on_error) = &options.on_error {
                    on_error(&err);
                }
                false
            }
        }
    }

    /// Clear `copied` and `error` and cancel any pending auto-reset.
    pub fn reset(&self) {
        let mut slot = self.shared.timer();
        slot.cancel();
        self.shared.state.send_replace(CopyState::default());
    }
}

impl Drop for CopyController {
    fn drop(&mut self) {
        self.shared.timer().cancel();
    }
}

impl fmt::Debug for CopyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyController")
            .field("state", &*self.shared.state.borrow())
            .field("options", &self.options())
            .finish_non_exhaustive()
    }
}

fn arm_reset(shared: &Arc<Shared>, slot: &mut TimerSlot, duration: Duration) {
    slot.cancel();
    slot.generation += 1;
    let generation = slot.generation;
    let deadline = Instant::now() + duration;
    let weak: Weak<Shared> = Arc::downgrade(shared);

    let handle = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        if let Some(shared) = weak.upgrade() {
            shared.expire(generation);
        }
    });

    slot.pending = Some(PendingTimer { generation, handle });
}
