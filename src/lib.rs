//! Copy text or rich content to the clipboard and track a transient
//! "copied" status.
//!
//! ```no_run
//! use clip_feedback::{CopyController, CopyOptions};
//!
//! # async fn run() {
//! let controller = CopyController::system(CopyOptions::default());
//! if controller.copy("Hello world!").await {
//!     assert!(controller.copied());
//! }
//! # }
//! ```

pub mod clipboard;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod markdown;
pub mod utils;

pub use clipboard::{ClipboardEnv, ClipboardWriter, SystemClipboard, WriteTier};
pub use content::{ClipboardItem, CopyContent};
pub use controller::{CopyController, CopyOptions, CopyState, DEFAULT_SUCCESS_DURATION};
pub use error::CopyError;
