use thiserror::Error;

/// Failure surfaced by a copy attempt.
///
/// The `Display` output is exactly the message callers see, so a rejection
/// from the host is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    /// A clipboard capability rejected the write.
    #[error("{0}")]
    Rejected(String),

    /// The legacy copy command ran but reported failure.
    #[error("Copy command failed")]
    CommandFailed,

    /// The failure carried no usable description.
    #[error("Copy failed")]
    Unknown,
}

impl CopyError {
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            CopyError::Unknown
        } else {
            CopyError::Rejected(message)
        }
    }

    /// Turn whatever a host capability failed with into a `CopyError`.
    ///
    /// A `CopyError` passes through untouched; any other error keeps its
    /// top-level message, and an error without one becomes `Unknown`.
    pub fn normalize(err: anyhow::Error) -> Self {
        match err.downcast::<CopyError>() {
            Ok(copy_err) => copy_err,
            Err(other) => CopyError::rejected(other.to_string()),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
