//! Error types for advice dispatch.
//!
//! Three distinct failure sources flow through [`crate::advice::AdviceRegistry::invoke`]:
//! - the wrapped operation itself ([`Failure`], forwarded unchanged)
//! - a registered handler ([`HandlerError`])
//! - misuse of the around-advice proceed capability

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::advice::AdviceKind;

/// Marker rendered in place of an absent failure cause.
pub const NO_CAUSE: &str = "NULL";

/// Result type for advised invocations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller of an advised operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid selector '{0}': expected non-empty type and method")]
    InvalidSelector(String),

    #[error("{kind} advice on {selector} failed: {source}")]
    Handler {
        selector: String,
        kind: AdviceKind,
        #[source]
        source: HandlerError,
    },

    #[error("around advice on {selector} returned without calling proceed")]
    ProceedMisuse { selector: String },

    /// The wrapped operation failed. Carried verbatim, cause included.
    #[error(transparent)]
    Operation(Failure),

    #[error("around advice on {selector} replaced the result with a value that is not {expected}")]
    ReturnTypeMismatch {
        selector: String,
        expected: &'static str,
    },
}

impl Error {
    /// Returns the wrapped operation's failure, if that is what this error is.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Error::Operation(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        Error::Operation(failure)
    }
}

/// Failure raised by a wrapped operation.
///
/// Holds a message and an optional underlying cause. Cloning shares the
/// cause, so a failure handed to after-throwing advice is the same failure
/// the caller receives.
#[derive(Clone)]
pub struct Failure {
    message: String,
    cause: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl Failure {
    /// Create a failure with no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Render the cause, or [`NO_CAUSE`] when there is none.
    pub fn cause_or_marker(&self) -> String {
        match &self.cause {
            Some(cause) => cause.to_string(),
            None => NO_CAUSE.to_string(),
        }
    }

    /// True if both failures share the same message and the same cause allocation.
    pub fn same_as(&self, other: &Failure) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_cause && self.message == other.message
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Errors raised by a registered handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("log sink rejected message: {0}")]
    Sink(#[from] SinkError),

    #[error("{0}")]
    Rejected(String),
}

impl HandlerError {
    /// Convenience constructor for handler-defined failures.
    pub fn rejected(reason: impl Into<String>) -> Self {
        HandlerError::Rejected(reason.into())
    }
}

/// Errors raised by a log sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}
