//! The proceed capability handed to around advice.

use std::cell::Cell;
use std::fmt;

use crate::error::{Failure, HandlerError, SinkError};

use super::ReturnValue;

/// Outcome of an around handler.
pub type AroundResult = Result<ReturnValue, AroundError>;

/// Ways an around chain can end other than with a value.
#[derive(Debug, thiserror::Error)]
pub enum AroundError {
    /// The wrapped operation (or a handler replacing its outcome) failed.
    #[error(transparent)]
    Failed(Failure),

    /// The around handler itself failed.
    #[error(transparent)]
    Handler(HandlerError),

    /// A nested around handler returned without proceeding.
    #[error("proceed was never called")]
    ProceedSkipped,
}

impl From<Failure> for AroundError {
    fn from(failure: Failure) -> Self {
        AroundError::Failed(failure)
    }
}

impl From<HandlerError> for AroundError {
    fn from(err: HandlerError) -> Self {
        AroundError::Handler(err)
    }
}

impl From<SinkError> for AroundError {
    fn from(err: SinkError) -> Self {
        AroundError::Handler(err.into())
    }
}

/// Capability to run the rest of the chain: inner around handlers, then the
/// wrapped operation.
///
/// `proceed` consumes the capability, so it can be called at most once.
/// Returning from an around handler without calling it is reported as
/// [`crate::Error::ProceedMisuse`].
pub struct Proceed<'a> {
    next: Box<dyn FnOnce() -> AroundResult + 'a>,
    proceeded: &'a Cell<bool>,
}

impl<'a> Proceed<'a> {
    pub(crate) fn new(next: Box<dyn FnOnce() -> AroundResult + 'a>, proceeded: &'a Cell<bool>) -> Self {
        Self { next, proceeded }
    }

    pub fn proceed(self) -> AroundResult {
        self.proceeded.set(true);
        (self.next)()
    }
}

impl fmt::Debug for Proceed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed")
            .field("proceeded", &self.proceeded.get())
            .finish_non_exhaustive()
    }
}
