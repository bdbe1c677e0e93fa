//! Composition-time wrapper that routes calls through an advice registry.

use std::fmt;
use std::sync::Arc;

use crate::error::{Failure, Result};

use super::{AdviceRegistry, Arg, Selector};

/// Wrapper that runs every call to the wrapped service through an
/// [`AdviceRegistry`].
///
/// Each call is identified by `(type_name, method)`; advice registered for
/// that selector runs around the call, everything else passes straight
/// through.
///
/// # Example
///
/// ```ignore
/// let service = MockEmployeeService::new();
/// let service = Advised::new(service, "Service", registry);
/// ```
pub struct Advised<T> {
    inner: T,
    type_name: String,
    registry: Arc<AdviceRegistry>,
}

impl<T> Advised<T> {
    /// Wrap a service.
    ///
    /// # Arguments
    /// * `inner` - The service to wrap
    /// * `type_name` - Declaring type name selectors are matched against (e.g., "Service")
    /// * `registry` - Registry holding the advice to apply
    pub fn new(inner: T, type_name: impl Into<String>, registry: Arc<AdviceRegistry>) -> Self {
        Self {
            inner,
            type_name: type_name.into(),
            registry,
        }
    }

    /// Get a reference to the inner service.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper and return the inner service.
    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn registry(&self) -> &Arc<AdviceRegistry> {
        &self.registry
    }

    /// Run `operation` against the inner service as method `method`.
    pub fn call<R, F>(&self, method: &str, args: Vec<Arg>, operation: F) -> Result<R>
    where
        R: fmt::Debug + Send + 'static,
        F: FnOnce(&T) -> std::result::Result<R, Failure>,
    {
        let selector = Selector::new(self.type_name.as_str(), method);
        self.registry.invoke(&selector, args, || operation(&self.inner))
    }
}

impl<T: fmt::Debug> fmt::Debug for Advised<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advised")
            .field("inner", &self.inner)
            .field("type_name", &self.type_name)
            .field("advice", &self.registry.len())
            .finish()
    }
}
