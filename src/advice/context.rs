//! Selectors and per-invocation call context.

use std::fmt;
use std::sync::Arc;

use tracing::Level;

use crate::error::{Error, Result, SinkError};
use crate::sink::LogSink;

/// Identifies a target operation by declaring type and method name.
///
/// Matching is exact string equality on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    type_name: String,
    method: String,
}

impl Selector {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Parse `Type.method`, splitting on the last `.` so qualified type
    /// names such as `org.acme.EmployeeService.addEmployee` are accepted.
    pub fn parse(text: &str) -> Result<Self> {
        let (type_name, method) = text
            .rsplit_once('.')
            .ok_or_else(|| Error::InvalidSelector(text.to_string()))?;
        let selector = Self::new(type_name.trim(), method.trim());
        selector.validate()?;
        Ok(selector)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn matches(&self, other: &Selector) -> bool {
        self == other
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() || self.method.is_empty() {
            return Err(Error::InvalidSelector(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method)
    }
}

/// One argument of an intercepted call, kept as an opaque displayable value.
#[derive(Clone)]
pub struct Arg(Arc<dyn fmt::Display + Send + Sync>);

impl Arg {
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg({})", self.0)
    }
}

/// Build a `Vec<Arg>` from displayable expressions.
///
/// ```
/// let args = interpose::args!["Alice", 5000];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::advice::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::advice::Arg::new($value)),+]
    };
}

/// Immutable snapshot of one invocation.
#[derive(Debug, Clone)]
pub struct CallContext {
    selector: Selector,
    args: Vec<Arg>,
}

impl CallContext {
    pub fn new(selector: Selector, args: Vec<Arg>) -> Self {
        Self { selector, args }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn type_name(&self) -> &str {
        self.selector.type_name()
    }

    pub fn method(&self) -> &str {
        self.selector.method()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Render arguments as `[a, b, c]`.
    pub fn render_args(&self) -> String {
        let rendered: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        format!("[{}]", rendered.join(", "))
    }
}

/// What a handler sees: the call context plus the registry's log sink.
#[derive(Clone, Copy)]
pub struct JoinPoint<'a> {
    context: &'a CallContext,
    sink: &'a dyn LogSink,
}

impl<'a> JoinPoint<'a> {
    pub fn new(context: &'a CallContext, sink: &'a dyn LogSink) -> Self {
        Self { context, sink }
    }

    pub fn context(&self) -> &'a CallContext {
        self.context
    }

    pub fn selector(&self) -> &'a Selector {
        self.context.selector()
    }

    pub fn sink(&self) -> &'a dyn LogSink {
        self.sink
    }

    pub fn debug_enabled(&self) -> bool {
        self.sink.enabled(Level::DEBUG)
    }

    pub fn debug(&self, message: &str) -> std::result::Result<(), SinkError> {
        self.sink.emit(Level::DEBUG, message)
    }

    pub fn error(&self, message: &str) -> std::result::Result<(), SinkError> {
        self.sink.emit(Level::ERROR, message)
    }
}

impl fmt::Debug for JoinPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPoint")
            .field("context", self.context)
            .finish_non_exhaustive()
    }
}
