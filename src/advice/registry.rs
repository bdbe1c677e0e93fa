//! Advice registry and dispatch.

use std::any::type_name;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::{Error, Failure, HandlerError, Result};
use crate::sink::LogSink;

use super::{AdviceKind, Arg, AroundError, AroundResult, CallContext, JoinPoint, Proceed, ReturnValue, Selector};

/// Result type for non-around handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

pub type BeforeFn = dyn Fn(&JoinPoint<'_>) -> HandlerResult + Send + Sync;
pub type AfterFn = dyn Fn(&JoinPoint<'_>, Completion<'_>) -> HandlerResult + Send + Sync;
pub type AfterReturningFn = dyn Fn(&JoinPoint<'_>, &ReturnValue) -> HandlerResult + Send + Sync;
pub type AfterThrowingFn = dyn Fn(&JoinPoint<'_>, &Failure) -> HandlerResult + Send + Sync;
pub type AroundFn = dyn Fn(&JoinPoint<'_>, Proceed<'_>) -> AroundResult + Send + Sync;

/// How the wrapped call ended, as seen by after advice.
#[derive(Debug, Clone, Copy)]
pub enum Completion<'a> {
    Returned(&'a ReturnValue),
    Threw(&'a Failure),
}

impl Completion<'_> {
    pub fn is_failure(&self) -> bool {
        matches!(self, Completion::Threw(_))
    }
}

/// A handler together with the contract it runs under.
pub enum Advice {
    Before(Box<BeforeFn>),
    After(Box<AfterFn>),
    AfterReturning(Box<AfterReturningFn>),
    Around(Box<AroundFn>),
    AfterThrowing(Box<AfterThrowingFn>),
}

impl Advice {
    pub fn before<F>(handler: F) -> Self
    where
        F: Fn(&JoinPoint<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Advice::Before(Box::new(handler))
    }

    pub fn after<F>(handler: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, Completion<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Advice::After(Box::new(handler))
    }

    pub fn after_returning<F>(handler: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, &ReturnValue) -> HandlerResult + Send + Sync + 'static,
    {
        Advice::AfterReturning(Box::new(handler))
    }

    pub fn around<F>(handler: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, Proceed<'_>) -> AroundResult + Send + Sync + 'static,
    {
        Advice::Around(Box::new(handler))
    }

    pub fn after_throwing<F>(handler: F) -> Self
    where
        F: Fn(&JoinPoint<'_>, &Failure) -> HandlerResult + Send + Sync + 'static,
    {
        Advice::AfterThrowing(Box::new(handler))
    }

    pub fn kind(&self) -> AdviceKind {
        match self {
            Advice::Before(_) => AdviceKind::Before,
            Advice::After(_) => AdviceKind::After,
            Advice::AfterReturning(_) => AdviceKind::AfterReturning,
            Advice::Around(_) => AdviceKind::Around,
            Advice::AfterThrowing(_) => AdviceKind::AfterThrowing,
        }
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice::{:?}", self.kind())
    }
}

/// A selector bound to one piece of advice.
#[derive(Debug)]
pub struct Registration {
    selector: Selector,
    advice: Advice,
}

impl Registration {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn kind(&self) -> AdviceKind {
        self.advice.kind()
    }
}

/// Owns all registrations and drives advice around intercepted calls.
///
/// Registration takes `&mut self`; once the registry is shared (typically in
/// an `Arc`) it is read-only, so concurrent `invoke` calls need no locking.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use interpose::advice::{Advice, AdviceRegistry, Selector};
/// use interpose::sink::MemorySink;
///
/// let sink = Arc::new(MemorySink::new());
/// let mut registry = AdviceRegistry::new(sink.clone());
/// let add = Selector::new("Service", "addEmployee");
/// registry
///     .register(add.clone(), Advice::before(|jp| Ok(jp.debug("entering")?)))
///     .unwrap();
///
/// let added = registry.invoke(&add, interpose::args!["Alice", 5000], || Ok(true)).unwrap();
/// assert!(added);
/// assert_eq!(sink.messages(), vec!["entering".to_string()]);
/// ```
pub struct AdviceRegistry {
    sink: Arc<dyn LogSink>,
    registrations: Vec<Registration>,
}

impl AdviceRegistry {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            registrations: Vec::new(),
        }
    }

    /// Bind advice to a selector.
    ///
    /// Registrations are never deduplicated: registering the same advice
    /// twice runs it twice, in registration order.
    pub fn register(&mut self, selector: Selector, advice: Advice) -> Result<()> {
        selector.validate()?;
        debug!(selector = %selector, kind = %advice.kind(), "registered advice");
        self.registrations.push(Registration { selector, advice });
        Ok(())
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Registrations whose selector matches, in registration order.
    pub fn matching<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = &'a Registration> + 'a {
        self.registrations
            .iter()
            .filter(move |r| r.selector.matches(selector))
    }

    /// Run `operation` with every piece of advice bound to `selector`.
    ///
    /// Order: before, around (first registered outermost), then
    /// after-returning or after-throwing, then after. A failure of the
    /// operation is forwarded unchanged as [`Error::Operation`]. A handler
    /// failure stops the chain and is returned as [`Error::Handler`].
    pub fn invoke<R, F>(&self, selector: &Selector, args: Vec<Arg>, operation: F) -> Result<R>
    where
        R: fmt::Debug + Send + 'static,
        F: FnOnce() -> std::result::Result<R, Failure>,
    {
        let matched: Vec<&Registration> = self.matching(selector).collect();
        if matched.is_empty() {
            return operation().map_err(Error::Operation);
        }

        let context = CallContext::new(selector.clone(), args);
        let point = JoinPoint::new(&context, self.sink.as_ref());
        trace!(selector = %selector, advice = matched.len(), "dispatching advice");

        for registration in &matched {
            if let Advice::Before(handler) = &registration.advice {
                handler(&point).map_err(|source| handler_failed(selector, AdviceKind::Before, source))?;
            }
        }

        let arounds: Vec<&AroundFn> = matched
            .iter()
            .filter_map(|r| match &r.advice {
                Advice::Around(handler) => Some(handler.as_ref()),
                _ => None,
            })
            .collect();
        let real = Box::new(move || operation().map(ReturnValue::new).map_err(AroundError::Failed));

        let outcome = match run_around(&point, &arounds, real) {
            Ok(value) => Ok(value),
            Err(AroundError::Failed(failure)) => Err(failure),
            Err(AroundError::Handler(source)) => {
                return Err(handler_failed(selector, AdviceKind::Around, source));
            }
            Err(AroundError::ProceedSkipped) => {
                warn!(selector = %selector, "around advice returned without calling proceed");
                return Err(Error::ProceedMisuse {
                    selector: selector.to_string(),
                });
            }
        };

        match &outcome {
            Ok(value) => {
                for registration in &matched {
                    if let Advice::AfterReturning(handler) = &registration.advice {
                        handler(&point, value)
                            .map_err(|source| handler_failed(selector, AdviceKind::AfterReturning, source))?;
                    }
                }
            }
            Err(failure) => {
                debug!(selector = %selector, error = %failure, "wrapped operation failed");
                for registration in &matched {
                    if let Advice::AfterThrowing(handler) = &registration.advice {
                        handler(&point, failure)
                            .map_err(|source| handler_failed(selector, AdviceKind::AfterThrowing, source))?;
                    }
                }
            }
        }

        let completion = match &outcome {
            Ok(value) => Completion::Returned(value),
            Err(failure) => Completion::Threw(failure),
        };
        for registration in &matched {
            if let Advice::After(handler) = &registration.advice {
                handler(&point, completion).map_err(|source| handler_failed(selector, AdviceKind::After, source))?;
            }
        }

        match outcome {
            Ok(value) => value.downcast::<R>().map_err(|_| Error::ReturnTypeMismatch {
                selector: selector.to_string(),
                expected: type_name::<R>(),
            }),
            Err(failure) => Err(Error::Operation(failure)),
        }
    }
}

impl fmt::Debug for AdviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceRegistry")
            .field("registrations", &self.registrations)
            .finish_non_exhaustive()
    }
}

fn handler_failed(selector: &Selector, kind: AdviceKind, source: HandlerError) -> Error {
    Error::Handler {
        selector: selector.to_string(),
        kind,
        source,
    }
}

/// Nest around handlers so `layers[0]` is outermost and the innermost
/// proceed runs `real`.
fn run_around<'a>(
    point: &'a JoinPoint<'a>,
    layers: &'a [&'a AroundFn],
    real: Box<dyn FnOnce() -> AroundResult + 'a>,
) -> AroundResult {
    let Some((outer, inner)) = layers.split_first() else {
        return real();
    };

    let proceeded = Cell::new(false);
    let next: Box<dyn FnOnce() -> AroundResult + 'a> = Box::new(move || run_around(point, inner, real));
    let result = outer(point, Proceed::new(next, &proceeded));

    match result {
        Err(AroundError::Handler(err)) => Err(AroundError::Handler(err)),
        _ if !proceeded.get() => Err(AroundError::ProceedSkipped),
        other => other,
    }
}
