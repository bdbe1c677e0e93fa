//! Aspect-oriented advice for cross-cutting concerns.
//!
//! This module provides a registry that binds handlers to named operations
//! and runs them around each call, so logging stays out of business logic.
//!
//! # Architecture
//!
//! Advice is applied at service composition time, not in implementations:
//!
//! ```ignore
//! // Core implementation - pure business logic
//! let service = MockEmployeeService::new();
//!
//! // Bind advice, then share the registry read-only
//! let mut registry = AdviceRegistry::new(Arc::new(TracingSink::new()));
//! logging::install(&mut registry, &logging::default_rules("Service"))?;
//!
//! // Apply the wrapper - calls now run through the registry
//! let service = Advised::new(service, "Service", Arc::new(registry));
//! service.add_employee("Alice", 5000)?;
//! ```
//!
//! # Dispatch order
//!
//! `before` -> `around` (pre-phase) -> operation -> `after_returning` or
//! `after_throwing` -> `after`.
//!
//! # Available Advice
//!
//! - [`Advice::before`], [`Advice::after`], [`Advice::after_returning`],
//!   [`Advice::around`], [`Advice::after_throwing`]
//! - [`Advised`] - wrapper that routes a service's calls through a registry

mod advised;
mod context;
mod kind;
mod proceed;
mod registry;
mod value;

pub use advised::Advised;
pub use context::{Arg, CallContext, JoinPoint, Selector};
pub use kind::AdviceKind;
pub use proceed::{AroundError, AroundResult, Proceed};
pub use registry::{
    Advice, AdviceRegistry, AfterFn, AfterReturningFn, AfterThrowingFn, AroundFn, BeforeFn,
    Completion, HandlerResult, Registration,
};
pub use value::ReturnValue;
