//! Interpose - call interception for cross-cutting logging
//!
//! Binds logging handlers to named service methods and runs them before,
//! after, around, and on failure of each call, without touching the
//! service implementation.

pub mod advice;
pub mod config;
pub mod employee;
pub mod error;
pub mod logging;
pub mod sink;
pub mod utils;

pub use error::{Error, Failure, HandlerError, Result};
