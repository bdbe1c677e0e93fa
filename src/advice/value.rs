//! Type-erased return values.

use std::any::{type_name, Any};
use std::fmt;

/// Return value of an intercepted call, erased so handlers bound to
/// operations with different return types share one registry.
///
/// The `Debug` rendering is captured at construction so handlers can log the
/// value without knowing its type.
pub struct ReturnValue {
    value: Box<dyn Any + Send>,
    rendered: String,
    type_name: &'static str,
}

impl ReturnValue {
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + 'static,
    {
        Self {
            rendered: format!("{value:?}"),
            type_name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recover the concrete value, handing `self` back on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self {
            value,
            rendered,
            type_name,
        } = self;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                value,
                rendered,
                type_name,
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl fmt::Debug for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReturnValue")
            .field("type", &self.type_name)
            .field("value", &self.rendered)
            .finish()
    }
}
