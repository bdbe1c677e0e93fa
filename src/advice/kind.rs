//! Advice kinds.

use std::fmt;

use serde::Deserialize;

/// The point, relative to the wrapped call, at which a handler runs.
///
/// Dispatch order is fixed: `Before`, then `Around` wrapping the call, then
/// exactly one of `AfterReturning` / `AfterThrowing`, then `After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Before,
    After,
    AfterReturning,
    Around,
    AfterThrowing,
}

impl AdviceKind {
    /// Every kind, in dispatch order.
    pub const ALL: [AdviceKind; 5] = [
        AdviceKind::Before,
        AdviceKind::Around,
        AdviceKind::AfterReturning,
        AdviceKind::AfterThrowing,
        AdviceKind::After,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceKind::Before => "before",
            AdviceKind::After => "after",
            AdviceKind::AfterReturning => "after_returning",
            AdviceKind::Around => "around",
            AdviceKind::AfterThrowing => "after_throwing",
        }
    }
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
