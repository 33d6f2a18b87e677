//! Extension trait for error types implementing the chain contract.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::chain::{dump_chain, Traceable};
use crate::trace::StackTrace;

/// Convenience methods on any error implementing [`Traceable`].
pub trait TraceExt {
    /// Extract the merged trace for this error's chain.
    fn stack_trace(&self) -> StackTrace;

    /// Render the chain diagnostic for this error's chain.
    fn dump(&self) -> String;
}

impl<T: Traceable> TraceExt for T {
    #[inline]
    fn stack_trace(&self) -> StackTrace {
        StackTrace::extract(Some(self as &dyn Traceable))
    }

    #[inline]
    fn dump(&self) -> String {
        dump_chain(self)
    }
}
