//! trace-this - Merged, de-duplicated stack traces from wrapped error chains
//!
//! # Overview
//!
//! When every error in a chain captures its own call stack, printing the
//! chain naively repeats the shared ancestor frames once per wrapping level.
//! `trace-this` walks the chain once and merges the captures into a single
//! trace: each error's message, the frames unique to its wrapping point, and
//! the common ancestor frames exactly once.
//!
//! Errors opt in through the [`Traceable`] contract; the crate never creates,
//! wraps, or captures errors itself.
//!
//! # Quick Start
//!
//! ```
//! use trace_this::{StackTrace, Traceable};
//! use std::fmt;
//!
//! #[derive(Debug)]
//! struct Wrapped {
//!     message: &'static str,
//!     frames: Vec<String>,
//!     inner: Option<Box<Wrapped>>,
//! }
//!
//! impl fmt::Display for Wrapped {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str(self.message)
//!     }
//! }
//!
//! impl Traceable for Wrapped {
//!     fn source(&self) -> Option<&dyn Traceable> {
//!         self.inner.as_deref().map(|e| e as &dyn Traceable)
//!     }
//!     fn captured_frames(&self) -> Option<Vec<String>> {
//!         Some(self.frames.clone())
//!     }
//! }
//!
//! let root = Wrapped {
//!     message: "connection refused",
//!     frames: vec![
//!         "mypkg::connect\n\tsrc/net.rs:40".into(),
//!         "mypkg::run\n\tsrc/main.rs:12".into(),
//!     ],
//!     inner: None,
//! };
//! let err = Wrapped {
//!     message: "loading config: connection refused",
//!     frames: vec![
//!         "mypkg::load\n\tsrc/config.rs:8".into(),
//!         "mypkg::run\n\tsrc/main.rs:12".into(),
//!     ],
//!     inner: Some(Box::new(root)),
//! };
//!
//! let trace = StackTrace::extract(Some(&err));
//! assert_eq!(
//!     trace.to_string(),
//!     "connection refused\n\
//!      \tsrc/net.rs:40\n\
//!      loading config\n\
//!      \tsrc/config.rs:8\n\
//!      \tsrc/main.rs:12",
//! );
//! ```
//!
//! The shared `mypkg::run` frame appears once, and the wrap-style message
//! `"loading config: connection refused"` is trimmed back to the context it
//! actually added.
//!
//! # Render modes
//!
//! | Format | Description |
//! |--------|-------------|
//! | `{}` | Messages and source locations |
//! | `{:#}` | Messages, function names, and source locations |
//!
//! # Diagnosing a chain
//!
//! [`dump_chain`] (or [`TraceExt::dump`]) renders one line per chain level
//! with the runtime type, whether the level captured frames, and its message.
//! Useful when a merged trace comes out empty or shorter than expected.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// ============================================================
// Modules
// ============================================================

mod chain;
mod ext;
mod trace;

// ============================================================
// Re-exports
// ============================================================

pub use chain::{dump_chain, Traceable};
pub use ext::TraceExt;
pub use trace::{Frame, StackTrace};
