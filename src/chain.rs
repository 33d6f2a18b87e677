//! The error-chain contract consumed by trace extraction.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};

use core::fmt::{self, Write as _};

/// Capability contract for errors that participate in trace extraction.
///
/// The chain is a single-parent relation: each error optionally wraps one
/// inner error, reachable through [`source`](Traceable::source). An error may
/// additionally expose the frames it captured when it was created or wrapped,
/// through [`captured_frames`](Traceable::captured_frames). The message comes
/// from the `Display` supertrait.
///
/// Both accessors default to `None`, so a transparent error only has to name
/// the trait. The chain must terminate; extraction does not defend against
/// cycles.
pub trait Traceable: fmt::Debug + fmt::Display {
    /// The next (inner) error in the chain, if this error wraps one.
    fn source(&self) -> Option<&dyn Traceable> {
        None
    }

    /// Raw captured frame text recorded by this error, newest call frame
    /// first. `None` when this error captured nothing.
    ///
    /// Each usable entry holds a function name and a "file:line" location on
    /// two logical lines, joined by `"\n\t"`. Entries in any other shape are
    /// dropped during extraction.
    fn captured_frames(&self) -> Option<Vec<String>> {
        None
    }

    /// Runtime type name of this error, used by [`dump_chain`].
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Traceable + ?Sized> Traceable for Box<T> {
    fn source(&self) -> Option<&dyn Traceable> {
        (**self).source()
    }

    fn captured_frames(&self) -> Option<Vec<String>> {
        (**self).captured_frames()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

/// Render a chain diagnostic, one line per level.
///
/// Each line shows the level's runtime type, whether it captured frames, and
/// its message, indented one space deeper per unwrap:
///
/// ```text
/// (mycrate::LoadError; trace=true)loading config: connection refused
///  (mycrate::NetError; trace=true)connection refused
/// ```
///
/// Handy when a merged trace comes out empty or shorter than expected and the
/// question is which level stopped carrying frames.
pub fn dump_chain(err: &dyn Traceable) -> String {
    let mut out = String::new();
    dump_level(err, 0, &mut out);
    out
}

fn dump_level(err: &dyn Traceable, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push(' ');
    }
    let has_trace = err.captured_frames().is_some();
    let _ = writeln!(out, "({}; trace={}){}", err.type_name(), has_trace, err);

    if let Some(inner) = err.source() {
        dump_level(inner, depth + 1, out);
    }
}
