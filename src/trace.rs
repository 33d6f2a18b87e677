//! Core trace types: frame parsing, chain extraction and merge, rendering.

#[cfg(not(feature = "std"))]
use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use core::fmt;

use smallvec::SmallVec;

use crate::chain::Traceable;

// ============================================================
// Core types
// ============================================================

/// A single position in a merged trace.
///
/// `message` is the error-chain message that was active at the level this
/// frame was captured, so consecutive frames from one capture share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Error message at the capture level.
    pub message: String,
    /// Function name at this stack position. May be empty.
    pub function: String,
    /// Textual "file:line" for this stack position. May be empty.
    pub location: String,
}

/// Inline storage for the common case; deep merged chains spill to the heap.
const INLINE_FRAMES: usize = 8;

/// Merged stack trace, ordered innermost (newest) to outermost (oldest).
///
/// Produced once by [`StackTrace::extract`] and read-only afterward. May be
/// empty when no error in the chain captured any frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackTrace {
    frames: SmallVec<[Frame; INLINE_FRAMES]>,
}

// ============================================================
// Frame parsing
// ============================================================

/// Delimiter between the function-name line and the location line in a raw
/// captured entry.
const FRAME_DELIMITER: &str = "\n\t";

impl Frame {
    /// Parse one raw captured entry, tagging it with the owning error's
    /// message.
    ///
    /// A usable entry is two logical lines joined by `"\n\t"`: the function
    /// name, then the source location. Entries without the delimiter are
    /// unusable and yield `None`.
    fn parse(message: &str, raw: &str) -> Option<Self> {
        let mut parts = raw.split(FRAME_DELIMITER);
        let function = parts.next()?;
        let location = parts.next()?;
        Some(Self {
            message: message.to_string(),
            function: function.to_string(),
            location: location.to_string(),
        })
    }

    /// Equality key for merge: the `(function, location)` pair as opaque
    /// strings. Messages are ignored - the same call site captured by two
    /// different wrap levels carries two different messages.
    fn same_position(&self, other: &Self) -> bool {
        self.function == other.function && self.location == other.location
    }
}

// ============================================================
// Extraction and merge
// ============================================================

impl StackTrace {
    /// Create an empty trace.
    #[inline]
    pub fn new() -> Self {
        Self {
            frames: SmallVec::new(),
        }
    }

    /// Extract a merged trace from an error chain.
    ///
    /// Walks the chain outermost to innermost via [`Traceable::source`],
    /// resolving the innermost errors first. Levels without captured frames
    /// contribute nothing and pass the inner trace through unchanged. For a
    /// level that did capture frames, its parseable entries become frames
    /// tagged with that level's own message, and are merged with the trace
    /// extracted from the rest of the chain:
    ///
    /// - The inner trace is scanned for the first frame whose
    ///   `(function, location)` pair exactly matches one of this level's
    ///   frames. Everything from that point on is dropped from the inner
    ///   trace - those frames are the shared call-tree suffix that this
    ///   level's capture continues.
    /// - With no match anywhere, the inner trace is kept whole.
    /// - The result is the (possibly truncated) inner trace followed by this
    ///   level's frames, innermost-first overall.
    ///
    /// Matching takes the very first pair found, scanning this level's frames
    /// in the outer loop and the inner trace in the inner loop. Known
    /// limitation: when an early frame coincidentally matches deeper into the
    /// inner trace than a later frame would, the coincidental match wins and
    /// the merge keeps fewer (or different) inner frames than the best
    /// alignment. Callers depend on the deterministic output, so the
    /// tie-break is kept as is.
    ///
    /// `None` yields an empty trace. The function is pure; extracting the
    /// same chain twice yields identical traces.
    pub fn extract(err: Option<&dyn Traceable>) -> Self {
        let Some(err) = err else {
            return Self::new();
        };

        let mut inner = Self::extract(err.source());

        let Some(raw) = err.captured_frames() else {
            return inner;
        };

        let message = err.to_string();
        let own: Vec<Frame> = raw
            .iter()
            .filter_map(|entry| Frame::parse(&message, entry))
            .collect();

        if inner.frames.is_empty() {
            inner.frames.extend(own);
            return inner;
        }

        // First point of reconvergence between the two captures.
        let mut reconverge = None;
        'own: for own_frame in &own {
            for (idx, inner_frame) in inner.frames.iter().enumerate() {
                if own_frame.same_position(inner_frame) {
                    reconverge = Some(idx);
                    break 'own;
                }
            }
        }

        if let Some(idx) = reconverge {
            inner.frames.truncate(idx);
        }
        inner.frames.extend(own);
        inner
    }

    /// The merged frames, innermost-first.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames in the trace.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the trace holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    // ============================================================
    // Rendering
    // ============================================================

    /// Render display lines, innermost-first.
    ///
    /// The message line is emitted only when it differs from the previous
    /// frame's message; a wrap-style message ending in `": <previous>"` is
    /// trimmed to the context it added. Function-name lines are emitted in
    /// verbose mode when the message or function changed. Location lines are
    /// emitted per frame whenever present.
    fn lines(&self, function_names: bool) -> Vec<String> {
        if self.frames.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(self.frames.len());

        let mut prev_message = "";
        let mut prev_function = "";
        for frame in &self.frames {
            if frame.message != prev_message {
                let mut display = frame.message.as_str();
                if let Some(head) = display
                    .strip_suffix(prev_message)
                    .and_then(|head| head.strip_suffix(": "))
                {
                    display = head;
                }
                out.push(display.to_string());
            }

            if function_names && (frame.message != prev_message || frame.function != prev_function)
            {
                out.push(frame.function.clone());
            }

            if !frame.location.is_empty() {
                out.push(format!("\t{}", frame.location));
            }

            prev_message = &frame.message;
            prev_function = &frame.function;
        }

        out
    }
}

/// Renders the merged trace as newline-joined lines.
///
/// `{}` lists messages and locations; the alternate form `{:#}` adds
/// function names.
impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines(f.alternate()).join("\n"))
    }
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct SerializedFrame {
        message: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        function: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        location: String,
    }

    impl Serialize for Frame {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SerializedFrame {
                message: self.message.clone(),
                function: self.function.clone(),
                location: self.location.clone(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Frame {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let frame = SerializedFrame::deserialize(deserializer)?;
            Ok(Self {
                message: frame.message,
                function: frame.function,
                location: frame.location,
            })
        }
    }

    // A trace serializes as a plain sequence of frames.
    impl Serialize for StackTrace {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.frames.iter())
        }
    }

    impl<'de> Deserialize<'de> for StackTrace {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let frames = Vec::<Frame>::deserialize(deserializer)?;
            Ok(Self {
                frames: frames.into_iter().collect(),
            })
        }
    }
}

// ============================================================
// Tests
// ============================================================
