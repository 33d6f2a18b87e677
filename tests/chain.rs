//! Chain-level tests with concrete error variants.

use thiserror::Error;
use trace_this::{dump_chain, StackTrace, TraceExt, Traceable};

/// Test error chain. `Captured` variants record raw frame text the way a
/// wrap-capturing error library would; `Opaque` variants wrap without
/// capturing anything.
#[derive(Debug, Error)]
enum TestError {
    #[error("{message}")]
    Captured {
        message: String,
        frames: Vec<String>,
        cause: Option<Box<TestError>>,
    },
    #[error("{message}")]
    Opaque {
        message: String,
        cause: Option<Box<TestError>>,
    },
}

impl Traceable for TestError {
    fn source(&self) -> Option<&dyn Traceable> {
        match self {
            TestError::Captured { cause, .. } | TestError::Opaque { cause, .. } => {
                cause.as_deref().map(|e| e as &dyn Traceable)
            }
        }
    }

    fn captured_frames(&self) -> Option<Vec<String>> {
        match self {
            TestError::Captured { frames, .. } => Some(frames.clone()),
            TestError::Opaque { .. } => None,
        }
    }
}

fn captured(message: &str, frames: &[(&str, &str)], cause: Option<TestError>) -> TestError {
    TestError::Captured {
        message: message.to_string(),
        frames: frames
            .iter()
            .map(|(function, location)| format!("{function}\n\t{location}"))
            .collect(),
        cause: cause.map(Box::new),
    }
}

fn opaque(message: &str, cause: Option<TestError>) -> TestError {
    TestError::Opaque {
        message: message.to_string(),
        cause: cause.map(Box::new),
    }
}

// Mirrors a three-level wrap: func_a calls func_b calls func_c, each wrap
// capturing the stack active at its call site. The three captures share the
// "main" frame, and the two outer captures also share their callers' frames.
fn func_c() -> TestError {
    captured(
        "error C",
        &[
            ("mypkg::func_c", "mysource.rs:30"),
            ("mypkg::func_b", "mysource.rs:26"),
            ("main", "mysource.rs:12"),
        ],
        None,
    )
}

fn func_b() -> TestError {
    captured(
        "error B: error C",
        &[("mypkg::func_b", "mysource.rs:26"), ("main", "mysource.rs:12")],
        Some(func_c()),
    )
}

fn func_a() -> TestError {
    captured(
        "error A: error B: error C",
        &[("mypkg::func_a", "mysource.rs:22"), ("main", "mysource.rs:12")],
        Some(func_b()),
    )
}

#[test]
fn extract_none_yields_empty_trace() {
    let trace = StackTrace::extract(None);
    assert!(trace.is_empty());
    assert_eq!(trace.to_string(), "");
}

#[test]
fn chain_without_captures_yields_empty_trace() {
    let err = opaque("outer", Some(opaque("middle", Some(opaque("root", None)))));
    assert!(err.stack_trace().is_empty());
}

#[test]
fn merged_trace_shows_each_context_once() {
    let err = func_a();
    let trace = err.stack_trace();

    // Four frames: one per wrap site plus the shared "main" ancestor.
    assert_eq!(trace.len(), 4);
    let mains = trace
        .frames()
        .iter()
        .filter(|f| f.function == "main")
        .count();
    assert_eq!(mains, 1);

    assert_eq!(
        trace.to_string(),
        "error C\n\
         \tmysource.rs:30\n\
         error B\n\
         \tmysource.rs:26\n\
         error A\n\
         \tmysource.rs:22\n\
         \tmysource.rs:12",
    );
}

#[test]
fn verbose_mode_adds_function_names() {
    let err = func_a();
    let trace = err.stack_trace();

    assert_eq!(
        format!("{trace:#}"),
        "error C\n\
         mypkg::func_c\n\
         \tmysource.rs:30\n\
         error B\n\
         mypkg::func_b\n\
         \tmysource.rs:26\n\
         error A\n\
         mypkg::func_a\n\
         \tmysource.rs:22\n\
         main\n\
         \tmysource.rs:12",
    );
}

#[test]
fn opaque_middle_level_is_transparent() {
    let root = captured(
        "error C",
        &[("mypkg::func_c", "mysource.rs:30"), ("main", "mysource.rs:12")],
        None,
    );
    let middle = opaque("error B: error C", Some(root));
    let outer = captured(
        "error A: error B: error C",
        &[("mypkg::func_a", "mysource.rs:22"), ("main", "mysource.rs:12")],
        Some(middle),
    );

    let trace = outer.stack_trace();
    assert_eq!(trace.len(), 3);
    // The opaque level contributed no frames, so its message never appears.
    assert!(trace
        .frames()
        .iter()
        .all(|f| f.message != "error B: error C"));
    assert_eq!(
        trace.to_string(),
        "error C\n\
         \tmysource.rs:30\n\
         error A: error B\n\
         \tmysource.rs:22\n\
         \tmysource.rs:12",
    );
}

#[test]
fn extraction_is_pure() {
    let err = func_a();
    let first = err.stack_trace();
    let second = err.stack_trace();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn dump_chain_reports_capture_capability_per_level() {
    let err = opaque("error A: error C", Some(func_c()));
    let dump = dump_chain(&err);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("TestError"));
    assert!(lines[0].contains("trace=false"));
    assert!(lines[0].ends_with("error A: error C"));
    assert!(lines[1].starts_with(' '));
    assert!(lines[1].contains("trace=true"));
    assert!(lines[1].ends_with("error C"));

    assert_eq!(err.dump(), dump);
}

#[test]
fn traces_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StackTrace>();
    assert_send_sync::<trace_this::Frame>();
}

#[test]
fn concurrent_extraction_on_independent_chains() {
    let expected = func_a().stack_trace().to_string();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| func_a().stack_trace().to_string()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[cfg(feature = "serde")]
#[test]
fn trace_round_trips_through_serde() {
    let trace = func_a().stack_trace();

    let json = serde_json::to_string(&trace).unwrap();
    let back: StackTrace = serde_json::from_str(&json).unwrap();

    assert_eq!(back, trace);
    assert_eq!(back.to_string(), trace.to_string());
}
