//! Human-readable rendering of error chains and panic payloads.

use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt::Write as _;

const INDENT: &str = "  ";

/// Render an error with its captured stack trace and full cause chain.
///
/// Each source is nested one level deeper under a `Caused by:` header, so a
/// three-deep chain reads top to bottom as it was wrapped.
#[must_use]
pub fn format_error(err: &anyhow::Error) -> String {
    let mut out = err.to_string();

    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        out.push_str("\nStack trace:\n");
        push_indented(&mut out, &backtrace.to_string(), 1);
    }

    if let Some(source) = err.source() {
        render_cause(&mut out, source, 1);
    }
    out
}

fn render_cause(out: &mut String, err: &(dyn StdError + 'static), depth: usize) {
    let _ = write!(out, "\n{}Caused by:\n", INDENT.repeat(depth - 1));
    push_indented(out, &err.to_string(), depth);
    if let Some(next) = err.source() {
        render_cause(out, next, depth + 1);
    }
}

fn push_indented(out: &mut String, text: &str, depth: usize) {
    let prefix = INDENT.repeat(depth);
    let body = text
        .trim_end()
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&body);
}

/// String form of a value that is not an error, such as a panic payload.
#[must_use]
pub fn format_panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
