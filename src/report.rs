//! Structured per-job log events.
//!
//! The scheduler reports outcomes through these helpers; formatting and
//! verbosity filtering stay in the tracing subscriber. Captured command
//! output is attached only to failures, where it is actionable.

use tracing::{debug, error, info};

use crate::exec::ExecutionResult;

pub fn lint_success(tool: &str, file: &str, result: &ExecutionResult) {
    debug!(tool, file, duration_ms = result.duration_ms, "✅ lint ok");
}

pub fn lint_fail(tool: &str, file: &str, result: &ExecutionResult) {
    error!(
        tool,
        file,
        command = %result.command,
        output = %result.output.trim_end(),
        "❌ lint failed"
    );
}

pub fn fixing_success(tool: &str, file: &str) {
    info!(tool, file, "🛠️ fixed");
}

pub fn fixing_unchanged(tool: &str, file: &str) {
    debug!(tool, file, "✅ already clean");
}

pub fn fixing_error(tool: &str, file: &str, result: &ExecutionResult) {
    error!(
        tool,
        file,
        command = %result.command,
        output = %result.output.trim_end(),
        "❌ fixing failed"
    );
}

pub fn tool_skipped(tool: &str, reason: &str) {
    debug!(tool, reason, "⏩ skipped");
}

pub fn file_skipped(tool: &str, file: &str, reason: &str) {
    debug!(tool, file, reason, "⏩ skipped");
}
