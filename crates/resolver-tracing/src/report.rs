//! Tracing report assembly in the Apollo tracing format.
//!
//! The report is attached under a single extensions key. If that key is
//! already taken by another producer, the result is left untouched and a
//! warning is logged; tracing never fails an execution.
//!
//! ```text
//! {
//!   "version": 1,
//!   "startTime": "2024-05-01T12:00:00.000Z",
//!   "endTime": "2024-05-01T12:00:00.004Z",
//!   "duration": 4012345,
//!   "execution": {
//!     "resolvers": [
//!       { "path": ["add"], "parentType": "Query", "fieldName": "add",
//!         "returnType": "Int", "startOffset": 120045, "duration": 3210 }
//!     ]
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::call::ResolverCall;
use crate::clock::to_nanos;
use crate::error::{ReportError, Result};
use crate::path::ResponsePath;
use crate::result::ExecutionResult;
use crate::trace::Trace;

/// Version of the report format.
pub const TRACING_FORMAT_VERSION: u32 = 1;

/// Extensions key the report is written to by default.
pub const DEFAULT_EXTENSION_KEY: &str = "tracing";

/// Complete tracing report for one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracingFormat {
    pub version: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Nanoseconds from trace start to report assembly.
    pub duration: u64,
    pub execution: ExecutionTiming,
}

/// Timing of the execution phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTiming {
    pub resolvers: Vec<ResolverReport>,
}

/// Timing of one resolver call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverReport {
    pub path: ResponsePath,
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
    pub start_offset: u64,
    pub duration: u64,
}

impl ResolverReport {
    /// Format one call. Unfinished calls get a zero duration.
    pub fn from_call(call: &ResolverCall) -> Self {
        let start_offset = to_nanos(call.start_offset());
        let duration = call
            .end_offset()
            .map(|end| to_nanos(end).saturating_sub(start_offset))
            .unwrap_or(0);

        Self {
            path: call.path().clone(),
            parent_type: call.parent_type().to_string(),
            field_name: call.field_name().to_string(),
            return_type: call.return_type().to_string(),
            start_offset,
            duration,
        }
    }
}

impl TracingFormat {
    /// Build the report for `trace` as of now.
    ///
    /// `end_time` and `duration` are read at assembly time, so any delay
    /// between the end of execution and this call is included.
    pub fn from_trace(trace: &Trace) -> Self {
        let resolvers = trace
            .calls()
            .iter()
            .map(|call| ResolverReport::from_call(call))
            .collect();

        Self {
            version: TRACING_FORMAT_VERSION,
            start_time: trace.start_wall_time(),
            end_time: Utc::now(),
            duration: to_nanos(trace.offset()),
            execution: ExecutionTiming { resolvers },
        }
    }
}

/// Write the report for `trace` into `result.extensions[key]`.
///
/// Fails with [`ReportError::SlotOccupied`] if `key` is already present,
/// whatever its value. On any error `result` is left unchanged.
pub fn attach_report(trace: &Trace, result: &mut ExecutionResult, key: &str) -> Result<()> {
    if let Some(existing) = result.extension(key) {
        return Err(ReportError::SlotOccupied {
            key: key.to_string(),
            existing: existing.clone(),
        });
    }

    let report = serde_json::to_value(TracingFormat::from_trace(trace))?;
    result.extensions_mut().insert(key.to_string(), report);
    Ok(())
}

/// Attach the report and return the result.
///
/// Errors from [`attach_report`] are logged at warn level and otherwise
/// swallowed, so the caller always gets its result back.
pub fn finish(trace: &Trace, mut result: ExecutionResult, key: &str) -> ExecutionResult {
    match attach_report(trace, &mut result, key) {
        Ok(()) => {
            tracing::debug!(
                key = %key,
                resolvers = trace.resolver_count(),
                "Attached tracing report"
            );
        }
        Err(ReportError::SlotOccupied { key, existing }) => {
            tracing::warn!(
                key = %key,
                existing = %existing,
                "Could not add `{}` to `extensions` since `{}` was unexpectedly already present",
                key,
                key
            );
        }
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Failed to attach tracing report");
        }
    }
    result
}
