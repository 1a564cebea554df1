//! Per-field resolver call records.
//!
//! A `ResolverCall` is created when a field resolution starts and is stamped
//! with an end offset exactly once, when the resolution settles.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use crate::path::ResponsePath;

/// Identity of a single field resolution, as supplied by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub path: ResponsePath,
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
}

impl FieldInfo {
    /// Capture a field identity. Type arguments are rendered to strings
    /// immediately, so later changes to the type objects are not observed.
    pub fn new(
        path: ResponsePath,
        parent_type: impl fmt::Display,
        field_name: impl Into<String>,
        return_type: impl fmt::Display,
    ) -> Self {
        Self {
            path,
            parent_type: parent_type.to_string(),
            field_name: field_name.into(),
            return_type: return_type.to_string(),
        }
    }
}

/// One tracked field resolution.
#[derive(Debug)]
pub struct ResolverCall {
    info: FieldInfo,
    start_offset: Duration,
    end_offset: OnceLock<Duration>,
}

impl ResolverCall {
    pub(crate) fn start(info: FieldInfo, start_offset: Duration) -> Self {
        Self {
            info,
            start_offset,
            end_offset: OnceLock::new(),
        }
    }

    /// Stamp the end offset. Returns `false` if it was already stamped.
    pub(crate) fn end(&self, end_offset: Duration) -> bool {
        self.end_offset.set(end_offset).is_ok()
    }

    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    pub fn path(&self) -> &ResponsePath {
        &self.info.path
    }

    pub fn field_name(&self) -> &str {
        &self.info.field_name
    }

    pub fn parent_type(&self) -> &str {
        &self.info.parent_type
    }

    pub fn return_type(&self) -> &str {
        &self.info.return_type
    }

    pub fn start_offset(&self) -> Duration {
        self.start_offset
    }

    /// End offset, or `None` while the resolution is in flight.
    pub fn end_offset(&self) -> Option<Duration> {
        self.end_offset.get().copied()
    }

    pub fn is_finished(&self) -> bool {
        self.end_offset.get().is_some()
    }

    /// Elapsed time between start and end, zero if not finished.
    pub fn duration(&self) -> Duration {
        self.end_offset()
            .map(|end| end.saturating_sub(self.start_offset))
            .unwrap_or(Duration::ZERO)
    }
}
