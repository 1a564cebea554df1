//! Per-execution resolver timing for GraphQL-style field execution.
//!
//! For each execution this crate records the wall-clock start and end, and
//! for every field resolution a start offset and duration relative to the
//! start of the execution. The result is reported in the Apollo tracing
//! format (version 1) under the `tracing` key of the result's extensions.
//!
//! # Flow
//!
//! ```text
//! execution start ──► Trace::new ──► TracingContext (shared by Arc)
//!                                        │
//!     each field: ctx.track / ctx.track_future / ctx.start_resolver
//!                                        │
//! execution end ───► report::finish ──► extensions.tracing
//! ```
//!
//! # Usage
//!
//! 1. Wrap executions with [`ResolverTracing::execute`], or create a
//!    [`Trace`] yourself and call [`report::finish`] when done.
//! 2. Have the resolver dispatcher track every field through the
//!    [`TracingContext`] it receives.
//! 3. Return the [`ExecutionResult`]; it converts into an HTTP response.

pub mod call;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod http;
pub mod path;
pub mod report;
pub mod result;
pub mod trace;

pub use call::{FieldInfo, ResolverCall};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{TracingConfig, TracingConfigBuilder};
pub use context::TracingContext;
pub use error::{ConfigError, ReportError};
pub use execution::{ExecutionHooks, ExecutionInfo, NoopHooks, ResolverTracing};
pub use path::{PathSegment, ResponsePath};
pub use report::{
    attach_report, finish, ResolverReport, TracingFormat, DEFAULT_EXTENSION_KEY,
    TRACING_FORMAT_VERSION,
};
pub use result::{ExecutionResult, GraphQLError};
pub use trace::{ResolverTimer, Trace};
