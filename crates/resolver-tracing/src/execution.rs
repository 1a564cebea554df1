//! Execution instrumentation: the wrapper that creates a trace when an
//! execution starts and attaches the report when it ends.
//!
//! ```rust,no_run
//! use resolver_tracing::{
//!     ExecutionInfo, ExecutionResult, FieldInfo, ResolverTracing, ResponsePath, TracingConfig,
//! };
//!
//! # async fn run() {
//! let tracing = ResolverTracing::new(TracingConfig::default());
//! let info = ExecutionInfo::new("{ add(x: 2, y: 2) }");
//!
//! let result = tracing
//!     .execute(info, (), |_info, ctx| async move {
//!         let field = FieldInfo::new(ResponsePath::root().key("add"), "Query", "add", "Int");
//!         let sum = ctx.track(field, || 2 + 2);
//!         ExecutionResult::from_data(serde_json::json!({ "add": sum }))
//!     })
//!     .await;
//!
//! assert!(result.extension("tracing").is_some());
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::TracingConfig;
use crate::context::TracingContext;
use crate::report;
use crate::result::ExecutionResult;
use crate::trace::Trace;

/// What is being executed.
///
/// Deserializes from a standard GraphQL-over-HTTP request body
/// (`query`, `variables`, `operationName`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    #[serde(rename = "query", alias = "source")]
    pub source: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl ExecutionInfo {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// Extension points around a traced execution.
///
/// All methods have no-op defaults.
#[async_trait]
pub trait ExecutionHooks<C>: Send + Sync
where
    C: Send + Sync,
{
    /// Return `true` to run the execution without tracing.
    fn skip(&self, _info: &ExecutionInfo, _context: &C) -> bool {
        false
    }

    /// Called with the fresh trace before the executor runs.
    async fn execution_will_start(&self, _info: &ExecutionInfo, _context: &TracingContext<C>) {}

    /// Called after the executor returns, before the report is attached.
    async fn execution_did_end(
        &self,
        _info: &ExecutionInfo,
        _trace: &Trace,
        _result: &ExecutionResult,
    ) {
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl<C: Send + Sync> ExecutionHooks<C> for NoopHooks {}

/// Wraps executions with a trace and attaches the report to their results.
pub struct ResolverTracing<H = NoopHooks> {
    config: TracingConfig,
    hooks: H,
    clock: Option<Arc<dyn Clock>>,
}

impl ResolverTracing<NoopHooks> {
    pub fn new(config: TracingConfig) -> Self {
        Self {
            config,
            hooks: NoopHooks,
            clock: None,
        }
    }
}

impl Default for ResolverTracing<NoopHooks> {
    fn default() -> Self {
        Self::new(TracingConfig::default())
    }
}

impl<H> ResolverTracing<H> {
    /// Replace the hooks.
    pub fn with_hooks<H2>(self, hooks: H2) -> ResolverTracing<H2> {
        ResolverTracing {
            config: self.config,
            hooks,
            clock: self.clock,
        }
    }

    /// Read offsets of every trace from `clock` instead of a fresh
    /// monotonic clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    fn new_trace(&self) -> Trace {
        match &self.clock {
            Some(clock) => Trace::with_clock(Arc::clone(clock)),
            None => Trace::new(),
        }
    }

    /// Run `executor` for `info`, traced unless disabled or skipped.
    ///
    /// The executor receives the execution info and a [`TracingContext`]
    /// wrapping `context`; resolvers track themselves through it. A skipped
    /// execution returns the executor's result untouched.
    pub async fn execute<C, E, Fut>(
        &self,
        info: ExecutionInfo,
        context: C,
        executor: E,
    ) -> ExecutionResult
    where
        H: ExecutionHooks<C>,
        C: Send + Sync,
        E: FnOnce(ExecutionInfo, TracingContext<C>) -> Fut,
        Fut: Future<Output = ExecutionResult>,
    {
        if !self.config.enabled || self.hooks.skip(&info, &context) {
            tracing::debug!(
                operation = info.operation_name.as_deref().unwrap_or(""),
                "Skipping execution tracing"
            );
            return executor(info, TracingContext::untraced(context)).await;
        }

        let trace = Arc::new(self.new_trace());
        tracing::debug!(
            operation = info.operation_name.as_deref().unwrap_or(""),
            start_time = %trace.start_wall_time(),
            "Execution trace started"
        );

        let context = TracingContext::traced(context, Arc::clone(&trace));
        self.hooks.execution_will_start(&info, &context).await;

        let result = executor(info.clone(), context).await;

        self.hooks.execution_did_end(&info, &trace, &result).await;

        report::finish(&trace, result, &self.config.extension_key)
    }
}
