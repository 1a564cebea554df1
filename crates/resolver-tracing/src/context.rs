//! Execution-scoped context that carries the trace to every resolver.

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::call::FieldInfo;
use crate::trace::{ResolverTimer, Trace};

/// The caller's context for one execution, plus the execution's trace.
///
/// Resolvers track themselves through this context. When the execution is
/// not traced the tracking methods run the work directly, so resolver code
/// does not need to know whether tracing was skipped.
#[derive(Debug, Clone)]
pub struct TracingContext<C> {
    inner: C,
    trace: Option<Arc<Trace>>,
}

impl<C> TracingContext<C> {
    /// Context for a traced execution.
    pub fn traced(inner: C, trace: Arc<Trace>) -> Self {
        Self {
            inner,
            trace: Some(trace),
        }
    }

    /// Context for an execution that is not traced.
    pub fn untraced(inner: C) -> Self {
        Self { inner, trace: None }
    }

    pub fn trace(&self) -> Option<&Arc<Trace>> {
        self.trace.as_ref()
    }

    pub fn is_traced(&self) -> bool {
        self.trace.is_some()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    /// See [`Trace::start_resolver`]. Returns an inert timer when untraced.
    pub fn start_resolver(&self, info: FieldInfo) -> ResolverTimer {
        match &self.trace {
            Some(trace) => trace.start_resolver(info),
            None => ResolverTimer::inert(),
        }
    }

    /// See [`Trace::track`].
    pub fn track<T, F>(&self, info: FieldInfo, work: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.start_resolver(info).run(work)
    }

    /// See [`Trace::track_future`].
    pub fn track_future<F>(&self, info: FieldInfo, work: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        self.start_resolver(info).run_future(work)
    }
}

impl<C> Deref for TracingContext<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C> DerefMut for TracingContext<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ResponsePath;

    #[derive(Debug, Clone, PartialEq)]
    struct AppContext {
        user_id: u32,
    }

    fn field(name: &str) -> FieldInfo {
        FieldInfo::new(ResponsePath::root().key(name), "Query", name, "String")
    }

    #[test]
    fn test_traced_context_records_calls() {
        let trace = Arc::new(Trace::new());
        let ctx = TracingContext::traced(AppContext { user_id: 7 }, Arc::clone(&trace));

        assert!(ctx.is_traced());
        assert_eq!(ctx.user_id, 7);

        let name = ctx.track(field("name"), || "ada".to_string());
        assert_eq!(name, "ada");
        assert_eq!(trace.resolver_count(), 1);
    }

    #[test]
    fn test_untraced_context_runs_work_directly() {
        let ctx = TracingContext::untraced(AppContext { user_id: 1 });

        assert!(!ctx.is_traced());
        assert!(ctx.trace().is_none());
        assert_eq!(ctx.track(field("name"), || 5), 5);
        assert!(!ctx.start_resolver(field("name")).is_tracking());
    }

    #[test]
    fn test_clones_share_one_trace() {
        let trace = Arc::new(Trace::new());
        let ctx = TracingContext::traced(AppContext { user_id: 1 }, Arc::clone(&trace));
        let other = ctx.clone();

        ctx.track(field("a"), || ());
        other.track(field("b"), || ());

        assert_eq!(trace.resolver_count(), 2);
        assert!(Arc::ptr_eq(ctx.trace().unwrap(), other.trace().unwrap()));
    }

    #[test]
    fn test_deref_mut_reaches_inner() {
        let mut ctx = TracingContext::untraced(AppContext { user_id: 1 });
        ctx.user_id = 2;
        assert_eq!(ctx.into_inner(), AppContext { user_id: 2 });
    }

    #[test]
    fn test_traced_context_stamps_end_when_work_panics() {
        let trace = Arc::new(Trace::new());
        let ctx = TracingContext::traced((), Arc::clone(&trace));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ctx.track(field("panicky"), || -> u8 { panic!("boom") })
        }));

        assert!(outcome.is_err());
        assert_eq!(trace.resolver_count(), 1);
        assert!(trace.calls()[0].end_offset().is_some());
    }

    #[tokio::test]
    async fn test_track_future_untraced() {
        let ctx = TracingContext::untraced(());
        let value = ctx.track_future(field("later"), async { 9 }).await;
        assert_eq!(value, 9);
    }

    #[tokio::test]
    async fn test_track_future_traced() {
        let trace = Arc::new(Trace::new());
        let ctx = TracingContext::traced((), Arc::clone(&trace));

        let pending = ctx.track_future(field("later"), async { "done" });
        assert_eq!(trace.resolver_count(), 1);
        assert_eq!(pending.await, "done");
    }
}
