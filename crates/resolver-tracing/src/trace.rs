//! Per-execution trace and the resolver tracking primitive.
//!
//! A `Trace` is created once when an execution begins and shared by `Arc`
//! with every resolver of that execution. Resolvers are recorded in the
//! order tracking starts, which is not necessarily the order they finish.
//!
//! Three tracking shapes are supported:
//!
//! - [`Trace::track`] for synchronous work,
//! - [`Trace::track_future`] for asynchronous work,
//! - [`Trace::start_resolver`] for callers that observe the start and the
//!   settlement of a resolver in separate places.

use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::call::{FieldInfo, ResolverCall};
use crate::clock::{self, Clock, MonotonicClock};

/// Clock plus the reading all offsets of one trace are measured against.
#[derive(Clone)]
struct Anchor {
    clock: Arc<dyn Clock>,
    start: Duration,
}

impl Anchor {
    fn offset(&self) -> Duration {
        clock::delta(self.clock.as_ref(), self.start)
    }
}

/// Timing record for one execution.
pub struct Trace {
    start_wall_time: DateTime<Utc>,
    anchor: Anchor,
    calls: Mutex<Vec<Arc<ResolverCall>>>,
}

impl Trace {
    /// Start a trace on a fresh monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    /// Start a trace that reads offsets from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let start = clock.now();
        Self {
            start_wall_time: Utc::now(),
            anchor: Anchor { clock, start },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Wall-clock time at which the trace was created.
    pub fn start_wall_time(&self) -> DateTime<Utc> {
        self.start_wall_time
    }

    /// Time elapsed since the trace was created.
    pub fn offset(&self) -> Duration {
        self.anchor.offset()
    }

    /// Number of resolver calls recorded so far.
    pub fn resolver_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Record the start of a resolver and hand back its completion handle.
    ///
    /// The call is appended before this returns, so start order is fixed
    /// by the order callers reach this point.
    pub fn start_resolver(&self, info: FieldInfo) -> ResolverTimer {
        let start_offset = self.offset();
        tracing::trace!(
            path = %info.path,
            field = %info.field_name,
            start_offset_ns = clock::to_nanos(start_offset),
            "Resolver started"
        );

        let call = Arc::new(ResolverCall::start(info, start_offset));
        self.lock_calls().push(Arc::clone(&call));

        ResolverTimer {
            tracked: Some((call, self.anchor.clone())),
        }
    }

    /// Run synchronous `work` as the resolver for `info`.
    ///
    /// The output, including any `Err`, is returned unchanged after the
    /// end offset has been stamped. A panic in `work` also stamps the end
    /// offset before it keeps unwinding.
    pub fn track<T, F>(&self, info: FieldInfo, work: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.start_resolver(info).run(work)
    }

    /// Run asynchronous `work` as the resolver for `info`.
    ///
    /// The call is recorded immediately, not on first poll. The returned
    /// future yields `work`'s output unchanged once the end offset has been
    /// stamped.
    pub fn track_future<F>(&self, info: FieldInfo, work: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        self.start_resolver(info).run_future(work)
    }

    /// Snapshot of the recorded calls in start order.
    pub(crate) fn calls(&self) -> Vec<Arc<ResolverCall>> {
        self.lock_calls().clone()
    }

    // Appends never leave the vector half-written, so a poisoned lock is
    // still safe to read.
    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Arc<ResolverCall>>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("start_wall_time", &self.start_wall_time)
            .field("resolver_count", &self.resolver_count())
            .finish_non_exhaustive()
    }
}

/// Completion handle for one resolver call.
///
/// `finish` consumes the handle, so a call can be completed at most once.
/// Dropping the handle without finishing leaves the call unfinished and it
/// is reported with a zero duration.
#[must_use = "a resolver timer records nothing until `finish` is called"]
pub struct ResolverTimer {
    tracked: Option<(Arc<ResolverCall>, Anchor)>,
}

impl ResolverTimer {
    /// A timer that records nothing, for untraced executions.
    pub fn inert() -> Self {
        Self { tracked: None }
    }

    /// Whether this timer is attached to a trace.
    pub fn is_tracking(&self) -> bool {
        self.tracked.is_some()
    }

    /// Stamp the end offset of the call.
    pub fn finish(self) {
        if let Some((call, anchor)) = self.tracked {
            call.end(anchor.offset());
        }
    }

    /// Run `work` and finish the timer once it returns or panics.
    pub fn run<T, F>(self, work: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _finish = FinishOnDrop(Some(self));
        work()
    }

    /// Await `work` and finish the timer once it completes.
    ///
    /// Dropping the returned future before it completes leaves the call
    /// unfinished.
    pub fn run_future<F>(self, work: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        async move {
            let output = work.await;
            self.finish();
            output
        }
    }
}

/// Finishes the wrapped timer when dropped, including while unwinding.
struct FinishOnDrop(Option<ResolverTimer>);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        if let Some(timer) = self.0.take() {
            timer.finish();
        }
    }
}

impl fmt::Debug for ResolverTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverTimer")
            .field("call", &self.tracked.as_ref().map(|(call, _)| call))
            .finish()
    }
}
