//! Degrade-and-continue events and the sinks that receive them.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ResolveError;

/// Receives every non-fatal event raised while rewriting links.
///
/// Implementations must be shareable across threads: one `Bridge` may serve
/// many documents in parallel.
pub trait Reporter: Send + Sync {
    /// Annotation attributes were configured without the `attr_list`
    /// markdown extension. Called at most once per run.
    fn configuration_mismatch(&self);

    /// A link target could not be resolved.
    fn unresolved(&self, error: &ResolveError);

    /// A link was rewritten.
    fn rewritten(&self, original: &str, replacement: &str);
}

/// Default reporter: forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn configuration_mismatch(&self) {
        tracing::warn!(
            "the `invalid_link_attributes` setting will be ignored; \
             enable the `attr_list` markdown extension to use it"
        );
    }

    fn unresolved(&self, error: &ResolveError) {
        match error {
            ResolveError::NoCandidates { filename } => {
                tracing::error!(filename = %filename, "{error}");
            },
            ResolveError::UnresolvableTarget { filename, page_dir } => {
                tracing::warn!(filename = %filename, page_dir = %page_dir.display(), "{error}");
            },
        }
    }

    fn rewritten(&self, original: &str, replacement: &str) {
        tracing::debug!("{original} ==> {replacement}");
    }
}

/// Counts unresolved links while forwarding everything to an inner reporter.
#[derive(Debug, Default)]
pub struct CountingReporter<R> {
    /// Reporter that still receives every event.
    inner: R,
    /// Number of `NoCandidates` events seen.
    no_candidates: AtomicUsize,
    /// Number of `UnresolvableTarget` events seen.
    unresolvable: AtomicUsize,
}

impl<R: Reporter> CountingReporter<R> {
    /// Wrap `inner` with zeroed counters.
    pub const fn new(inner: R) -> Self {
        return Self {
            inner,
            no_candidates: AtomicUsize::new(0),
            unresolvable: AtomicUsize::new(0),
        };
    }

    /// Total unresolved events of either kind.
    pub fn unresolved_count(&self) -> usize {
        let unresolvable = self.unresolvable.load(Ordering::Relaxed);
        return unresolvable.saturating_add(self.no_candidates.load(Ordering::Relaxed));
    }
}

impl<R: Reporter> Reporter for CountingReporter<R> {
    fn configuration_mismatch(&self) {
        self.inner.configuration_mismatch();
    }

    fn unresolved(&self, error: &ResolveError) {
        let counter = match error {
            ResolveError::NoCandidates { .. } => &self.no_candidates,
            ResolveError::UnresolvableTarget { .. } => &self.unresolvable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.inner.unresolved(error);
    }

    fn rewritten(&self, original: &str, replacement: &str) {
        self.inner.rewritten(original, replacement);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn configuration_mismatch(&self) {
        (**self).configuration_mismatch();
    }

    fn unresolved(&self, error: &ResolveError) {
        (**self).unresolved(error);
    }

    fn rewritten(&self, original: &str, replacement: &str) {
        (**self).rewritten(original, replacement);
    }
}
