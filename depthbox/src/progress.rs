//! User-visible progress for long running stages.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressId(pub u64);

/// Something able to show that work is underway.
///
/// Every [`ProgressId`] handed out by `begin` receives exactly one `end`.
pub trait ProgressReporter: Send + Sync {
    fn begin(&self, title: &str, message: &str) -> ProgressId;

    fn end(&self, id: ProgressId);
}

/// Reports progress through `tracing`
#[derive(Debug, Default)]
pub struct TracingProgress {
    next: AtomicU64,
    running: DashMap<ProgressId, (String, Instant)>,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages begun and not yet ended
    pub fn running(&self) -> usize {
        self.running.len()
    }
}

impl ProgressReporter for TracingProgress {
    fn begin(&self, title: &str, message: &str) -> ProgressId {
        let id = ProgressId(self.next.fetch_add(1, Ordering::Relaxed));
        tracing::info!("{title}: {message}");
        self.running.insert(id, (title.to_string(), Instant::now()));
        id
    }

    fn end(&self, id: ProgressId) {
        match self.running.remove(&id) {
            Some((_, (title, started))) => {
                tracing::info!("{title} done in {:?}", started.elapsed())
            }
            None => tracing::warn!("Progress {:?} ended twice or was never begun", id),
        }
    }
}

/// Ends its progress indicator when dropped, including on early returns
pub struct ProgressScope {
    reporter: Arc<dyn ProgressReporter>,
    id: ProgressId,
}

impl ProgressScope {
    pub fn begin(reporter: Arc<dyn ProgressReporter>, title: &str, message: &str) -> Self {
        let id = reporter.begin(title, message);
        Self { reporter, id }
    }
}

impl Drop for ProgressScope {
    fn drop(&mut self) {
        self.reporter.end(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_ends_on_drop() {
        let reporter = Arc::new(TracingProgress::new());
        {
            let _outer = ProgressScope::begin(reporter.clone(), "Depth skybox", "outer");
            let _inner = ProgressScope::begin(reporter.clone(), "Depth skybox", "inner");
            assert_eq!(reporter.running(), 2);
        }
        assert_eq!(reporter.running(), 0);
    }

    #[test]
    fn scope_ends_on_early_return() {
        fn fails(reporter: Arc<dyn ProgressReporter>) -> Result<(), ()> {
            let _scope = ProgressScope::begin(reporter, "Depth skybox", "failing");
            Err(())
        }
        let reporter = Arc::new(TracingProgress::new());
        assert!(fails(reporter.clone()).is_err());
        assert_eq!(reporter.running(), 0);
    }
}
