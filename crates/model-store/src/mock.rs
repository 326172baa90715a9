//! Generator doubles for tests: fixed output and call counting.

use model_types::{ResultGenerator, ResultSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Always returns a clone of the same result set.
pub struct FixedResultGenerator {
    results: ResultSet,
}

impl FixedResultGenerator {
    pub fn new(results: ResultSet) -> Self {
        Self { results }
    }

    /// A single cluster with `occurrences` occurrences and one member.
    pub fn single_cluster(occurrences: u32) -> Self {
        Self::new(ResultSet::from_groups(vec![(
            occurrences,
            vec!["AAAAAAAAAA".to_string()],
        )]))
    }
}

impl ResultGenerator for FixedResultGenerator {
    fn generate(&self, _model_id: &str) -> ResultSet {
        self.results.clone()
    }
}

/// Wraps another generator and counts how often it runs.
pub struct CountingResultGenerator<G> {
    inner: G,
    calls: Arc<AtomicUsize>,
}

impl<G: ResultGenerator> CountingResultGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter; stays readable after the generator is moved into a store.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<G: ResultGenerator> ResultGenerator for CountingResultGenerator<G> {
    fn generate(&self, model_id: &str) -> ResultSet {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(model_id)
    }
}
