use crate::plan::Plan;
use core::hash::Hasher;
use core::num::NonZeroUsize;
use lru::LruCache;
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::sync::Arc;

const DEFAULT_CAPACITY: usize = 256;

/// Least-recently-used cache of analyzed plans, keyed by a fingerprint of
/// the bytecode.
///
/// The fingerprint is a fast non-cryptographic hash; the cache is meant for
/// trusted, repeated workloads, not as a collision-resistant identity.
/// Cached plans are immutable and handed out as shared references.
pub struct AnalysisCache {
    inner: Mutex<LruCache<u64, Arc<Plan>>>,
}

impl core::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("len", &self.len())
            .finish()
    }
}

impl AnalysisCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn fingerprint(code: &[u8]) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(code);
        hasher.finish()
    }

    /// Return the cached plan for `code`, analyzing and inserting it on a
    /// miss. The least recently used plan is evicted at capacity.
    pub fn get_or_analyze(&self, code: &[u8]) -> Arc<Plan> {
        let fingerprint = Self::fingerprint(code);

        let mut inner = self.inner.lock();
        if let Some(plan) = inner.get(&fingerprint) {
            return plan.clone();
        }

        let plan = Arc::new(Plan::analyze(code));
        inner.put(fingerprint, plan.clone());
        plan
    }

    pub fn contains(&self, code: &[u8]) -> bool {
        self.inner.lock().contains(&Self::fingerprint(code))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CAPACITY).expect("nonzero"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_returns_shared_plan() {
        let cache = AnalysisCache::default();
        let code = [0x60, 0x01, 0x00];

        let a = cache.get_or_analyze(&code);
        let b = cache.get_or_analyze(&code);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = AnalysisCache::new(NonZeroUsize::new(2).unwrap());

        let one = [0x60, 0x01, 0x00];
        let two = [0x60, 0x02, 0x00];
        let three = [0x60, 0x03, 0x00];

        cache.get_or_analyze(&one);
        cache.get_or_analyze(&two);
        // Touch `one` so `two` is the eviction candidate.
        cache.get_or_analyze(&one);
        cache.get_or_analyze(&three);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&one));
        assert!(!cache.contains(&two));
        assert!(cache.contains(&three));
    }
}
