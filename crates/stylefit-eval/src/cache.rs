//! Process-local evaluation cache.
//!
//! Guarantees at-most-one concurrent evaluation per key: a second request
//! for an in-flight key blocks on the first and receives the same result.
//! Eviction is bounded by the total byte footprint of retained reformatted
//! outputs, least-recently-used first; the (distance, hunks, digest)
//! summary survives eviction because the search needs distances far more
//! often than bytes.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use serde::{Deserialize, Serialize};

use stylefit_core::{Distance, FormatterFingerprint, SourceFingerprint, StyleFingerprint};
use stylefit_diff::Hunk;

/// Composite cache key; the formatter fingerprint prevents aliasing across
/// tools and tool upgrades.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Formatter binary + version identity.
    pub formatter: FormatterFingerprint,
    /// Style fingerprint.
    pub style: StyleFingerprint,
    /// Source content fingerprint.
    pub source: SourceFingerprint,
}

/// The retained summary of one (style, file) evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Line distance; infinite when the pair could not be evaluated.
    pub distance: Distance,
    /// Positional hunks of the diff (empty on failure).
    pub hunks: Vec<Hunk>,
    /// SHA-256 of the reformatted bytes; `None` when the formatter failed.
    pub output_digest: Option<String>,
    /// Stable failure code when the distance was degraded to infinite.
    pub failure: Option<String>,
}

/// Counters exposed for diagnostics and cache-correctness tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from a completed entry.
    pub hits: u64,
    /// Lookups that triggered a computation.
    pub misses: u64,
    /// Lookups that blocked on another thread's in-flight computation.
    pub coalesced: u64,
    /// Output bytes dropped by LRU eviction.
    pub evicted_bytes: u64,
}

#[derive(Debug)]
struct Entry {
    summary: Arc<Evaluation>,
    output: Option<Arc<Vec<u8>>>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Flight {
    done: Mutex<Option<(Arc<Evaluation>, Option<Arc<Vec<u8>>>)>>,
    cv: Condvar,
}

#[derive(Debug)]
enum Slot {
    Ready(Entry),
    Pending(Arc<Flight>),
}

#[derive(Debug, Default)]
struct Inner {
    map: HashMap<CacheKey, Slot>,
    retained_bytes: usize,
    clock: u64,
    stats: CacheStats,
}

/// Thread-safe evaluation cache. See the module docs for the contract.
#[derive(Debug)]
pub struct EvalCache {
    inner: Mutex<Inner>,
    capacity_bytes: usize,
}

impl EvalCache {
    /// Default byte budget for retained reformatted outputs.
    pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

    /// Creates a cache bounded by `capacity_bytes` of retained output.
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity_bytes,
        }
    }

    /// Creates a cache with the default byte budget.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY_BYTES)
    }

    /// Returns the completed entry for `key` without computing.
    pub fn lookup(&self, key: &CacheKey) -> Option<(Arc<Evaluation>, Option<Arc<Vec<u8>>>)> {
        let mut inner = lock_ignore_poison(&self.inner);
        inner.clock += 1;
        let clock = inner.clock;
        match inner.map.get_mut(key) {
            Some(Slot::Ready(entry)) => {
                entry.last_used = clock;
                Some((Arc::clone(&entry.summary), entry.output.clone()))
            }
            _ => None,
        }
    }

    /// Returns the cached result for `key`, computing it at most once across
    /// all concurrent callers.
    pub fn get_or_compute<F>(&self, key: &CacheKey, compute: F) -> (Arc<Evaluation>, Option<Arc<Vec<u8>>>)
    where
        F: FnOnce() -> (Evaluation, Option<Vec<u8>>),
    {
        let flight = {
            let mut inner = lock_ignore_poison(&self.inner);
            inner.clock += 1;
            let clock = inner.clock;
            let Inner { map, stats, .. } = &mut *inner;
            match map.get_mut(key) {
                Some(Slot::Ready(entry)) => {
                    entry.last_used = clock;
                    stats.hits += 1;
                    return (Arc::clone(&entry.summary), entry.output.clone());
                }
                Some(Slot::Pending(flight)) => {
                    stats.coalesced += 1;
                    Some(Arc::clone(flight))
                }
                None => {
                    stats.misses += 1;
                    map.insert(key.clone(), Slot::Pending(Arc::new(Flight::default())));
                    None
                }
            }
        };

        if let Some(flight) = flight {
            // Another caller owns the computation; block on its outcome.
            let mut done = lock_ignore_poison(&flight.done);
            loop {
                if let Some(result) = done.as_ref() {
                    return result.clone();
                }
                done = flight
                    .cv
                    .wait(done)
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
            }
        }

        let (evaluation, output_bytes) = compute();
        let summary = Arc::new(evaluation);
        let output = output_bytes.map(Arc::new);

        let mut inner = lock_ignore_poison(&self.inner);
        inner.clock += 1;
        let clock = inner.clock;
        if let Some(bytes) = &output {
            inner.retained_bytes += bytes.len();
        }
        let previous = inner.map.insert(
            key.clone(),
            Slot::Ready(Entry {
                summary: Arc::clone(&summary),
                output: output.clone(),
                last_used: clock,
            }),
        );
        self.evict_to_budget(&mut inner, key);
        drop(inner);

        if let Some(Slot::Pending(flight)) = previous {
            let mut done = lock_ignore_poison(&flight.done);
            *done = Some((Arc::clone(&summary), output.clone()));
            flight.cv.notify_all();
        }
        // Re-read the entry: eviction may already have dropped the bytes,
        // but this caller still gets the output it just produced.
        (summary, output)
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        lock_ignore_poison(&self.inner).stats
    }

    /// Bytes of reformatted output currently retained.
    pub fn retained_bytes(&self) -> usize {
        lock_ignore_poison(&self.inner).retained_bytes
    }

    fn evict_to_budget(&self, inner: &mut Inner, just_inserted: &CacheKey) {
        while inner.retained_bytes > self.capacity_bytes {
            let victim = inner
                .map
                .iter()
                .filter_map(|(key, slot)| match slot {
                    Slot::Ready(entry) if entry.output.is_some() && key != just_inserted => {
                        Some((entry.last_used, key.clone()))
                    }
                    _ => None,
                })
                .min_by_key(|(used, _)| *used)
                .map(|(_, key)| key);
            let Some(victim) = victim else {
                break;
            };
            if let Some(Slot::Ready(entry)) = inner.map.get_mut(&victim) {
                if let Some(bytes) = entry.output.take() {
                    inner.retained_bytes -= bytes.len();
                    inner.stats.evicted_bytes += bytes.len() as u64;
                }
            }
        }
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks a mutex, recovering the guard when a worker panicked while holding
/// it. The cache stays usable; the panicking evaluation is simply absent.
fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
