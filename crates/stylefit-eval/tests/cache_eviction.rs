use stylefit_core::{Distance, FormatterFingerprint, SourceFingerprint, StyleFingerprint};
use stylefit_eval::{CacheKey, EvalCache, Evaluation};

fn key(tag: usize) -> CacheKey {
    CacheKey {
        formatter: FormatterFingerprint("fmt".to_string()),
        style: StyleFingerprint(format!("style-{tag}")),
        source: SourceFingerprint("src".to_string()),
    }
}

fn evaluation(distance: u64) -> Evaluation {
    Evaluation {
        distance: Distance(distance),
        hunks: Vec::new(),
        output_digest: Some(format!("digest-{distance}")),
        failure: None,
    }
}

#[test]
fn eviction_drops_bytes_but_keeps_summaries() {
    // Budget for two 100-byte outputs; the third insert evicts the least
    // recently used one.
    let cache = EvalCache::with_capacity(200);
    for tag in 0..3 {
        cache.get_or_compute(&key(tag), || (evaluation(tag as u64), Some(vec![b'x'; 100])));
    }
    assert!(cache.retained_bytes() <= 200);
    assert!(cache.stats().evicted_bytes >= 100);

    // Key 0 was used least recently: its bytes are gone, its summary is not.
    let (summary, bytes) = cache.lookup(&key(0)).expect("summary retained");
    assert_eq!(summary.distance, Distance(0));
    assert!(bytes.is_none(), "evicted entry must drop output bytes");

    let (_, bytes) = cache.lookup(&key(2)).expect("recent entry");
    assert!(bytes.is_some(), "most recent entry keeps its bytes");
}

#[test]
fn touching_an_entry_protects_it_from_eviction() {
    let cache = EvalCache::with_capacity(200);
    cache.get_or_compute(&key(0), || (evaluation(0), Some(vec![b'x'; 100])));
    cache.get_or_compute(&key(1), || (evaluation(1), Some(vec![b'x'; 100])));
    // Touch key 0 so key 1 becomes the LRU victim.
    cache.lookup(&key(0)).expect("entry 0");
    cache.get_or_compute(&key(2), || (evaluation(2), Some(vec![b'x'; 100])));

    let (_, bytes0) = cache.lookup(&key(0)).expect("entry 0");
    let (_, bytes1) = cache.lookup(&key(1)).expect("entry 1");
    assert!(bytes0.is_some());
    assert!(bytes1.is_none());
}

#[test]
fn summaries_are_never_counted_against_the_budget() {
    let cache = EvalCache::with_capacity(10);
    for tag in 0..5 {
        cache.get_or_compute(&key(tag), || (evaluation(tag as u64), None));
    }
    assert_eq!(cache.retained_bytes(), 0);
    for tag in 0..5 {
        assert!(cache.lookup(&key(tag)).is_some());
    }
}
