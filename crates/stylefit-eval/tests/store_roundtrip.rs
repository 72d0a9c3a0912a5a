use stylefit_core::{Distance, FormatterFingerprint, SourceFingerprint, StyleFingerprint};
use stylefit_eval::{CacheKey, Evaluation, SqliteStore};

fn key(tag: &str) -> CacheKey {
    CacheKey {
        formatter: FormatterFingerprint("fmt-1".to_string()),
        style: StyleFingerprint(format!("style-{tag}")),
        source: SourceFingerprint("src-1".to_string()),
    }
}

#[test]
fn stored_evaluations_roundtrip() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = SqliteStore::open(&dir.path().join("evals.sqlite")).expect("open store");

    let evaluation = Evaluation {
        distance: Distance(12),
        hunks: Vec::new(),
        output_digest: Some("digest".to_string()),
        failure: None,
    };
    store
        .put(&key("a"), &evaluation, Some(b"formatted output"))
        .expect("put");

    let (restored, output) = store.get(&key("a")).expect("get").expect("present");
    assert_eq!(restored, evaluation);
    assert_eq!(output.as_deref(), Some(b"formatted output".as_slice()));
    assert!(store.get(&key("b")).expect("get").is_none());
}

#[test]
fn failed_evaluations_are_not_persisted() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let store = SqliteStore::open(&dir.path().join("evals.sqlite")).expect("open store");

    let failed = Evaluation {
        distance: Distance::INFINITE,
        hunks: Vec::new(),
        output_digest: None,
        failure: Some("evaluation-timeout".to_string()),
    };
    store.put(&key("flaky"), &failed, None).expect("put");
    assert!(store.get(&key("flaky")).expect("get").is_none());
}

#[test]
fn store_survives_reopening() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("evals.sqlite");
    {
        let store = SqliteStore::open(&path).expect("open store");
        let evaluation = Evaluation {
            distance: Distance(1),
            hunks: Vec::new(),
            output_digest: Some("d".to_string()),
            failure: None,
        };
        store.put(&key("persist"), &evaluation, None).expect("put");
    }
    let store = SqliteStore::open(&path).expect("reopen store");
    let (restored, output) = store.get(&key("persist")).expect("get").expect("present");
    assert_eq!(restored.distance, Distance(1));
    assert!(output.is_none());
}
