//! All available backends must report the same integer distance on the same
//! input pair. External tools are probed and the comparison is skipped when
//! a tool is absent, so the suite stays hermetic.

use stylefit_diff::{BackendChoice, DiffMetric};

fn pairs() -> Vec<(&'static [u8], &'static [u8])> {
    vec![
        (b"a\nb\nc\n".as_slice(), b"a\nb\nc\n".as_slice()),
        (b"a\nb\nc\n".as_slice(), b"a\nB\nc\n".as_slice()),
        (b"a\nc\n".as_slice(), b"a\nb\nc\n".as_slice()),
        (b"one\ntwo\nthree\n".as_slice(), b"one\n".as_slice()),
        (b"x\ny\n".as_slice(), b"x\ny".as_slice()),
    ]
}

#[test]
fn internal_backend_is_always_selectable() {
    let metric = DiffMetric::select(BackendChoice::Internal).expect("internal backend");
    for (reference, candidate) in pairs() {
        metric.diff_bytes(reference, candidate).expect("diff");
    }
}

#[test]
fn auto_selection_matches_internal_distances() {
    let auto = DiffMetric::select(BackendChoice::Auto).expect("auto backend");
    let internal = DiffMetric::select(BackendChoice::Internal).expect("internal backend");
    for (reference, candidate) in pairs() {
        let a = auto.diff_bytes(reference, candidate).expect("auto diff");
        let b = internal.diff_bytes(reference, candidate).expect("internal diff");
        assert_eq!(
            a.distance, b.distance,
            "backends disagree on {:?} vs {:?}",
            String::from_utf8_lossy(reference),
            String::from_utf8_lossy(candidate)
        );
    }
}

#[test]
fn external_diff_matches_internal_when_present() {
    let Ok(external) = DiffMetric::select(BackendChoice::ExternalDiff) else {
        return; // tool not installed; probe already validated counting elsewhere
    };
    let internal = DiffMetric::select(BackendChoice::Internal).expect("internal backend");
    for (reference, candidate) in pairs() {
        let a = external.diff_bytes(reference, candidate).expect("external diff");
        let b = internal.diff_bytes(reference, candidate).expect("internal diff");
        assert_eq!(a.distance, b.distance);
    }
}

#[test]
fn external_git_matches_internal_when_present() {
    let Ok(external) = DiffMetric::select(BackendChoice::ExternalGit) else {
        return;
    };
    let internal = DiffMetric::select(BackendChoice::Internal).expect("internal backend");
    for (reference, candidate) in pairs() {
        let a = external.diff_bytes(reference, candidate).expect("external diff");
        let b = internal.diff_bytes(reference, candidate).expect("internal diff");
        assert_eq!(a.distance, b.distance);
    }
}
