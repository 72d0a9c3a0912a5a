//! Candidates and the total order that drives every selection.

use std::cmp::Ordering;

use stylefit_core::{Distance, Style, StyleFingerprint, StyleFitError};

/// A style together with its evaluated aggregate distance.
///
/// Candidates are totally ordered by (aggregate distance ascending,
/// cardinality ascending, canonical style form ascending). The third key
/// compares canonical serialized bytes, so ties between equally simple
/// styles fall to the lexicographically earliest option name.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The style under evaluation.
    pub style: Style,
    /// Saturating sum of per-file distances across the corpus.
    pub distance: Distance,
    /// Count of non-default explicit options (base marker excluded).
    pub cardinality: usize,
    /// Style fingerprint, for dedup.
    pub fingerprint: StyleFingerprint,
    canonical: Vec<u8>,
}

impl Candidate {
    /// Builds a candidate, deriving cardinality and canonical form.
    pub fn new(
        style: Style,
        distance: Distance,
        base_option: Option<&str>,
    ) -> Result<Self, StyleFitError> {
        let cardinality = style.cardinality(base_option);
        let canonical = style.canonical_bytes()?;
        let fingerprint = style.fingerprint()?;
        Ok(Self {
            style,
            distance,
            cardinality,
            fingerprint,
            canonical,
        })
    }

    /// Compares under the candidate total order.
    pub fn order(&self, other: &Candidate) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.cardinality.cmp(&other.cardinality))
            .then_with(|| self.canonical.cmp(&other.canonical))
    }

    /// Strict-improvement rule used for greedy adoption: lower distance, or
    /// equal distance with strictly lower cardinality. A canonical-form tie
    /// alone never adopts, which keeps the greedy loop free of oscillation.
    pub fn improves_on(&self, other: &Candidate) -> bool {
        match self.distance.cmp(&other.distance) {
            Ordering::Less => true,
            Ordering::Equal => self.cardinality < other.cardinality,
            Ordering::Greater => false,
        }
    }
}

/// Returns the minimal candidate under the total order, if any.
pub fn select_min(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().min_by(|a, b| a.order(b))
}
