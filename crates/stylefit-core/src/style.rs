//! Styles: concrete assignments of option names to values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::StyleFitError;
use crate::fingerprint::{sha256_hex, StyleFingerprint};
use crate::option::OptionValue;
use crate::serde::to_canonical_json_bytes;

/// A mapping from option names to chosen values.
///
/// Keys are unique and held in canonical (sorted) order, so serialization is
/// stable and two styles with equal content are interchangeable everywhere.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Style {
    options: BTreeMap<String, OptionValue>,
}

impl Style {
    /// Creates an empty style (every option at the formatter's default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a style from (name, value) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, OptionValue)>,
        S: Into<String>,
    {
        Self {
            options: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Returns the value explicitly set for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Sets `name` to `value`, replacing any previous assignment.
    pub fn set(&mut self, name: impl Into<String>, value: OptionValue) {
        self.options.insert(name.into(), value);
    }

    /// Merges a single child assignment into the nested value under `parent`.
    ///
    /// Used when substituting trial values for composite options: existing
    /// sibling children are preserved.
    pub fn set_nested(&mut self, parent: &str, child: impl Into<String>, value: OptionValue) {
        let entry = self
            .options
            .entry(parent.to_string())
            .or_insert_with(|| OptionValue::Nested(BTreeMap::new()));
        if let OptionValue::Nested(children) = entry {
            children.insert(child.into(), value);
        } else {
            let mut children = BTreeMap::new();
            children.insert(child.into(), value);
            *entry = OptionValue::Nested(children);
        }
    }

    /// Removes the explicit assignment for `name`, if present.
    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.options.remove(name)
    }

    /// Returns true when no option is explicitly set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates (name, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.options.iter()
    }

    /// Number of explicitly set leaf options, counted through nested values,
    /// excluding the adapter's base-style marker option if any.
    pub fn cardinality(&self, base_option: Option<&str>) -> usize {
        self.options
            .iter()
            .filter(|(name, _)| Some(name.as_str()) != base_option)
            .map(|(_, value)| value.leaf_count())
            .sum()
    }

    /// Canonical JSON serialization; byte-identical for equal styles.
    ///
    /// Comparing canonical forms bytewise yields the total order used for
    /// candidate tie-breaking: the first differing option name decides.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, StyleFitError> {
        to_canonical_json_bytes(self)
    }

    /// SHA-256 fingerprint of the canonical form.
    pub fn fingerprint(&self) -> Result<StyleFingerprint, StyleFitError> {
        Ok(StyleFingerprint(sha256_hex(&self.canonical_bytes()?)))
    }
}

impl FromIterator<(String, OptionValue)> for Style {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

/// A base style exposed by a formatter: a preset bundle with a stable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStyle {
    /// Preset name as the formatter spells it (e.g. "LLVM").
    pub name: String,
    /// The options the preset sets explicitly.
    pub style: Style,
}

impl NamedStyle {
    /// Creates a named preset bundle.
    pub fn new(name: impl Into<String>, style: Style) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }
}
