//! Formatter option declarations: names, value domains, defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete value chosen for an option.
///
/// The untagged representation keeps canonical JSON close to the formatters'
/// own config syntax (`true`, `2`, `"Google"`, nested mappings).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean toggle.
    Bool(bool),
    /// Bounded integer.
    Int(i64),
    /// One token out of an enumerated domain.
    Enum(String),
    /// Values for the children of a composite option.
    Nested(BTreeMap<String, OptionValue>),
}

impl OptionValue {
    /// Canonical single-line token for ordering and display.
    pub fn token(&self) -> String {
        match self {
            OptionValue::Bool(v) => v.to_string(),
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Enum(v) => v.clone(),
            OptionValue::Nested(children) => {
                let inner: Vec<String> = children
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value.token()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }

    /// Number of leaf values carried by this value (1 for scalars).
    pub fn leaf_count(&self) -> usize {
        match self {
            OptionValue::Nested(children) => {
                children.values().map(OptionValue::leaf_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Value domain of an option, matched on by the trial generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionDomain {
    /// A fixed set of value tokens, in the adapter's canonical order.
    Enumerated {
        /// Admissible tokens; every one of them is tried.
        values: Vec<String>,
    },
    /// A true/false toggle.
    Boolean,
    /// A bounded integer with an adapter-declared sweep.
    BoundedInt {
        /// Smallest admissible value.
        min: i64,
        /// Largest admissible value.
        max: i64,
        /// Values the search actually tries. Declared by the adapter;
        /// the engine never invents sweep values.
        sweep: Vec<i64>,
    },
    /// A mapping of child options, each with its own domain.
    Composite {
        /// Child option declarations in canonical order.
        children: Vec<OptionDef>,
    },
}

/// Declaration of a single formatter option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Option name as the formatter spells it.
    pub name: String,
    /// Value domain.
    pub domain: OptionDomain,
    /// The formatter's canonical default for this option.
    pub default: OptionValue,
}

impl OptionDef {
    /// Declares an enumerated option.
    pub fn enumerated(
        name: impl Into<String>,
        values: &[&str],
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: OptionDomain::Enumerated {
                values: values.iter().map(|v| (*v).to_string()).collect(),
            },
            default: OptionValue::Enum(default.into()),
        }
    }

    /// Declares a boolean option.
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            domain: OptionDomain::Boolean,
            default: OptionValue::Bool(default),
        }
    }

    /// Declares a bounded integer option with its sweep.
    pub fn bounded_int(name: impl Into<String>, min: i64, max: i64, sweep: &[i64], default: i64) -> Self {
        Self {
            name: name.into(),
            domain: OptionDomain::BoundedInt {
                min,
                max,
                sweep: sweep.to_vec(),
            },
            default: OptionValue::Int(default),
        }
    }

    /// Declares a composite option from child declarations.
    pub fn composite(name: impl Into<String>, children: Vec<OptionDef>) -> Self {
        let default = OptionValue::Nested(
            children
                .iter()
                .map(|child| (child.name.clone(), child.default.clone()))
                .collect(),
        );
        Self {
            name: name.into(),
            domain: OptionDomain::Composite { children },
            default,
        }
    }

    /// Returns true when `value` lies inside this option's domain.
    pub fn admits(&self, value: &OptionValue) -> bool {
        match (&self.domain, value) {
            (OptionDomain::Enumerated { values }, OptionValue::Enum(token)) => {
                values.iter().any(|v| v == token)
            }
            (OptionDomain::Boolean, OptionValue::Bool(_)) => true,
            (OptionDomain::BoundedInt { min, max, .. }, OptionValue::Int(v)) => {
                *min <= *v && *v <= *max
            }
            (OptionDomain::Composite { children }, OptionValue::Nested(assignments)) => {
                assignments.iter().all(|(name, child_value)| {
                    children
                        .iter()
                        .find(|child| &child.name == name)
                        .is_some_and(|child| child.admits(child_value))
                })
            }
            _ => false,
        }
    }
}
