//! Trial generation: every (option, admissible value) substitution away
//! from a candidate style, in canonical order.

use std::collections::{BTreeMap, BTreeSet};

use stylefit_core::{OptionDef, OptionDomain, OptionValue, Style, StyleFitError};

/// One substitution applied to the current style.
#[derive(Debug, Clone)]
pub struct Trial {
    /// Option name (dotted `parent.child` for composite children).
    pub option: String,
    /// Canonical token of the substituted value.
    pub value_token: String,
    /// The resulting trial style.
    pub style: Style,
}

/// Enumerates every admissible substitution, deduplicated by style
/// fingerprint, keeping the first occurrence in canonical order
/// (options sorted by name, values in domain declaration order).
///
/// Substituting an option's default removes it from the explicit map, so
/// trials can lower cardinality as well as distance.
pub fn generate_trials(options: &[OptionDef], current: &Style) -> Result<Vec<Trial>, StyleFitError> {
    let mut sorted: Vec<&OptionDef> = options.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut trials = Vec::new();
    for def in sorted {
        match &def.domain {
            OptionDomain::Composite { children } => {
                let current_children = nested_children(current, &def.name);
                for child in children {
                    let current_value = current_children
                        .get(&child.name)
                        .cloned()
                        .unwrap_or_else(|| child.default.clone());
                    for value in admissible_values(child) {
                        if value == current_value {
                            continue;
                        }
                        let style =
                            substitute_child(current, def, child, value.clone());
                        trials.push(Trial {
                            option: format!("{}.{}", def.name, child.name),
                            value_token: value.token(),
                            style,
                        });
                    }
                }
            }
            _ => {
                let current_value = current
                    .get(&def.name)
                    .cloned()
                    .unwrap_or_else(|| def.default.clone());
                for value in admissible_values(def) {
                    if value == current_value {
                        continue;
                    }
                    let style = substitute_scalar(current, def, value.clone());
                    trials.push(Trial {
                        option: def.name.clone(),
                        value_token: value.token(),
                        style,
                    });
                }
            }
        }
    }

    dedup_by_fingerprint(trials)
}

/// Admissible values for a scalar option, in domain declaration order.
pub fn admissible_values(def: &OptionDef) -> Vec<OptionValue> {
    match &def.domain {
        OptionDomain::Enumerated { values } => values
            .iter()
            .map(|token| OptionValue::Enum(token.clone()))
            .collect(),
        OptionDomain::Boolean => vec![OptionValue::Bool(true), OptionValue::Bool(false)],
        OptionDomain::BoundedInt { min, max, sweep } => sweep
            .iter()
            .filter(|value| *min <= **value && **value <= *max)
            .map(|value| OptionValue::Int(*value))
            .collect(),
        // Composite options are expanded child by child, never as a whole.
        OptionDomain::Composite { .. } => Vec::new(),
    }
}

/// Substitutes a scalar option value, removing the entry when it matches
/// the option's default.
pub fn substitute_scalar(current: &Style, def: &OptionDef, value: OptionValue) -> Style {
    let mut next = current.clone();
    if value == def.default {
        next.remove(&def.name);
    } else {
        next.set(def.name.clone(), value);
    }
    next
}

fn substitute_child(
    current: &Style,
    parent: &OptionDef,
    child: &OptionDef,
    value: OptionValue,
) -> Style {
    let mut children = nested_children(current, &parent.name);
    if value == child.default {
        children.remove(&child.name);
    } else {
        children.insert(child.name.clone(), value);
    }
    let mut next = current.clone();
    if children.is_empty() {
        next.remove(&parent.name);
    } else {
        next.set(parent.name.clone(), OptionValue::Nested(children));
    }
    next
}

fn nested_children(style: &Style, parent: &str) -> BTreeMap<String, OptionValue> {
    match style.get(parent) {
        Some(OptionValue::Nested(children)) => children.clone(),
        _ => BTreeMap::new(),
    }
}

fn dedup_by_fingerprint(trials: Vec<Trial>) -> Result<Vec<Trial>, StyleFitError> {
    let mut seen = BTreeSet::new();
    let mut unique = Vec::with_capacity(trials.len());
    for trial in trials {
        let fingerprint = trial.style.fingerprint()?;
        if seen.insert(fingerprint) {
            unique.push(trial);
        }
    }
    Ok(unique)
}
