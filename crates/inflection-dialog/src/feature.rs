//! Semantic features and constraint maps.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of the feature whose display value is re-derived from the base form
/// when a `number` inflection is also present.
pub const GENDER_FEATURE: &str = "gender";

/// Name of the feature that triggers the gender tie-break.
pub const NUMBER_FEATURE: &str = "number";

/// Default name of the distinguished spoken-form feature.
pub const DEFAULT_SPEAK_FEATURE: &str = "speak";

/// A named grammatical dimension (gender, number, case, speak, ...).
///
/// Identity is the name: two features with the same name compare equal even
/// if they were declared with different value sets. Uniqueness of names is
/// owned by the model that hands features out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticFeature {
    name: String,
    /// Bounded values; empty means the feature accepts any value.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    values: BTreeSet<String>,
}

impl SemanticFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeSet::new(),
        }
    }

    pub fn bounded<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    pub fn is_bounded(&self) -> bool {
        !self.values.is_empty()
    }

    /// Whether `value` is acceptable for this feature. Unbounded features
    /// accept anything.
    pub fn accepts(&self, value: &str) -> bool {
        self.values.is_empty() || self.values.contains(value)
    }
}

impl PartialEq for SemanticFeature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SemanticFeature {}

impl PartialOrd for SemanticFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for SemanticFeature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for SemanticFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Feature values keyed by feature.
///
/// Used both for requested constraints and for the feature values realized
/// by a rendered string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintMap {
    entries: BTreeMap<SemanticFeature, String>,
}

impl ConstraintMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: &SemanticFeature) -> Option<&str> {
        self.entries.get(feature).map(String::as_str)
    }

    /// Insert or overwrite; returns the previous value.
    pub fn insert(&mut self, feature: SemanticFeature, value: impl Into<String>) -> Option<String> {
        self.entries.insert(feature, value.into())
    }

    pub fn remove(&mut self, feature: &SemanticFeature) -> Option<String> {
        self.entries.remove(feature)
    }

    pub fn contains(&self, feature: &SemanticFeature) -> bool {
        self.entries.contains_key(feature)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, SemanticFeature, String> {
        self.entries.iter()
    }

    /// Copy every entry of `other` into `self`, overwriting on conflict.
    pub fn extend_from(&mut self, other: &ConstraintMap) {
        for (feature, value) in other.iter() {
            self.entries.insert(feature.clone(), value.clone());
        }
    }
}

impl FromIterator<(SemanticFeature, String)> for ConstraintMap {
    fn from_iter<T: IntoIterator<Item = (SemanticFeature, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConstraintMap {
    type Item = (&'a SemanticFeature, &'a String);
    type IntoIter = btree_map::Iter<'a, SemanticFeature, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for ConstraintMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (feature, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{feature}={value}")?;
        }
        f.write_str("}")
    }
}
