//! Rendered values and the candidate sets handed to display functions.

use crate::feature::{ConstraintMap, SemanticFeature};
use crate::speakable::SpeakableString;

/// A rendered string together with the feature values realized in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    display_string: String,
    constraints: ConstraintMap,
}

impl DisplayValue {
    pub fn new(display_string: impl Into<String>, constraints: ConstraintMap) -> Self {
        Self {
            display_string: display_string.into(),
            constraints,
        }
    }

    /// Build from a speakable string. A spoken rendering that differs from
    /// the printed one is recorded under `speak_feature`, unless
    /// `constraints` already carries a speak entry.
    pub fn from_speakable(
        value: &SpeakableString,
        speak_feature: &SemanticFeature,
        mut constraints: ConstraintMap,
    ) -> Self {
        if !value.speak_equals_print() && !constraints.contains(speak_feature) {
            constraints.insert(speak_feature.clone(), value.speak());
        }
        Self {
            display_string: value.print().to_string(),
            constraints,
        }
    }

    pub fn display_string(&self) -> &str {
        &self.display_string
    }

    pub fn constraint_map(&self) -> &ConstraintMap {
        &self.constraints
    }

    /// Direct lookup of an already realized feature value.
    pub fn feature_value(&self, feature: &SemanticFeature) -> Option<&str> {
        self.constraints.get(feature)
    }
}

/// Candidate display values a display function chooses from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayData {
    values: Vec<DisplayValue>,
}

impl DisplayData {
    pub fn new(values: Vec<DisplayValue>) -> Self {
        Self { values }
    }

    pub fn single(value: DisplayValue) -> Self {
        Self {
            values: vec![value],
        }
    }

    pub fn values(&self) -> &[DisplayValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayValue> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
