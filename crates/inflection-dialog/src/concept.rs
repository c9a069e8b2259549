//! Inflectable string concepts.
//!
//! A concept is a base value plus requested constraints. Resolution of a
//! single feature walks a fixed chain and stops at the first tier that
//! produces a value:
//!
//! 1. an explicit override in the concept's own constraints;
//! 2. the guessed display value (its realized features, then the model's
//!    feature function on it, then on the base display value);
//! 3. the constraints the concept was constructed with;
//! 4. the model's feature function on the base display value;
//! 5. nothing.
//!
//! Tier 2 has one linguistic special case: when the rendered form also
//! realizes `number`, its `gender` may be an artifact of the plural form, so
//! `gender` is taken from the un-numbered base form instead.

use crate::display::{DisplayData, DisplayValue};
use crate::feature::{ConstraintMap, SemanticFeature, GENDER_FEATURE, NUMBER_FEATURE};
use crate::model::FeatureModel;
use crate::speakable::SpeakableString;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConceptError {
    #[error("unknown semantic feature `{name}`")]
    UnknownFeature { name: String },
}

/// A string that can be rendered under grammatical constraints.
///
/// Cloning copies the override constraints; the clone shares the model.
#[derive(Clone)]
pub struct InflectableStringConcept<'m> {
    model: &'m dyn FeatureModel,
    value: SpeakableString,
    default_display_value: DisplayValue,
    constraints: ConstraintMap,
}

impl<'m> InflectableStringConcept<'m> {
    pub fn new(model: &'m dyn FeatureModel, value: SpeakableString) -> Self {
        Self::with_constraints(model, value, ConstraintMap::new())
    }

    /// Build a concept whose base display value carries `initial_constraints`.
    ///
    /// The initial constraints describe the base value; they are not override
    /// constraints and never reach the model's display function as requests.
    pub fn with_constraints(
        model: &'m dyn FeatureModel,
        value: SpeakableString,
        initial_constraints: ConstraintMap,
    ) -> Self {
        let speak_feature = model.speak_feature();
        assert!(
            model.feature(speak_feature.name()).is_some(),
            "feature model does not register its speak feature `{speak_feature}`"
        );
        let default_display_value =
            DisplayValue::from_speakable(&value, speak_feature, initial_constraints);
        Self {
            model,
            value,
            default_display_value,
            constraints: ConstraintMap::new(),
        }
    }

    pub fn model(&self) -> &'m dyn FeatureModel {
        self.model
    }

    pub fn speak_feature(&self) -> &'m SemanticFeature {
        self.model.speak_feature()
    }

    pub fn value(&self) -> &SpeakableString {
        &self.value
    }

    pub fn default_display_value(&self) -> &DisplayValue {
        &self.default_display_value
    }

    // ------------------------------------------------------------------
    // Override constraints
    // ------------------------------------------------------------------

    pub fn constraints(&self) -> &ConstraintMap {
        &self.constraints
    }

    pub fn constraint(&self, feature: &SemanticFeature) -> Option<&str> {
        self.constraints.get(feature)
    }

    pub fn has_constraint(&self, feature: &SemanticFeature) -> bool {
        self.constraints.contains(feature)
    }

    pub fn put_constraint(&mut self, feature: &SemanticFeature, value: impl Into<String>) {
        self.constraints.insert(feature.clone(), value);
    }

    /// Like [`Self::put_constraint`], resolving the feature through the model.
    ///
    /// Values are not checked against the feature's declared values.
    pub fn put_constraint_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ConceptError> {
        let feature = self.lookup(name)?;
        self.constraints.insert(feature.clone(), value);
        Ok(())
    }

    pub fn clear_constraint(&mut self, feature: &SemanticFeature) {
        self.constraints.remove(feature);
    }

    /// Drop every override constraint.
    pub fn reset(&mut self) {
        self.constraints.clear();
    }

    fn lookup(&self, name: &str) -> Result<&'m SemanticFeature, ConceptError> {
        self.model
            .feature(name)
            .ok_or_else(|| ConceptError::UnknownFeature {
                name: name.to_string(),
            })
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Resolve the best known value of `feature`, or `None`.
    pub fn feature_value(&self, feature: &SemanticFeature) -> Option<SpeakableString> {
        if let Some(value) = self.constraints.get(feature) {
            tracing::trace!(feature = %feature, "resolved from override constraint");
            return Some(SpeakableString::new(value));
        }

        let feature_function = self.model.default_feature_function(feature);

        if let Some(display_value) = self.display_value(true) {
            let (computed, base) = match feature_function {
                Some(function) => (
                    function.feature_value(&display_value, &self.constraints),
                    function.feature_value(&self.default_display_value, &self.constraints),
                ),
                None => (None, None),
            };

            let display_constraints = display_value.constraint_map();
            if let Some(value) = display_constraints.get(feature) {
                if base.is_some() && self.number_also_realized(feature, display_constraints) {
                    tracing::trace!(
                        feature = %feature,
                        "number realized in display value; using base-form gender"
                    );
                    return base;
                }
                tracing::trace!(feature = %feature, "resolved from display value");
                return Some(SpeakableString::new(value));
            }
            if computed.is_some() {
                tracing::trace!(feature = %feature, "resolved by feature function on display value");
                return computed;
            }
            if base.is_some() {
                tracing::trace!(feature = %feature, "resolved by feature function on base value");
                return base;
            }
        }

        if let Some(value) = self.default_display_value.feature_value(feature) {
            tracing::trace!(feature = %feature, "resolved from initial constraints");
            return Some(SpeakableString::new(value));
        }

        let fallback = feature_function.and_then(|function| {
            function.feature_value(&self.default_display_value, &self.constraints)
        });
        if fallback.is_none() {
            tracing::trace!(feature = %feature, "feature value unresolved");
        }
        fallback
    }

    /// [`Self::feature_value`] for a feature named in the model.
    pub fn feature_value_by_name(
        &self,
        name: &str,
    ) -> Result<Option<SpeakableString>, ConceptError> {
        let feature = self.lookup(name)?;
        Ok(self.feature_value(feature))
    }

    fn number_also_realized(
        &self,
        feature: &SemanticFeature,
        display_constraints: &ConstraintMap,
    ) -> bool {
        feature.name() == GENDER_FEATURE
            && self
                .model
                .feature(NUMBER_FEATURE)
                .is_some_and(|number| display_constraints.contains(number))
    }

    /// Render the concept under its current constraints.
    ///
    /// Without `allow_guess` a value is only returned when the model's display
    /// function actually produced one for the requested constraints.
    pub fn display_value(&self, allow_guess: bool) -> Option<DisplayValue> {
        if !self.constraints.is_empty() {
            if let Some(function) = self.model.default_display_function() {
                let data = DisplayData::single(self.default_display_value.clone());
                if let Some(value) = function.display_value(&data, &self.constraints, allow_guess)
                {
                    return Some(value);
                }
            }
        }
        if allow_guess {
            return Some(self.default_display_value.clone());
        }
        None
    }

    /// Whether a non-guessed rendering exists under the current constraints.
    pub fn exists(&self) -> bool {
        self.display_value(false).is_some()
    }

    /// The base value's printed text, independent of any constraint.
    pub fn canonical_text(&self) -> &str {
        self.value.print()
    }

    /// The rendered text with its spoken form, if the rendering carries one.
    pub fn to_speakable_string(&self) -> Option<SpeakableString> {
        let display_value = self.display_value(true)?;
        let speak_feature = self.model.speak_feature();
        Some(match display_value.feature_value(speak_feature) {
            Some(speak) => SpeakableString::with_speak(display_value.display_string(), speak),
            None => SpeakableString::new(display_value.display_string()),
        })
    }
}

impl fmt::Display for InflectableStringConcept<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_text())
    }
}

impl fmt::Debug for InflectableStringConcept<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InflectableStringConcept")
            .field("value", &self.value)
            .field("default_display_value", &self.default_display_value)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}
