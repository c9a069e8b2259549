//! Feature models: the registry and strategies a concept resolves against.
//!
//! A concept never inflects anything itself. It asks its model for:
//! - feature identities by name,
//! - the distinguished speak feature,
//! - an optional [`DisplayFunction`] that renders a whole value, and
//! - an optional per-feature [`FeatureFunction`] that derives one feature's
//!   value from a rendered value.
//!
//! [`SemanticFeatureModel`] is the table-driven implementation; anything else
//! that implements [`FeatureModel`] (e.g. a real morphology engine) can be
//! plugged in instead.

use crate::display::{DisplayData, DisplayValue};
use crate::feature::{ConstraintMap, SemanticFeature, DEFAULT_SPEAK_FEATURE};
use crate::speakable::SpeakableString;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Renders a display value from candidates under requested constraints.
///
/// With `allow_guess == false` an implementation must only return a value it
/// actually knows satisfies the constraints.
pub trait DisplayFunction: Send + Sync {
    fn display_value(
        &self,
        data: &DisplayData,
        constraints: &ConstraintMap,
        allow_guess: bool,
    ) -> Option<DisplayValue>;
}

/// Derives a single feature's value from an already rendered value.
pub trait FeatureFunction: Send + Sync {
    fn feature_value(
        &self,
        display_value: &DisplayValue,
        constraints: &ConstraintMap,
    ) -> Option<SpeakableString>;
}

impl<F> DisplayFunction for F
where
    F: Fn(&DisplayData, &ConstraintMap, bool) -> Option<DisplayValue> + Send + Sync,
{
    fn display_value(
        &self,
        data: &DisplayData,
        constraints: &ConstraintMap,
        allow_guess: bool,
    ) -> Option<DisplayValue> {
        self(data, constraints, allow_guess)
    }
}

impl<F> FeatureFunction for F
where
    F: Fn(&DisplayValue, &ConstraintMap) -> Option<SpeakableString> + Send + Sync,
{
    fn feature_value(
        &self,
        display_value: &DisplayValue,
        constraints: &ConstraintMap,
    ) -> Option<SpeakableString> {
        self(display_value, constraints)
    }
}

/// What a concept needs from its surrounding model.
///
/// The model must outlive every concept built against it.
pub trait FeatureModel {
    /// Look up a feature by name.
    fn feature(&self, name: &str) -> Option<&SemanticFeature>;

    /// The feature whose value on a display value is its spoken form.
    fn speak_feature(&self) -> &SemanticFeature;

    fn default_display_function(&self) -> Option<&dyn DisplayFunction>;

    fn default_feature_function(&self, feature: &SemanticFeature) -> Option<&dyn FeatureFunction>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("feature `{name}` is declared more than once")]
    DuplicateFeature { name: String },
    #[error("feature function registered for undeclared feature `{name}`")]
    UnknownFeature { name: String },
}

/// Table-driven [`FeatureModel`].
pub struct SemanticFeatureModel {
    features: BTreeMap<String, SemanticFeature>,
    speak_feature: SemanticFeature,
    display_function: Option<Box<dyn DisplayFunction>>,
    feature_functions: BTreeMap<SemanticFeature, Box<dyn FeatureFunction>>,
}

impl SemanticFeatureModel {
    pub fn builder() -> SemanticFeatureModelBuilder {
        SemanticFeatureModelBuilder::new(DEFAULT_SPEAK_FEATURE)
    }

    /// All declared features (speak feature included), in name order.
    pub fn features(&self) -> impl Iterator<Item = &SemanticFeature> {
        self.features.values()
    }

    pub fn has_display_function(&self) -> bool {
        self.display_function.is_some()
    }

    pub fn has_feature_function(&self, feature: &SemanticFeature) -> bool {
        self.feature_functions.contains_key(feature)
    }
}

impl FeatureModel for SemanticFeatureModel {
    fn feature(&self, name: &str) -> Option<&SemanticFeature> {
        self.features.get(name)
    }

    fn speak_feature(&self) -> &SemanticFeature {
        &self.speak_feature
    }

    fn default_display_function(&self) -> Option<&dyn DisplayFunction> {
        self.display_function.as_deref()
    }

    fn default_feature_function(&self, feature: &SemanticFeature) -> Option<&dyn FeatureFunction> {
        self.feature_functions.get(feature).map(|f| &**f)
    }
}

impl fmt::Debug for SemanticFeatureModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticFeatureModel")
            .field("features", &self.features.keys().collect::<Vec<_>>())
            .field("speak_feature", &self.speak_feature.name())
            .field("display_function", &self.display_function.is_some())
            .field(
                "feature_functions",
                &self
                    .feature_functions
                    .keys()
                    .map(SemanticFeature::name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

pub struct SemanticFeatureModelBuilder {
    speak_feature: SemanticFeature,
    features: Vec<SemanticFeature>,
    display_function: Option<Box<dyn DisplayFunction>>,
    feature_functions: Vec<(String, Box<dyn FeatureFunction>)>,
}

impl SemanticFeatureModelBuilder {
    pub fn new(speak_feature: impl Into<String>) -> Self {
        Self {
            speak_feature: SemanticFeature::new(speak_feature),
            features: Vec::new(),
            display_function: None,
            feature_functions: Vec::new(),
        }
    }

    /// Declare an unbounded feature.
    pub fn feature(mut self, name: impl Into<String>) -> Self {
        self.features.push(SemanticFeature::new(name));
        self
    }

    pub fn bounded_feature<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.push(SemanticFeature::bounded(name, values));
        self
    }

    pub fn declare(mut self, feature: SemanticFeature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn display_function(mut self, function: impl DisplayFunction + 'static) -> Self {
        self.display_function = Some(Box::new(function));
        self
    }

    /// Closure form of [`Self::display_function`].
    pub fn display_fn<F>(self, function: F) -> Self
    where
        F: Fn(&DisplayData, &ConstraintMap, bool) -> Option<DisplayValue> + Send + Sync + 'static,
    {
        self.display_function(function)
    }

    pub fn feature_function(
        mut self,
        feature: impl Into<String>,
        function: impl FeatureFunction + 'static,
    ) -> Self {
        self.feature_functions
            .push((feature.into(), Box::new(function)));
        self
    }

    /// Closure form of [`Self::feature_function`].
    pub fn feature_fn<F>(self, feature: impl Into<String>, function: F) -> Self
    where
        F: Fn(&DisplayValue, &ConstraintMap) -> Option<SpeakableString> + Send + Sync + 'static,
    {
        self.feature_function(feature, function)
    }

    pub fn build(self) -> Result<SemanticFeatureModel, ModelError> {
        let mut features = BTreeMap::new();
        features.insert(
            self.speak_feature.name().to_string(),
            self.speak_feature.clone(),
        );
        for feature in self.features {
            let name = feature.name().to_string();
            if features.contains_key(&name) {
                return Err(ModelError::DuplicateFeature { name });
            }
            features.insert(name, feature);
        }

        let mut feature_functions = BTreeMap::new();
        for (name, function) in self.feature_functions {
            let Some(feature) = features.get(&name) else {
                return Err(ModelError::UnknownFeature { name });
            };
            if feature_functions.insert(feature.clone(), function).is_some() {
                tracing::warn!(feature = %name, "feature function replaced by a later registration");
            }
        }

        tracing::debug!(
            features = features.len(),
            feature_functions = feature_functions.len(),
            display_function = self.display_function.is_some(),
            "built semantic feature model"
        );

        Ok(SemanticFeatureModel {
            features,
            speak_feature: self.speak_feature,
            display_function: self.display_function,
            feature_functions,
        })
    }
}
