//! JSON model configuration.
//!
//! A model file declares features and, optionally, a lexicon of known forms:
//!
//! ```json
//! {
//!   "speak_feature": "speak",
//!   "features": [
//!     { "name": "gender", "values": ["masculine", "feminine"] },
//!     { "name": "number", "values": ["singular", "plural"] }
//!   ],
//!   "lexicon": [
//!     {
//!       "lemma": "gato",
//!       "features": { "gender": "masculine" },
//!       "forms": [
//!         { "text": "gato", "features": { "number": "singular" } },
//!         { "text": "gatos", "features": { "number": "plural" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Building a model from a config installs the lexicon display function and
//! one lexicon feature function per declared feature (speak excluded) when the
//! lexicon is non-empty.

use crate::feature::{ConstraintMap, SemanticFeature, DEFAULT_SPEAK_FEATURE};
use crate::lexicon::{InflectedForm, Lexeme, Lexicon, LexiconDisplayFunction, LexiconFeatureFunction};
use crate::model::{FeatureModel, ModelError, SemanticFeatureModel, SemanticFeatureModelBuilder};
use crate::speakable::SpeakableString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read model config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lexeme `{lemma}` uses undeclared feature `{feature}`")]
    UnknownFeature { lemma: String, feature: String },
    #[error("lexeme `{lemma}`: `{value}` is not a declared value of feature `{feature}`")]
    InvalidValue {
        lemma: String,
        feature: String,
        value: String,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("malformed constraint `{0}` (expected name=value)")]
    MalformedConstraint(String),
    #[error("constraint names unknown feature `{0}`")]
    UnknownConstraint(String),
}

fn default_speak_feature() -> String {
    DEFAULT_SPEAK_FEATURE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    #[serde(default = "default_speak_feature")]
    pub speak_feature: String,
    #[serde(default)]
    pub features: Vec<FeatureConfig>,
    #[serde(default)]
    pub lexicon: Vec<LexemeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureConfig {
    pub name: String,
    /// Empty means unbounded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LexemeConfig {
    pub lemma: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, String>,
    #[serde(default)]
    pub forms: Vec<FormConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormConfig {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            speak_feature: default_speak_feature(),
            features: Vec::new(),
            lexicon: Vec::new(),
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            features = config.features.len(),
            lexemes = config.lexicon.len(),
            "loaded model config"
        );
        Ok(config)
    }

    /// Validate the config and build a model from it.
    pub fn build(&self) -> Result<SemanticFeatureModel, ConfigError> {
        let speak_feature = SemanticFeature::new(self.speak_feature.clone());
        let mut declared: BTreeMap<&str, SemanticFeature> = BTreeMap::new();
        declared.insert(&self.speak_feature, speak_feature.clone());

        let mut builder = SemanticFeatureModelBuilder::new(self.speak_feature.clone());
        for config in &self.features {
            let feature = SemanticFeature::bounded(config.name.clone(), config.values.iter().cloned());
            builder = builder.declare(feature.clone());
            declared.insert(config.name.as_str(), feature);
        }

        let lexemes = self
            .lexicon
            .iter()
            .map(|lexeme| lexeme.resolve(&declared))
            .collect::<Result<Vec<_>, _>>()?;
        let lexicon = Arc::new(Lexicon::new(lexemes));

        if !lexicon.is_empty() {
            builder = builder.display_function(LexiconDisplayFunction::new(
                lexicon.clone(),
                speak_feature.clone(),
            ));
            for feature in declared.values().filter(|f| **f != speak_feature) {
                builder = builder.feature_function(
                    feature.name(),
                    LexiconFeatureFunction::new(feature.clone(), lexicon.clone()),
                );
            }
        }

        Ok(builder.build()?)
    }
}

impl LexemeConfig {
    fn resolve(&self, declared: &BTreeMap<&str, SemanticFeature>) -> Result<Lexeme, ConfigError> {
        let features = self.resolve_features(&self.features, declared)?;
        let forms = self
            .forms
            .iter()
            .map(|form| {
                let text = match &form.speak {
                    Some(speak) => SpeakableString::with_speak(form.text.clone(), speak.clone()),
                    None => SpeakableString::new(form.text.clone()),
                };
                Ok(InflectedForm::new(
                    text,
                    self.resolve_features(&form.features, declared)?,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Lexeme::new(self.lemma.clone(), features, forms))
    }

    fn resolve_features(
        &self,
        values: &BTreeMap<String, String>,
        declared: &BTreeMap<&str, SemanticFeature>,
    ) -> Result<ConstraintMap, ConfigError> {
        let mut map = ConstraintMap::new();
        for (name, value) in values {
            let feature = declared
                .get(name.as_str())
                .ok_or_else(|| ConfigError::UnknownFeature {
                    lemma: self.lemma.clone(),
                    feature: name.clone(),
                })?;
            if !feature.accepts(value) {
                return Err(ConfigError::InvalidValue {
                    lemma: self.lemma.clone(),
                    feature: name.clone(),
                    value: value.clone(),
                });
            }
            map.insert(feature.clone(), value.clone());
        }
        Ok(map)
    }
}

/// Parse `name=value` pairs into constraints on features of `model`.
pub fn parse_constraint_pairs<S: AsRef<str>>(
    model: &dyn FeatureModel,
    pairs: &[S],
) -> Result<ConstraintMap, ConfigError> {
    let mut map = ConstraintMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((name, value)) = pair.split_once('=') else {
            return Err(ConfigError::MalformedConstraint(pair.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::MalformedConstraint(pair.to_string()));
        }
        let feature = model
            .feature(name)
            .ok_or_else(|| ConfigError::UnknownConstraint(name.to_string()))?;
        map.insert(feature.clone(), value.trim());
    }
    Ok(map)
}
