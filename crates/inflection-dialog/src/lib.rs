//! Inflection dialog: grammatical feature resolution
//!
//! This crate resolves the concrete text (and optional spoken form) of a
//! linguistic concept under a set of requested grammatical constraints
//! (`gender`, `number`, `case`, ...), falling back through a fixed chain when
//! no exact inflected form is known.
//!
//! ```text
//!   SpeakableString ──► InflectableStringConcept ──► DisplayValue
//!                              │      ▲
//!                              ▼      │
//!                         FeatureModel (features, display/feature functions)
//! ```
//!
//! The concept borrows its model; the model owns the feature registry and the
//! strategies that actually inflect. `SemanticFeatureModel` is the concrete
//! model shipped here, usually built from a JSON [`config::ModelConfig`] whose
//! lexicon backs the [`lexicon`] strategies.

pub mod concept;
pub mod config;
pub mod display;
pub mod feature;
pub mod lexicon;
pub mod model;
pub mod speakable;

pub use concept::{ConceptError, InflectableStringConcept};
pub use config::{ConfigError, ModelConfig};
pub use display::{DisplayData, DisplayValue};
pub use feature::{ConstraintMap, SemanticFeature};
pub use model::{
    DisplayFunction, FeatureFunction, FeatureModel, ModelError, SemanticFeatureModel,
    SemanticFeatureModelBuilder,
};
pub use speakable::SpeakableString;
