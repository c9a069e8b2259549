//! Lexicon-backed display and feature functions.
//!
//! A [`Lexicon`] lists lexemes and their known inflected forms. It is the
//! stand-in for a morphology engine: forms are looked up, never generated.

use crate::display::{DisplayData, DisplayValue};
use crate::feature::{ConstraintMap, SemanticFeature};
use crate::model::{DisplayFunction, FeatureFunction};
use crate::speakable::SpeakableString;
use ahash::AHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectedForm {
    text: SpeakableString,
    features: ConstraintMap,
}

impl InflectedForm {
    pub fn new(text: SpeakableString, features: ConstraintMap) -> Self {
        Self { text, features }
    }

    pub fn text(&self) -> &SpeakableString {
        &self.text
    }

    pub fn features(&self) -> &ConstraintMap {
        &self.features
    }
}

/// A lemma, the features intrinsic to it (e.g. gender of a noun), and its
/// inflected forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    lemma: String,
    features: ConstraintMap,
    forms: Vec<InflectedForm>,
}

impl Lexeme {
    pub fn new(lemma: impl Into<String>, features: ConstraintMap, forms: Vec<InflectedForm>) -> Self {
        Self {
            lemma: lemma.into(),
            features,
            forms,
        }
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn features(&self) -> &ConstraintMap {
        &self.features
    }

    pub fn forms(&self) -> &[InflectedForm] {
        &self.forms
    }

    /// Value of `feature` on `form`, falling back to the lexeme's own value.
    fn realized<'a>(&'a self, form: &'a InflectedForm, feature: &SemanticFeature) -> Option<&'a str> {
        form.features.get(feature).or_else(|| self.features.get(feature))
    }

    fn display_value(&self, form: &InflectedForm, speak_feature: &SemanticFeature) -> DisplayValue {
        let mut features = self.features.clone();
        features.extend_from(&form.features);
        DisplayValue::from_speakable(&form.text, speak_feature, features)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    lexeme: usize,
    form: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    lexemes: Vec<Lexeme>,
    by_text: AHashMap<String, Entry>,
}

impl Lexicon {
    /// Index lexemes by lemma and by every form's printed text.
    ///
    /// When two entries share a text the first one listed keeps it.
    pub fn new(lexemes: Vec<Lexeme>) -> Self {
        let mut by_text: AHashMap<String, Entry> = AHashMap::new();
        for (lexeme_idx, lexeme) in lexemes.iter().enumerate() {
            for (form_idx, form) in lexeme.forms.iter().enumerate() {
                let text = form.text.print();
                match by_text.get(text).copied() {
                    Some(existing) if existing.lexeme != lexeme_idx => {
                        tracing::warn!(text, lemma = lexeme.lemma(), "homograph form ignored");
                    }
                    Some(_) => {}
                    None => {
                        by_text.insert(
                            text.to_string(),
                            Entry {
                                lexeme: lexeme_idx,
                                form: Some(form_idx),
                            },
                        );
                    }
                }
            }
            by_text.entry(lexeme.lemma.clone()).or_insert(Entry {
                lexeme: lexeme_idx,
                form: None,
            });
        }
        Self { lexemes, by_text }
    }

    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// The lexeme that `text` is a lemma or form of, with the form if `text`
    /// is one.
    pub fn lookup(&self, text: &str) -> Option<(&Lexeme, Option<&InflectedForm>)> {
        let entry = self.by_text.get(text)?;
        let lexeme = &self.lexemes[entry.lexeme];
        Some((lexeme, entry.form.map(|idx| &lexeme.forms[idx])))
    }
}

/// Selects the lexicon form that realizes the requested constraints.
#[derive(Debug, Clone)]
pub struct LexiconDisplayFunction {
    lexicon: Arc<Lexicon>,
    speak_feature: SemanticFeature,
}

impl LexiconDisplayFunction {
    pub fn new(lexicon: Arc<Lexicon>, speak_feature: SemanticFeature) -> Self {
        Self {
            lexicon,
            speak_feature,
        }
    }

    /// Requested constraints plus whatever the candidate's own form realizes
    /// for features the caller left open. Only requested features may change.
    fn pin_unrequested(base_form: Option<&InflectedForm>, constraints: &ConstraintMap) -> ConstraintMap {
        let mut pinned = constraints.clone();
        if let Some(form) = base_form {
            for (feature, value) in form.features.iter() {
                if !pinned.contains(feature) {
                    pinned.insert(feature.clone(), value.clone());
                }
            }
        }
        pinned
    }

    fn strict_match<'a>(&self, lexeme: &'a Lexeme, constraints: &ConstraintMap) -> Option<&'a InflectedForm> {
        lexeme.forms.iter().find(|form| {
            constraints
                .iter()
                .filter(|(feature, _)| **feature != self.speak_feature)
                .all(|(feature, value)| lexeme.realized(form, feature) == Some(value.as_str()))
        })
    }

    /// The form agreeing with the most constraints and contradicting none.
    fn best_guess<'a>(&self, lexeme: &'a Lexeme, constraints: &ConstraintMap) -> Option<&'a InflectedForm> {
        let mut best: Option<(usize, &InflectedForm)> = None;
        'forms: for form in &lexeme.forms {
            let mut agreements = 0;
            for (feature, value) in constraints.iter() {
                if *feature == self.speak_feature {
                    continue;
                }
                match lexeme.realized(form, feature) {
                    Some(realized) if realized == value.as_str() => agreements += 1,
                    Some(_) => continue 'forms,
                    None => {}
                }
            }
            if agreements > 0 && best.map_or(true, |(score, _)| agreements > score) {
                best = Some((agreements, form));
            }
        }
        best.map(|(_, form)| form)
    }
}

impl DisplayFunction for LexiconDisplayFunction {
    fn display_value(
        &self,
        data: &DisplayData,
        constraints: &ConstraintMap,
        allow_guess: bool,
    ) -> Option<DisplayValue> {
        for candidate in data.iter() {
            let Some((lexeme, base_form)) = self.lexicon.lookup(candidate.display_string()) else {
                continue;
            };
            let constraints = Self::pin_unrequested(base_form, constraints);
            let form = self.strict_match(lexeme, &constraints).or_else(|| {
                if allow_guess {
                    self.best_guess(lexeme, &constraints)
                } else {
                    None
                }
            });
            if let Some(form) = form {
                tracing::trace!(
                    lemma = lexeme.lemma(),
                    form = form.text.print(),
                    constraints = %constraints,
                    "lexicon form selected"
                );
                return Some(lexeme.display_value(form, &self.speak_feature));
            }
        }
        None
    }
}

/// Reads one feature off a display value, consulting the lexicon when the
/// display value does not realize it.
#[derive(Debug, Clone)]
pub struct LexiconFeatureFunction {
    feature: SemanticFeature,
    lexicon: Arc<Lexicon>,
}

impl LexiconFeatureFunction {
    pub fn new(feature: SemanticFeature, lexicon: Arc<Lexicon>) -> Self {
        Self { feature, lexicon }
    }
}

impl FeatureFunction for LexiconFeatureFunction {
    fn feature_value(
        &self,
        display_value: &DisplayValue,
        _constraints: &ConstraintMap,
    ) -> Option<SpeakableString> {
        if let Some(value) = display_value.feature_value(&self.feature) {
            return Some(SpeakableString::new(value));
        }
        let (lexeme, form) = self.lexicon.lookup(display_value.display_string())?;
        form.and_then(|form| form.features.get(&self.feature))
            .or_else(|| lexeme.features.get(&self.feature))
            .map(SpeakableString::new)
    }
}
