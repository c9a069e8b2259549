use inflection_dialog::{
    ConstraintMap, DisplayFunction, DisplayValue, FeatureFunction, FeatureModel,
    InflectableStringConcept, SemanticFeature, SemanticFeatureModel, SpeakableString,
};

fn f(name: &str) -> SemanticFeature {
    SemanticFeature::new(name)
}

fn map(pairs: &[(&str, &str)]) -> ConstraintMap {
    pairs
        .iter()
        .map(|(name, value)| (f(name), value.to_string()))
        .collect()
}

fn say(text: &str) -> Option<SpeakableString> {
    Some(SpeakableString::new(text))
}

/// A model whose display function always renders `casas` with `realized`,
/// and whose `case` feature function answers per rendered text.
fn case_model(
    realized: &'static [(&'static str, &'static str)],
    on_display: Option<&'static str>,
    on_base: Option<&'static str>,
) -> SemanticFeatureModel {
    SemanticFeatureModel::builder()
        .feature("gender")
        .feature("number")
        .feature("case")
        .feature("definiteness")
        .display_fn(move |_, _, _| Some(DisplayValue::new("casas", map(realized))))
        .feature_fn("case", move |dv, _| {
            let answer = if dv.display_string() == "casas" {
                on_display
            } else {
                on_base
            };
            answer.map(SpeakableString::new)
        })
        .build()
        .unwrap()
}

fn casa<'m>(model: &'m SemanticFeatureModel) -> InflectableStringConcept<'m> {
    let mut concept =
        InflectableStringConcept::with_constraints(model, "casa".into(), map(&[("case", "initial")]));
    concept.put_constraint_by_name("definiteness", "definite").unwrap();
    concept
}

// ----------------------------------------------------------------------------
// Tier ordering
// ----------------------------------------------------------------------------

#[test]
fn override_beats_every_other_tier() {
    let model = case_model(&[("case", "from-display")], Some("computed"), Some("base"));
    let mut concept = casa(&model);
    concept.put_constraint(&f("case"), "override");
    assert_eq!(concept.feature_value(&f("case")), say("override"));
}

#[test]
fn display_map_beats_feature_function() {
    let model = case_model(&[("case", "from-display")], Some("computed"), Some("base"));
    assert_eq!(casa(&model).feature_value(&f("case")), say("from-display"));
}

#[test]
fn computed_beats_base_and_initial() {
    let model = case_model(&[], Some("computed"), Some("base"));
    assert_eq!(casa(&model).feature_value(&f("case")), say("computed"));
}

#[test]
fn base_computation_beats_initial_constraints() {
    let model = case_model(&[], None, Some("base"));
    assert_eq!(casa(&model).feature_value(&f("case")), say("base"));
}

#[test]
fn initial_constraints_answer_when_functions_fail() {
    let model = case_model(&[], None, None);
    assert_eq!(casa(&model).feature_value(&f("case")), say("initial"));
}

#[test]
fn nothing_known_is_absent() {
    let model = case_model(&[], None, None);
    assert_eq!(casa(&model).feature_value(&f("gender")), None);
}

#[test]
fn initial_constraints_reach_guessed_display_without_display_function() {
    let model = SemanticFeatureModel::builder()
        .feature("case")
        .feature_fn("case", |_, _| Some(SpeakableString::new("computed")))
        .build()
        .unwrap();
    let concept =
        InflectableStringConcept::with_constraints(&model, "casa".into(), map(&[("case", "initial")]));
    // The guessed display value is the base value and realizes `case`.
    assert_eq!(concept.feature_value(&f("case")), say("initial"));
}

// ----------------------------------------------------------------------------
// Gender / number tie-break
// ----------------------------------------------------------------------------

fn padre_model(realized: &'static [(&'static str, &'static str)], with_base: bool) -> SemanticFeatureModel {
    SemanticFeatureModel::builder()
        .feature("gender")
        .feature("number")
        .feature("case")
        .display_fn(move |_, _, _| Some(DisplayValue::new("padres", map(realized))))
        .feature_fn("gender", move |dv, _| match dv.display_string() {
            "padres" => Some(SpeakableString::new("masculine")),
            _ if with_base => Some(SpeakableString::new("feminine")),
            _ => None,
        })
        .build()
        .unwrap()
}

fn madre_plural(model: &SemanticFeatureModel) -> InflectableStringConcept<'_> {
    let mut concept = InflectableStringConcept::new(model, "madre".into());
    concept.put_constraint_by_name("number", "plural").unwrap();
    concept
}

#[test]
fn gender_comes_from_base_when_number_is_realized() {
    let model = padre_model(&[("gender", "masculine"), ("number", "plural")], true);
    assert_eq!(madre_plural(&model).feature_value(&f("gender")), say("feminine"));
}

#[test]
fn gender_comes_from_display_without_number() {
    let model = padre_model(&[("gender", "masculine")], true);
    assert_eq!(madre_plural(&model).feature_value(&f("gender")), say("masculine"));
}

#[test]
fn gender_comes_from_display_when_base_cannot_be_computed() {
    let model = padre_model(&[("gender", "masculine"), ("number", "plural")], false);
    assert_eq!(madre_plural(&model).feature_value(&f("gender")), say("masculine"));
}

#[test]
fn tie_break_needs_number_declared_in_model() {
    let model = SemanticFeatureModel::builder()
        .feature("gender")
        .feature("plurality")
        .display_fn(|_, _, _| {
            Some(DisplayValue::new(
                "padres",
                map(&[("gender", "masculine"), ("number", "plural")]),
            ))
        })
        .feature_fn("gender", |_, _| Some(SpeakableString::new("feminine")))
        .build()
        .unwrap();
    let mut concept = InflectableStringConcept::new(&model, "madre".into());
    concept.put_constraint_by_name("plurality", "plural").unwrap();
    assert_eq!(concept.feature_value(&f("gender")), say("masculine"));
}

#[test]
fn tie_break_is_only_for_gender() {
    let model = SemanticFeatureModel::builder()
        .feature("gender")
        .feature("number")
        .feature("case")
        .display_fn(|_, _, _| {
            Some(DisplayValue::new(
                "padres",
                map(&[("case", "nominative"), ("number", "plural")]),
            ))
        })
        .feature_fn("case", |_, _| Some(SpeakableString::new("accusative")))
        .build()
        .unwrap();
    let concept = madre_plural(&model);
    assert_eq!(concept.feature_value(&f("case")), say("nominative"));
}

// ----------------------------------------------------------------------------
// Display, existence, speakable
// ----------------------------------------------------------------------------

#[test]
fn existence_requires_a_real_rendering() {
    let model = SemanticFeatureModel::builder().feature("number").build().unwrap();
    let concept = InflectableStringConcept::new(&model, "luz".into());
    assert!(concept.display_value(false).is_none());
    assert!(!concept.exists());
    assert_eq!(
        concept.display_value(true).as_ref(),
        Some(concept.default_display_value())
    );
}

#[test]
fn display_function_is_skipped_without_constraints() {
    let model = SemanticFeatureModel::builder()
        .feature("number")
        .display_fn(|_, _, _| Some(DisplayValue::new("luces", ConstraintMap::new())))
        .build()
        .unwrap();
    let mut concept = InflectableStringConcept::new(&model, "luz".into());
    assert!(!concept.exists());
    assert_eq!(concept.display_value(true).unwrap().display_string(), "luz");

    concept.put_constraint_by_name("number", "plural").unwrap();
    assert!(concept.exists());
    assert_eq!(concept.display_value(false).unwrap().display_string(), "luces");
}

#[test]
fn display_function_sees_single_base_candidate_and_guess_flag() {
    let model = SemanticFeatureModel::builder()
        .feature("number")
        .display_fn(|data, constraints, allow_guess| {
            assert_eq!(data.values().len(), 1);
            assert_eq!(constraints.len(), 1);
            if allow_guess {
                Some(DisplayValue::new(
                    format!("{}?", data.values()[0].display_string()),
                    ConstraintMap::new(),
                ))
            } else {
                None
            }
        })
        .build()
        .unwrap();
    let mut concept = InflectableStringConcept::new(&model, "luz".into());
    concept.put_constraint_by_name("number", "plural").unwrap();
    assert!(!concept.exists());
    assert_eq!(concept.display_value(true).unwrap().display_string(), "luz?");
}

#[test]
fn speakable_string_without_speak_annotation() {
    let model = SemanticFeatureModel::builder()
        .feature("number")
        .display_fn(|_, _, _| Some(DisplayValue::new("luces", map(&[("number", "plural")]))))
        .build()
        .unwrap();
    let mut concept = InflectableStringConcept::new(&model, "luz".into());
    concept.put_constraint_by_name("number", "plural").unwrap();
    let speakable = concept.to_speakable_string().unwrap();
    assert_eq!(speakable.print(), "luces");
    assert_eq!(speakable.speak_annotation(), None);
}

#[test]
fn speakable_string_reads_speak_feature_from_display() {
    let model = SemanticFeatureModel::builder()
        .feature("number")
        .display_fn(|_, _, _| {
            Some(DisplayValue::new(
                "3 km",
                map(&[("number", "plural"), ("speak", "three kilometers")]),
            ))
        })
        .build()
        .unwrap();
    let mut concept = InflectableStringConcept::new(&model, "1 km".into());
    concept.put_constraint_by_name("number", "plural").unwrap();
    assert_eq!(
        concept.to_speakable_string(),
        Some(SpeakableString::with_speak("3 km", "three kilometers"))
    );
    // The speak feature is also reachable through regular resolution.
    assert_eq!(
        concept.feature_value(model.speak_feature()),
        say("three kilometers")
    );
}

// ----------------------------------------------------------------------------
// Clone
// ----------------------------------------------------------------------------

#[test]
fn clone_has_independent_constraints() {
    let model = SemanticFeatureModel::builder()
        .feature("number")
        .display_fn(|_, constraints, _| {
            constraints
                .iter()
                .next()
                .map(|(_, value)| DisplayValue::new(format!("luz[{value}]"), ConstraintMap::new()))
        })
        .build()
        .unwrap();
    let number = model.feature("number").unwrap();
    let mut original = InflectableStringConcept::new(&model, "luz".into());
    original.put_constraint(number, "singular");

    let mut copy = original.clone();
    copy.put_constraint(number, "plural");
    assert_eq!(original.display_value(false).unwrap().display_string(), "luz[singular]");
    assert_eq!(copy.display_value(false).unwrap().display_string(), "luz[plural]");

    copy.reset();
    assert_eq!(original.constraint(number), Some("singular"));
    assert_eq!(copy.default_display_value(), original.default_display_value());
    assert_eq!(copy.value(), original.value());
}

// ----------------------------------------------------------------------------
// Custom models
// ----------------------------------------------------------------------------

/// A hand-written model with no strategies and a fixed feature set.
struct FixedModel {
    features: Vec<SemanticFeature>,
    speak: SemanticFeature,
}

impl FeatureModel for FixedModel {
    fn feature(&self, name: &str) -> Option<&SemanticFeature> {
        self.features.iter().find(|f| f.name() == name)
    }

    fn speak_feature(&self) -> &SemanticFeature {
        &self.speak
    }

    fn default_display_function(&self) -> Option<&dyn DisplayFunction> {
        None
    }

    fn default_feature_function(&self, _feature: &SemanticFeature) -> Option<&dyn FeatureFunction> {
        None
    }
}

#[test]
fn custom_model_resolves_overrides_and_initial_constraints() {
    let model = FixedModel {
        features: vec![f("speak"), f("honorific")],
        speak: f("speak"),
    };
    let mut concept = InflectableStringConcept::with_constraints(
        &model,
        "usted".into(),
        map(&[("honorific", "formal")]),
    );
    assert_eq!(concept.feature_value(&f("honorific")), say("formal"));
    concept.put_constraint_by_name("honorific", "informal").unwrap();
    assert_eq!(concept.feature_value(&f("honorific")), say("informal"));
    assert!(!concept.exists());
}

#[test]
#[should_panic(expected = "does not register its speak feature")]
fn model_without_its_speak_feature_is_a_bug() {
    let model = FixedModel {
        features: vec![f("honorific")],
        speak: f("speak"),
    };
    let _ = InflectableStringConcept::new(&model, "usted".into());
}
