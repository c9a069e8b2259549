//! `inflection resolve`: build a concept from the command line and report how
//! it resolves.

use anyhow::{anyhow, Result};
use colored::Colorize;
use inflection_dialog::config::parse_constraint_pairs;
use inflection_dialog::{InflectableStringConcept, SpeakableString};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{load_model, ResolveArgs};

#[derive(Debug, Serialize)]
struct ResolveReport {
    value: String,
    constraints: BTreeMap<String, String>,
    display: Option<String>,
    /// True when no non-guessed rendering exists.
    guessed: bool,
    exists: bool,
    speakable: Option<SpeakableString>,
    features: BTreeMap<String, Option<String>>,
}

pub(crate) fn cmd_resolve(args: &ResolveArgs) -> Result<()> {
    let (_, model) = load_model(&args.model)?;

    let value = match &args.speak {
        Some(speak) => SpeakableString::with_speak(args.value.clone(), speak.clone()),
        None => SpeakableString::new(args.value.clone()),
    };
    let initial = parse_constraint_pairs(&model, args.initial.as_slice())?;
    let mut concept = InflectableStringConcept::with_constraints(&model, value, initial);
    for (feature, value) in &parse_constraint_pairs(&model, args.constraints.as_slice())? {
        concept.put_constraint(feature, value.clone());
    }

    let mut features = BTreeMap::new();
    for name in &args.features {
        let resolved = concept
            .feature_value_by_name(name)
            .map_err(|err| anyhow!("{err} (see `inflection features`)"))?;
        features.insert(name.clone(), resolved.map(|v| v.print().to_string()));
    }

    let exists = concept.exists();
    let report = ResolveReport {
        value: concept.canonical_text().to_string(),
        constraints: concept
            .constraints()
            .iter()
            .map(|(feature, value)| (feature.name().to_string(), value.clone()))
            .collect(),
        display: concept
            .display_value(true)
            .map(|dv| dv.display_string().to_string()),
        guessed: !exists,
        exists,
        speakable: concept.to_speakable_string(),
        features,
    };
    tracing::debug!(value = %report.value, exists, "resolved concept");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ResolveReport) {
    let none = || "(none)".dimmed().to_string();

    let display = match &report.display {
        Some(text) if report.guessed => format!("{text} {}", "(guess)".yellow()),
        Some(text) => text.clone(),
        None => none(),
    };
    println!("{:<12} {}", "display:", display);
    println!(
        "{:<12} {}",
        "exists:",
        if report.exists {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        }
    );
    let speak = match &report.speakable {
        Some(s) => s.speak().to_string(),
        None => none(),
    };
    println!("{:<12} {}", "speak:", speak);
    for (name, value) in &report.features {
        let label = format!("{name}:");
        println!(
            "{:<12} {}",
            label,
            value.clone().unwrap_or_else(none)
        );
    }
}
