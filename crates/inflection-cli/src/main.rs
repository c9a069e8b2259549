//! Inflection CLI
//!
//! Command-line access to the dialog feature-resolution core:
//! - listing the features a model file declares
//! - validating a model file
//! - resolving a concept under requested constraints

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use inflection_dialog::{FeatureModel, ModelConfig, SemanticFeatureModel};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod resolve;

#[derive(Parser)]
#[command(name = "inflection")]
#[command(
    author,
    version,
    about = "Inflection: grammatical feature resolution for dialog concepts"
)]
struct Cli {
    /// Log more (-v debug, -vv trace). `RUST_LOG` overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the features a model declares, with their bounded values.
    Features {
        /// Model config (JSON)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Validate a model config and report what it contains.
    Check {
        /// Model config (JSON)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Resolve a concept under constraints.
    ///
    /// Prints the rendered text (marked when it is only a guess), whether a
    /// non-guessed rendering exists, the spoken form, and every requested
    /// feature's resolved value.
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Model config (JSON)
    #[arg(short, long)]
    model: PathBuf,
    /// Base value of the concept
    value: String,
    /// Spoken form of the base value
    #[arg(long)]
    speak: Option<String>,
    /// Feature value the base value already carries (repeatable)
    #[arg(long = "initial", value_name = "NAME=VALUE")]
    initial: Vec<String>,
    /// Requested constraint (repeatable)
    #[arg(short = 'c', long = "constraint", value_name = "NAME=VALUE")]
    constraints: Vec<String>,
    /// Feature to resolve (repeatable)
    #[arg(short = 'f', long = "feature", value_name = "NAME")]
    features: Vec<String>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Features { model } => cmd_features(&model),
        Commands::Check { model } => cmd_check(&model),
        Commands::Resolve(args) => resolve::cmd_resolve(&args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn load_model(path: &Path) -> Result<(ModelConfig, SemanticFeatureModel)> {
    let config = ModelConfig::from_path(path)?;
    let model = config
        .build()
        .with_context(|| format!("invalid model `{}`", path.display()))?;
    Ok((config, model))
}

fn cmd_features(path: &Path) -> Result<()> {
    let (_, model) = load_model(path)?;
    let speak_feature = model.speak_feature();
    for feature in model.features() {
        let values = if feature == speak_feature {
            "(speak)".dimmed().to_string()
        } else if feature.is_bounded() {
            feature
                .values()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "(unbounded)".dimmed().to_string()
        };
        println!("{} {}", format!("{:<16}", feature.name()).bold(), values);
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let (config, model) = load_model(path)?;
    let forms: usize = config.lexicon.iter().map(|lexeme| lexeme.forms.len()).sum();
    println!(
        "{} model {} (features={} lexemes={} forms={} display_function={})",
        "ok".green().bold(),
        path.display(),
        model.features().count(),
        config.lexicon.len(),
        forms,
        model.has_display_function()
    );
    Ok(())
}
