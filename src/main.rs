//! jsonforge CLI.
//!
//! Thin wrapper around the library: loads schema documents, prints the
//! synthesized default skeleton, and validates JSON value files.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;

use jsonforge::Session;
use jsonforge::data::oneof::VariantSelector;
use jsonforge::data::session::MAX_DISPLAY_VIOLATIONS;
use jsonforge::export;
use jsonforge::loader::{self, SchemaDocument};
use jsonforge::schema::validate::{ROOT_LOCATION, validate};

#[derive(Parser)]
#[command(
    name = "jsonforge",
    version,
    about = "Build, validate and export JSON values driven by JSON Schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load schema files and report which of them parse.
    Load {
        /// Schema files to load.
        files: Vec<PathBuf>,
    },
    /// Synthesize the minimal default value for a schema.
    Defaults {
        /// Schema file.
        schema: PathBuf,
        /// Write the result to a file instead of stdout. Without a value,
        /// the name is derived from the schema file name.
        #[arg(short, long)]
        output: Option<Option<PathBuf>>,
    },
    /// Validate a JSON value file against a schema.
    Validate {
        /// Schema file.
        schema: PathBuf,
        /// JSON value file.
        value: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Load { files } => load(files).await,
        Command::Defaults { schema, output } => defaults(schema, output).await,
        Command::Validate { schema, value } => run_validate(schema, value).await,
    }
}

async fn load(files: Vec<PathBuf>) -> anyhow::Result<()> {
    let outcome = loader::load_documents(&files).await;
    for document in &outcome.documents {
        println!("{} {} ({})", "loaded".green(), document.file_name, document.title);
    }
    for failure in &outcome.failures {
        eprintln!("{} {failure}", "failed".red());
    }
    if outcome.documents.is_empty() && !outcome.failures.is_empty() {
        bail!("no schema file could be loaded");
    }
    Ok(())
}

async fn defaults(schema: PathBuf, output: Option<Option<PathBuf>>) -> anyhow::Result<()> {
    let document = load_single(&schema).await?;
    let schema_file = document.file_name.clone();

    let mut session = Session::new();
    session.add_documents([document]);
    session.activate(0)?;

    match output {
        None => println!("{}", session.preview()),
        Some(chosen) => {
            let name = match chosen {
                Some(path) => export::download_file_name(&path.display().to_string()),
                None => export::suggested_file_name(&schema_file),
            };
            tokio::fs::write(&name, session.preview())
                .await
                .with_context(|| format!("failed to write {name}"))?;
            println!("{} {name}", "wrote".green());
        }
    }
    Ok(())
}

async fn run_validate(schema: PathBuf, value: PathBuf) -> anyhow::Result<()> {
    let document = load_single(&schema).await?;
    let content = tokio::fs::read_to_string(&value)
        .await
        .with_context(|| format!("failed to read {}", value.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", value.display()))?;

    let violations = validate(
        &document.schema,
        &document.schema,
        Some(&value),
        ROOT_LOCATION,
        &VariantSelector::new(),
    )?;

    if violations.is_empty() {
        println!("{}", "valid".green());
        return Ok(());
    }
    for violation in violations.iter().take(MAX_DISPLAY_VIOLATIONS) {
        eprintln!("{}", violation.red());
    }
    if violations.len() > MAX_DISPLAY_VIOLATIONS {
        eprintln!("... and {} more", violations.len() - MAX_DISPLAY_VIOLATIONS);
    }
    bail!("{} violation(s)", violations.len());
}

async fn load_single(path: &PathBuf) -> anyhow::Result<SchemaDocument> {
    let outcome = loader::load_documents(std::slice::from_ref(path)).await;
    if let Some(failure) = outcome.failures.into_iter().next() {
        bail!("{failure}");
    }
    outcome
        .documents
        .into_iter()
        .next()
        .context("no document loaded")
}
