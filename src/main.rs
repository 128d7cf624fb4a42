// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! AI-nspect: AI-generated Image Detector
//!
//! Opens the desktop window by default; subcommands run the same inspection
//! workflow without a window.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use ainspect::classifier::onnx::OnnxClassifier;
use ainspect::config::AppConfig;
use ainspect::history::HistoryStore;
use ainspect::inspection::{inspect, InspectionOutcome, InspectionRequest, Inspector};
use ainspect::{ui, AinspectError, Result};

/// AI-nspect - AI-generated image detector
#[derive(Parser, Debug)]
#[command(name = "ainspect")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Detect AI-generated images with a local vision model", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the desktop window (default)
    Gui,

    /// Inspect a single image without opening the window
    Classify {
        /// Image to inspect
        path: PathBuf,

        /// Do not record the inspection in history
        #[arg(long)]
        no_history: bool,

        /// Output format for the result
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List recent inspections
    History {
        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Gui) | None => run_gui(config),
        Some(Commands::Classify { path, no_history, format }) => {
            run_classify(config, path, no_history, &format)
        }
        Some(Commands::History { count }) => run_history(config, count),
        Some(Commands::Config { action }) => run_config_command(config, action),
    }
}

fn build_runtime() -> Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ainspect-worker")
        .build()?)
}

fn build_inspector(config: &AppConfig, runtime: &Runtime, classifier: Arc<OnnxClassifier>) -> Inspector {
    let history = HistoryStore::new(config.history.path.clone());
    Inspector::new(classifier, history, runtime.handle().clone())
}

/// Run the desktop window
fn run_gui(config: AppConfig) -> Result<()> {
    let runtime = build_runtime()?;
    let classifier = Arc::new(OnnxClassifier::new(config.model.clone()));
    let inspector = build_inspector(&config, &runtime, Arc::clone(&classifier));

    info!("Model: {} ({:?})", config.model.version, config.model.path);
    info!("History: {:?}", inspector.history().path());

    // Warm the session up so the first inspection does not pay for it.
    // A failure here is retried by the first inspection.
    runtime.spawn_blocking(move || {
        if let Err(e) = classifier.load() {
            warn!("{}", e);
        }
    });

    ui::run(inspector, config.appearance)
}

/// Run a single inspection from the command line
fn run_classify(config: AppConfig, path: PathBuf, no_history: bool, format: &str) -> Result<()> {
    let outcome = if no_history {
        let classifier = OnnxClassifier::new(config.model.clone());
        inspect(&classifier, InspectionRequest::new(path))
    } else {
        let runtime = build_runtime()?;
        let classifier = Arc::new(OnnxClassifier::new(config.model.clone()));
        let mut inspector = build_inspector(&config, &runtime, classifier);
        inspector.begin(path)?;
        runtime
            .block_on(inspector.finish())
            .cloned()
            .ok_or_else(|| AinspectError::Inference("Inspection produced no result".to_string()))?
    };

    print_outcome(&outcome, format)
}

fn print_outcome(outcome: &InspectionOutcome, format: &str) -> Result<()> {
    let record = outcome.record();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        _ => println!(
            "{}: {} ({})",
            record.file_name,
            outcome.result.authenticity(),
            outcome.result.confidence_text()
        ),
    }
    Ok(())
}

/// List recent history records
fn run_history(config: AppConfig, count: usize) -> Result<()> {
    let history = HistoryStore::new(config.history.path.clone());
    let records = history.get_recent(count);

    println!("Recent inspections ({} entries):", records.len());
    for record in records {
        println!(
            "  {}  {}  {}  {}",
            record.timestamp,
            record.file_name,
            record.authenticity.map(|a| a.as_str()).unwrap_or("-"),
            record.confidence.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            write_default_config(&output)?;
            println!("Generated config at {:?}", output);
        }
    }

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(AinspectError::Config(format!(
            "{} already exists, remove it first",
            path.display()
        )));
    }
    AppConfig::default().save(path)
}
