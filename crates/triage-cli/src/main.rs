//! Triage CLI
//!
//! Command-line front end for helpdesk complaint triage:
//! - Cleaning ticket tables (boilerplate, redaction, normalization)
//! - Classifying tickets into helpdesk topics with the model cascade
//! - Single-complaint classification typed in by hand
//! - Exporting the built-in lexicon for editing

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use triage_route::{classify_cleaned, TopicLabel};
use triage_text::{LexiconFileV1, Record};

mod config;
mod render;
mod table;

use config::{ConfigArgs, Settings};
use table::TicketTable;

#[derive(Parser)]
#[command(name = "triage")]
#[command(author, version, about = "Helpdesk complaint cleaning and topic triage")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and classify a ticket table (CSV with `Incident Number`, `Summary`, `Notes`).
    Classify {
        /// Input CSV
        input: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Write per-topic counts (`.csv` → CSV, anything else → JSON)
        #[arg(long)]
        counts: Option<PathBuf>,
        /// Only list complaints with this topic (default: all topics)
        #[arg(long)]
        topic: Option<TopicLabel>,
        /// Skip the preview, distribution and complaint listing
        #[arg(short, long)]
        quiet: bool,
    },

    /// Clean a ticket table without classifying it.
    Clean {
        /// Input CSV
        input: PathBuf,
        /// Output CSV (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Classify one complaint typed on the command line.
    Manual {
        /// Complaint text
        text: String,
    },

    /// Print the built-in lexicon JSON (edit it and pass back with --lexicon).
    Lexicon {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load the topic models and report what was found.
    Models,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = Settings::resolve(&cli.config)?;

    match cli.command {
        Commands::Classify {
            input,
            out,
            counts,
            topic,
            quiet,
        } => cmd_classify(&settings, &input, out, counts, topic, quiet),
        Commands::Clean { input, out } => cmd_clean(&settings, &input, out),
        Commands::Manual { text } => cmd_manual(&settings, &text),
        Commands::Lexicon { out } => cmd_lexicon(out),
        Commands::Models => cmd_models(&settings),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn cmd_classify(
    settings: &Settings,
    input: &Path,
    out: Option<PathBuf>,
    counts_out: Option<PathBuf>,
    topic: Option<TopicLabel>,
    quiet: bool,
) -> Result<()> {
    let tickets = TicketTable::read(input)?;
    let pipeline = settings.pipeline()?;
    let classifier = settings.classifier()?;

    // Reports share stdout only when the table goes to a file.
    let mut reports: Box<dyn Write> = if quiet {
        Box::new(io::sink())
    } else if out.is_some() {
        Box::new(io::stdout())
    } else {
        Box::new(io::stderr())
    };

    eprintln!(
        "{} {} ({} records)",
        "Cleaning".green().bold(),
        input.display(),
        tickets.records.len()
    );
    let cleaned = pipeline.clean_batch(&tickets.records);
    render::preview(&mut *reports, &cleaned)?;

    eprintln!("{} with {}", "Classifying".green().bold(), classifier.model_names().join(", "));
    let report = classify_cleaned(&classifier, cleaned).context("classification failed")?;

    tickets.write_classified(table::output(out.as_deref())?, &report)?;
    if let Some(path) = &out {
        eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
    }
    if let Some(path) = &counts_out {
        table::write_counts(path, &report.counts)?;
        eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
    }

    render::distribution(&mut *reports, &report.counts)?;
    if let Some(t) = topic {
        if report.counts.get(&t) == 0 {
            eprintln!("{} no complaints with topic {t}", "info:".yellow().bold());
        }
    }
    render::listing(&mut *reports, &report, topic)?;
    reports.flush()?;
    Ok(())
}

fn cmd_clean(settings: &Settings, input: &Path, out: Option<PathBuf>) -> Result<()> {
    let tickets = TicketTable::read(input)?;
    let pipeline = settings.pipeline()?;
    let cleaned = pipeline.clean_batch(&tickets.records);
    tickets.write_cleaned(table::output(out.as_deref())?, &cleaned)?;
    if let Some(path) = &out {
        eprintln!(
            "{} {} ({} records)",
            "wrote".green().bold(),
            path.display().to_string().bold(),
            cleaned.len()
        );
    }
    Ok(())
}

fn cmd_manual(settings: &Settings, text: &str) -> Result<()> {
    let pipeline = settings.pipeline()?;
    let classifier = settings.classifier()?;

    let cleaned = pipeline.clean(&Record::manual(text));
    let label = classifier
        .route(&cleaned.cleaned_complaint)
        .context("classification failed")?;

    println!("{} {}", "Cleaned:".bold(), cleaned.cleaned_complaint);
    println!("{} {}", "Topic:".bold(), label.as_str().cyan().bold());
    Ok(())
}

fn cmd_lexicon(out: Option<PathBuf>) -> Result<()> {
    let json = LexiconFileV1::builtin()?.to_json_pretty()?;
    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_models(settings: &Settings) -> Result<()> {
    let store = settings.model_store()?;
    let classifier = settings.classifier()?;
    println!("{} {}", "Models in".green().bold(), store.location());
    for (role, name, topics) in classifier.describe() {
        let topics = topics.map_or_else(|| "?".to_string(), |n| n.to_string());
        println!("  {} {:<8} {name} (topics={topics})", "ok".green().bold(), role);
    }
    match settings.inference_timeout {
        Some(t) => println!("  inference timeout: {}s", t.as_secs()),
        None => println!("  inference timeout: disabled"),
    }
    Ok(())
}
