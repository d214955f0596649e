//! Study Map - learning journal with automatic enrichment
//!
//! Every logged study session is classified by a local LLM, linked into a
//! weighted connection graph against earlier sessions, and mined for
//! blindspot suggestions. This binary exposes the engine two ways: a JSON
//! HTTP API for the front end (`serve`) and direct CLI commands (`log`,
//! `enrich`, `stats`).

mod api;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use studymap_core::{InferenceConfig, LoggedEntry, OllamaClient, Pipeline, Storage};

/// Study Map - AI-enriched learning journal
#[derive(Parser)]
#[command(name = "studymap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log learning sessions, discover connections, find blindspots")]
struct Cli {
    /// Custom database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,
    },

    /// Log one learning session from the terminal
    Log {
        /// Topic/title of the session
        topic: String,
        /// Free-text summary of what was studied
        summary: String,
    },

    /// Backfill enrichment for entries that never got a classification
    Enrich {
        /// Specific entry ids (default: every unclassified entry)
        ids: Vec<i64>,
    },

    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let storage = Arc::new(Storage::new(cli.db_path.clone())?);
    let config = InferenceConfig::from_env();
    let retries = config.max_retries;
    let provider = Arc::new(OllamaClient::new(config));
    let pipeline = Arc::new(Pipeline::new(storage.clone(), provider, retries));

    match cli.command {
        Commands::Serve { port } => {
            api::serve(storage, pipeline, port).await?;
        }

        Commands::Log { topic, summary } => {
            let logged = pipeline.log_entry(&topic, &summary).await?;
            print_logged_entry(&logged);
        }

        Commands::Enrich { ids } => {
            let ids = if ids.is_empty() { None } else { Some(ids) };
            let report = pipeline.enrich_missing(ids).await?;
            println!(
                "{} {}/{} entries enriched",
                "done:".green().bold(),
                report.enriched,
                report.attempted
            );
        }

        Commands::Stats => {
            let stats = storage.stats()?;
            println!("{}", "Study Map".bold());
            println!("  entries:     {}", stats.entries);
            println!("  topics:      {}", stats.topics);
            println!("  skills:      {}", stats.skills);
            println!("  connections: {}", stats.connections);
            println!("  blindspots:  {}", stats.blindspots);
        }
    }

    Ok(())
}

fn print_logged_entry(logged: &LoggedEntry) {
    println!(
        "{} entry #{} under {}",
        "logged".green().bold(),
        logged.entry.id,
        logged.entry.topic_title.bold()
    );

    match &logged.entry.classification {
        Some(cls) => {
            println!(
                "  classified: {} / {}",
                if cls.domain.is_empty() { "(no domain)" } else { cls.domain.as_str() },
                cls.complexity
            );
            if !logged.entry.skills.is_empty() {
                println!("  skills: {}", logged.entry.skills.join(", "));
            }
        }
        None => println!("  {}", "unenriched (classification unavailable)".yellow()),
    }

    for c in &logged.connections {
        println!(
            "  {} entry #{} ({}, strength {:.2})",
            "->".cyan(),
            c.target_entry_id,
            c.relationship,
            c.strength
        );
    }

    for b in &logged.blindspots {
        println!("  {} {} [{}]", "?".magenta(), b.suggestion, b.category);
    }
}
