use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use corpusline::{CorpusSource, DocumentId, LogFormat, Pipeline, PipelineConfig, Query};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "corpusline", about = "Categorized document corpus pipeline", version)]
struct Cli {
    /// Pipeline configuration (YAML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct Selection {
    /// Restrict to these categories (repeatable).
    #[arg(long = "category", conflicts_with = "ids")]
    categories: Vec<String>,
    /// Restrict to these document ids (repeatable).
    #[arg(long = "id")]
    ids: Vec<String>,
}

impl Selection {
    fn query(&self) -> Query {
        Query {
            ids: self.ids.iter().map(DocumentId::new).collect(),
            categories: self.categories.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate raw documents and write them to the cache.
    Preprocess {
        #[command(flatten)]
        selection: Selection,
    },
    /// Print normalized tokens of cached documents, one JSON array per line.
    Normalize {
        #[command(flatten)]
        selection: Selection,
    },
    /// Print the byte size of each document.
    Sizes {
        #[command(flatten)]
        selection: Selection,
        /// Measure cache entries instead of raw documents.
        #[arg(long)]
        cached: bool,
    },
    /// List categories present in the raw corpus.
    Categories,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    init_tracing(&config);

    let pipeline = Pipeline::from_config(&config).context("assembling pipeline")?;
    let failures = match cli.command {
        Commands::Preprocess { selection } => preprocess(&pipeline, &selection.query())?,
        Commands::Normalize { selection } => normalize(&pipeline, &selection.query())?,
        Commands::Sizes { selection, cached } => sizes(&pipeline, &selection.query(), cached)?,
        Commands::Categories => {
            for category in pipeline.raw().index().categories()? {
                println!("{category}");
            }
            0
        }
    };

    if failures > 0 {
        warn!(failures, "documents_failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(config: &PipelineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn preprocess(pipeline: &Pipeline, query: &Query) -> anyhow::Result<usize> {
    let mut failures = 0;
    for item in pipeline.preprocess(query)? {
        match item {
            Ok(path) => println!("{}", path.display()),
            Err(err) => {
                eprintln!("error: {err}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn normalize(pipeline: &Pipeline, query: &Query) -> anyhow::Result<usize> {
    let mut failures = 0;
    for item in pipeline.normalized(query)? {
        match item {
            Ok(tokens) => println!("{}", serde_json::to_string(&tokens)?),
            Err(err) => {
                eprintln!("error: {err}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn sizes(pipeline: &Pipeline, query: &Query, cached: bool) -> anyhow::Result<usize> {
    let stream = if cached {
        pipeline.cached().sizes(query)?
    } else {
        pipeline.raw().sizes(query)?
    };
    let mut failures = 0;
    for item in stream {
        match item {
            Ok((id, bytes)) => println!("{id}\t{bytes}"),
            Err(err) => {
                eprintln!("error: {err}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}
