//! sourced-sparql - run a SPARQL SELECT query over RDF documents
//!
//! Usage:
//!   sourced-sparql --source data/people.ttl --source https://example.org/more.ttl \
//!       --query 'SELECT ?s WHERE { ?s ?p ?o }'

use clap::{Parser, ValueEnum};
use futures_util::TryStreamExt;
use sourced_sparql::{Binding, EngineConfig, QueryEngine, Source};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One JSON object per binding
    Json,
    /// Tab separated values with a header row
    Tsv,
}

#[derive(Parser, Debug)]
#[command(name = "sourced-sparql")]
#[command(about = "Run a SPARQL SELECT query over RDF documents and quad sources", long_about = None)]
struct Args {
    /// SPARQL query text
    #[arg(short, long, conflicts_with = "query_file", required_unless_present = "query_file")]
    query: Option<String>,

    /// File containing the SPARQL query
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Document URL or path; repeat to merge several documents
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Source descriptor as JSON, e.g. '["a.ttl", {"href": "https://example.org/b"}]'
    #[arg(long)]
    sources_json: Option<String>,

    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn collect_sources(args: &Args) -> Result<Option<Source>, Box<dyn std::error::Error>> {
    let mut sources: Vec<Source> = args.sources.iter().map(|s| Source::from(s.as_str())).collect();
    if let Some(json) = &args.sources_json {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(source) = Source::classify(value)? {
            sources.push(source);
        }
    }
    Ok(if sources.is_empty() { None } else { Some(Source::List(sources)) })
}

fn tsv_cell(binding: &Binding, key: &str) -> String {
    binding.get(key).map(ToString::to_string).unwrap_or_default()
}

fn print_bindings(bindings: &[Binding], format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            for binding in bindings {
                println!("{}", serde_json::to_string(binding)?);
            }
        }
        OutputFormat::Tsv => {
            let mut seen = HashSet::new();
            let header: Vec<String> = bindings
                .iter()
                .flat_map(Binding::keys)
                .filter(|key| seen.insert(key.to_string()))
                .map(str::to_string)
                .collect();
            println!("{}", header.join("\t"));
            for binding in bindings {
                let row: Vec<String> = header.iter().map(|key| tsv_cell(binding, key)).collect();
                println!("{}", row.join("\t"));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let query = match (&args.query, &args.query_file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("either --query or --query-file is required".into()),
    };

    // Sources become the engine's default store so they load while the query is parsed
    let engine = QueryEngine::with_config(collect_sources(&args)?, config)?;
    let bindings = engine.execute(&query, None).try_collect::<Vec<_>>().await?;
    print_bindings(&bindings, args.format)?;
    log::info!("{} bindings", bindings.len());
    Ok(())
}
