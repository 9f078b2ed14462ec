use clap::Parser;
use record_search::{
    config::Config,
    highlight::Highlighter,
    relationships::RelationshipEngine,
    search::{CorpusSource, FacetKey, FacetSelections, GroupBy, JsonFileSource, SearchService, StaticSource},
    AppError, Result,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "record-search")]
#[command(version, about = "Search, facet and highlight business records", long_about = None)]
struct Cli {
    /// JSON corpus file; defaults to the configured path, then the bundled sample
    #[arg(short, long, env = "RECORD_SEARCH_CORPUS")]
    corpus: Option<PathBuf>,

    /// Query text; empty lists every record, newest first
    #[arg(short, long, default_value = "")]
    query: String,

    /// Facet selection as key=value, repeatable (e.g. entityType=bill)
    #[arg(short, long = "select", value_name = "KEY=VALUE")]
    selections: Vec<String>,

    /// Grouping dimension: none, type, project, status or client
    #[arg(short, long)]
    group_by: Option<GroupBy>,

    /// Add highlighted titles and summaries to the output
    #[arg(long)]
    highlight: bool,

    /// Also list records related to this record id
    #[arg(long, value_name = "ID")]
    related: Option<String>,

    /// Skip the simulated response latency
    #[arg(long)]
    no_delay: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_selection(raw: &str) -> Result<(FacetKey, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Validation(format!("selection '{}' is not KEY=VALUE", raw)))?;
    let key: FacetKey = key
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("unknown facet key '{}'", key.trim())))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!(
            "selection '{}' has an empty value",
            raw
        )));
    }
    Ok((key, value.to_string()))
}

fn init_tracing(config: &Config, json_logs: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_filter.as_str().into());

    let registry = tracing_subscriber::registry().with(filter);
    let initialized = if json_logs || config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    initialized.map_err(|e| AppError::Internal(format!("failed to install subscriber: {}", e)))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.error_code(), error = %err, "record-search failed");
            eprintln!("error[{}]: {}", err.error_code(), err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = Config::load()?;
    if cli.no_delay {
        config.search.delay_ms = 0;
        config.search.short_query_delay_ms = 0;
    }

    init_tracing(&config, cli.json_logs)?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting record-search");

    let mut selections = FacetSelections::new();
    for raw in &cli.selections {
        let (key, value) = parse_selection(raw)?;
        selections.select(key, value);
    }
    if let Some(group_by) = cli.group_by {
        selections.select(FacetKey::GroupBy, group_by.to_string());
    }

    let source: Arc<dyn CorpusSource> = match cli.corpus.or(config.corpus.path.clone()) {
        Some(path) => Arc::new(JsonFileSource::new(path)),
        None => Arc::new(StaticSource::bundled()?),
    };
    tracing::info!(source = source.name(), "Corpus source selected");

    let service = SearchService::new(source, config.search.clone())?;
    let response = service.search(&cli.query, &selections).await;

    let mut output = serde_json::to_value(&response)?;

    if cli.highlight {
        let highlighter = Highlighter::new(config.highlight.clone());
        let highlighted: Vec<_> = response
            .records()
            .map(|record| {
                json!({
                    "id": record.id,
                    "title": highlighter.highlight(&record.title, &cli.query),
                    "summary": highlighter.highlight(&record.summary, &cli.query),
                })
            })
            .collect();
        output["highlighted"] = json!(highlighted);
    }

    if let Some(id) = &cli.related {
        let corpus = service.corpus().await;
        let record = corpus
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("no record with id '{}'", id)))?;
        let engine = RelationshipEngine::new(config.relationships.clone());
        let related = engine.related_records(record, &corpus.records, None).await;
        output["related"] = serde_json::to_value(&related)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
