//! Search Probe CLI
//!
//! Runs repository lookups against a live cluster and prints the matching
//! documents as JSON lines on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Phrase match on a field
//! search-probe --index audit-2025 by-field kind "user login"
//!
//! # Second page of everything, newest first
//! ES_NODES=http://es1:9200 search-probe --index audit-2025 page --page 1 --size 50 --sort=-dateTime
//! ```
//!
//! # Environment Variables
//!
//! - `ES_NODES`, `ES_TIMEOUT_MS`, `ES_USERNAME`, `ES_PASSWORD`,
//!   `ES_BEARER_TOKEN`, `ES_INSECURE` - cluster connection
//! - `PROBE_INDICES` - comma-separated indices (same as `--index`)
//! - `PROBE_LOG_LEVEL` - log level (default: info)

use std::sync::Arc;

use clap::{Parser, Subcommand};
use helios_search_repository::client::{ElasticsearchClient, ElasticsearchConfig};
use helios_search_repository::{
    EntityDecoder, PageRequest, Query, RepositoryConfig, SearchRepository, Sort,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "search-probe")]
#[command(about = "Query Elasticsearch indices through the search repository")]
struct ProbeArgs {
    /// Target indices.
    #[arg(
        long = "index",
        env = "PROBE_INDICES",
        value_delimiter = ',',
        required = true
    )]
    indices: Vec<String>,

    /// Log level.
    #[arg(long, env = "PROBE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Fail instead of printing nothing when the cluster cannot be queried.
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: ProbeCommand,
}

#[derive(Subcommand, Debug)]
enum ProbeCommand {
    /// Phrase-match a field against a value.
    ByField {
        /// Field name as stored in the index.
        field: String,
        /// Value to match; parsed as JSON when possible, otherwise used as a string.
        value: String,
    },
    /// Fetch one page of all documents.
    Page {
        /// Zero-based page index.
        #[arg(long, default_value = "0")]
        page: u32,
        /// Page size.
        #[arg(long, default_value = "20")]
        size: u32,
        /// Sort expression, e.g. "-createdAt".
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},helios_search_repository=debug", level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_items(items: &[Value]) -> anyhow::Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProbeArgs::parse();
    init_logging(&args.log_level);

    let es_config = ElasticsearchConfig::from_env();
    info!(nodes = ?es_config.nodes, indices = ?args.indices, "Starting search probe");

    let client = ElasticsearchClient::new(&es_config)?;
    let repo = SearchRepository::with_config(
        Arc::new(client),
        EntityDecoder::<Value>::json(),
        RepositoryConfig::new(args.indices.clone()),
    )?;

    match args.command {
        ProbeCommand::ByField { field, value } => {
            let value = parse_value(&value);
            let items = if args.strict {
                let fetched = repo.try_fetch_by_field(&field, value).await?;
                if fetched.skipped > 0 {
                    info!(skipped = fetched.skipped, "Some hits could not be decoded");
                }
                fetched.items
            } else {
                repo.fetch_by_field(&field, value).await
            };
            print_items(&items)?;
        }
        ProbeCommand::Page { page, size, sort } => {
            let mut request = PageRequest::of(page, size)?;
            if let Some(sort) = sort {
                request = request.with_sort(Sort::parse(&sort));
            }

            let query = Query::match_all();
            let result = if args.strict {
                repo.try_fetch_page(&query, &request).await?
            } else {
                repo.fetch_page(&query, &request).await
            };

            info!(
                page = result.number(),
                total = result.total,
                total_pages = result.total_pages(),
                has_next = result.has_next(),
                "Page fetched"
            );
            print_items(&result.items)?;
        }
    }

    Ok(())
}
