//! feedscope entry point.

use std::io::Read;

use clap::Parser;
use feedscope_cli::args::CliArgs;
use feedscope_cli::config::{FeedscopeConfig, StoreBackend};
use feedscope_cli::error::CliError;
use feedscope_cli::report::{parse_report, write_contexts};
use feedscope_cli::telemetry::init_tracing;
use feedscope_context::{ErrorContextResolver, HttpFetcher};
use feedscope_storage::{ExpiringDocumentCache, InMemoryTextStore, LmdbTextStore, TextStore};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let args = CliArgs::parse();
    let config = FeedscopeConfig::load(args.config.as_deref())?;
    init_tracing(&config.logging)?;

    match config.store.backend {
        StoreBackend::Memory => run(InMemoryTextStore::new(), &config, &args).await,
        StoreBackend::Lmdb => {
            let path = config.store.resolved_path()?;
            tracing::debug!(path = %path.display(), "Opening document cache");
            let store = LmdbTextStore::new(&path, config.store.max_size_mb)?;
            run(store, &config, &args).await
        }
    }
}

async fn run<S: TextStore>(
    store: S,
    config: &FeedscopeConfig,
    args: &CliArgs,
) -> Result<(), CliError> {
    let cache = ExpiringDocumentCache::new(store, config.cache.clone());
    let swept = cache.sweep();
    tracing::info!(
        scanned = swept.scanned,
        removed = swept.removed(),
        "Startup cache sweep complete"
    );
    if args.sweep_only {
        return Ok(());
    }

    let url = args.require_url()?.to_string();
    let issues = read_issues(args)?;
    let fetcher = HttpFetcher::new(&config.fetch)?;
    let resolver = ErrorContextResolver::new(cache, fetcher, config.excerpt.clone());

    let contexts = resolver.resolve_report(&url, &issues).await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_contexts(&mut out, &contexts)?;

    let stats = resolver.cache().stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        store_failures = stats.store_failures,
        "Document cache stats"
    );
    Ok(())
}

fn read_issues(args: &CliArgs) -> Result<Vec<feedscope_core::ValidationIssue>, CliError> {
    match &args.report {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CliError::Report {
                source_name: path.display().to_string(),
                reason: e.to_string(),
            })?;
            parse_report(&text, &path.display().to_string())
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_report(&text, "stdin")
        }
    }
}
