//! Docweave main entry point
//!
//! This is the command-line interface for the Docweave documentation compiler.

use anyhow::{bail, Context};
use clap::Parser;
use docweave::cache::PageCache;
use docweave::config::{load_config_with_hash, validate_page_budget, Config};
use docweave::crawler::{crawl_and_compile, CrawlRequest, HttpFetcher};
use docweave::resolver::{detect_package, resolve};
use docweave::url::normalize_url;
use docweave::DocweaveError;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Docweave: compile a package's documentation into one Markdown file
///
/// Docweave resolves a package to its documentation site, crawls a bounded
/// number of relevant pages on that host and merges them into a single
/// document with code examples and API entries.
#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Compile package documentation into a single Markdown file", long_about = None)]
struct Cli {
    /// Package or library name to document
    #[arg(value_name = "SUBJECT")]
    subject: Option<String>,

    /// Ecosystem used to locate the documentation (npm, pypi, crates, go, ...)
    #[arg(short, long)]
    ecosystem: Option<String>,

    /// Start from this URL instead of the resolved documentation page
    #[arg(short, long)]
    url: Option<String>,

    /// Maximum number of pages to compile
    #[arg(short = 'n', long)]
    max_pages: Option<usize>,

    /// Ignore cached pages (fresh results are still cached)
    #[arg(long)]
    no_cache: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Infer the subject and ecosystem from import statements ("-" reads stdin)
    #[arg(long, value_name = "TEXT", conflicts_with = "subject")]
    detect: Option<String>,

    /// Remove stale and unreadable cache entries
    #[arg(long, conflicts_with = "clear_cache")]
    prune_cache: bool,

    /// Remove every cache entry
    #[arg(long)]
    clear_cache: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DocweaveError>() {
                Some(inner) => eprintln!("error [{}]: {:#}", inner.kind(), e),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the compiled document.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docweave=info,warn"),
            1 => EnvFilter::new("docweave=debug,info"),
            2 => EnvFilter::new("docweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path).map_err(DocweaveError::from)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        validate_page_budget(max_pages).map_err(DocweaveError::from)?;
        config.crawler.max_pages = max_pages;
    }

    let cache = PageCache::from_config(&config.cache);

    let maintenance = cli.prune_cache || cli.clear_cache;
    if cli.clear_cache {
        let removed = cache.clear();
        tracing::info!("Cleared {} cache entries from {}", removed, cache.dir().display());
    } else if cli.prune_cache {
        let removed = cache.prune();
        tracing::info!("Pruned {} cache entries from {}", removed, cache.dir().display());
    }

    let (subject, detected_ecosystem) = match (&cli.subject, &cli.detect) {
        (Some(subject), _) => (subject.clone(), None),
        (None, Some(text)) => {
            let text = read_detect_input(text)?;
            let Some(package) = detect_package(&text) else {
                bail!("no package reference found in the given text");
            };
            tracing::info!("Detected {} package '{}'", package.ecosystem, package.name);
            (package.name, Some(package.ecosystem))
        }
        (None, None) if maintenance => return Ok(()),
        (None, None) => bail!("a SUBJECT or --detect is required"),
    };

    let seed = match &cli.url {
        Some(raw) => normalize_url(raw).map_err(DocweaveError::from)?,
        None => {
            let ecosystem = cli
                .ecosystem
                .clone()
                .or_else(|| detected_ecosystem.map(|e| e.to_string()));
            resolve(&subject, ecosystem.as_deref()).map_err(DocweaveError::from)?
        }
    };

    let fetcher = HttpFetcher::new(&config).map_err(DocweaveError::from)?;
    let request = CrawlRequest::new(seed, subject)
        .with_max_pages(config.crawler.max_pages)
        .with_cache_bypass(cli.no_cache);

    let document = crawl_and_compile(&fetcher, &cache, &request).await?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", document.len(), path.display());
        }
        None => print!("{}", document),
    }

    Ok(())
}

fn read_detect_input(text: &str) -> anyhow::Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}
