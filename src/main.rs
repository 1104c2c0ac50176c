use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use toki_sama_client::highlight::HighlightCase;
use toki_sama_client::loader::{DirFetcher, HttpFetcher, ResourceFetcher};
use toki_sama_client::search::ProcessEngineFactory;
use toki_sama_client::{Config, Session};

/// Incremental English to toki pona lookup.
///
/// Every line read from stdin is the entry field's new value; after each
/// line the visible part of the page is printed.
#[derive(Debug, Parser)]
#[command(name = "toki-sama-client", version)]
struct Cli {
    /// Directory or http(s) URL holding the four dictionary resources
    #[arg(long)]
    resources: Option<String>,

    /// Search engine executable speaking framed JSON on stdin/stdout
    #[arg(long)]
    engine: PathBuf,

    /// Arguments passed through to the engine
    #[arg(last = true)]
    engine_args: Vec<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL of the page, read for its `q` parameter
    #[arg(long)]
    page_url: Option<String>,

    /// Show the candidate's own spelling of a case-insensitive prefix match
    #[arg(long)]
    case_insensitive: bool,

    /// Print the whole page after every event instead of the visible view
    #[arg(long)]
    full_page: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.case_insensitive {
        config.highlight_case = HighlightCase::Insensitive;
    }

    let fetcher = resource_fetcher(cli.resources.as_deref())?;
    let factory = ProcessEngineFactory::new(&cli.engine, cli.engine_args.clone());

    let mut session = Session::new(config);
    if let Some(page_url) = &cli.page_url {
        session = session.with_page_url(page_url);
    }

    if session.initialize(fetcher.as_ref(), &factory).await.is_err() {
        println!("{}", session.page().to_html());
        return Ok(ExitCode::FAILURE);
    }

    session.prefill().await;
    print_view(&session, cli.full_page);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let outcome = session.input(&line).await;
        tracing::debug!("Input '{}' handled: {:?}", line, outcome);
        print_view(&session, cli.full_page);
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter =
        || EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
        return Ok(None);
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {path:?}"))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

fn resource_fetcher(location: Option<&str>) -> Result<Box<dyn ResourceFetcher>> {
    match location {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            let base = Url::parse(url).with_context(|| format!("Invalid resource URL: {url}"))?;
            Ok(Box::new(HttpFetcher::new(base)?))
        }
        Some(dir) => Ok(Box::new(DirFetcher::new(dir))),
        None => Ok(Box::new(DirFetcher::new(DirFetcher::default_root()))),
    }
}

fn print_view(session: &Session, full_page: bool) {
    let page = session.page();
    if full_page {
        println!("{}", page.to_html());
    } else {
        println!("{}", page.view_html());
    }
}
