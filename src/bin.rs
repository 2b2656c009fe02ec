//! Binary entry point for `issue-triage`.
//!
//! This module provides the command-line interface for issue-triage with options
//! for configuration file paths, the event payload, and logging verbosity. It
//! initializes logging and hands off to the library.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use issue_triage::base::{config::Config, types::Void};

/// Issue-triage – a GitHub issue triage helper.
///
/// Configuration comes from environment variables (as provided to a GitHub
/// Action) and, optionally, a `config.toml`. The bot checks a newly opened issue
/// against the repository's templates and existing issues, then comments,
/// closes, or assigns it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory. Environment variables take precedence.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Override the event payload path (`GITHUB_EVENT_PATH`).
    #[arg(short, long)]
    event: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP (configured via the standard `OTEL_*` variables).
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the issue-triage binary.
///
/// Sets up logging based on verbosity, loads configuration, and triages the issue.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Prepare the otlp layer, if requested.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("issue-triage");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref(), args.event.as_deref())?;

    issue_triage::start(config).await
}
